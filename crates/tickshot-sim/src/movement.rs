//! Per-tick movement resolution.
//!
//! A move intent is turned into an angle and a whole number of unit steps.
//! Each step is checked against walls, floors and other players; the last
//! legal step wins. Steps may climb low obstacles, slide one unit along a
//! wall, or drop off a ledge.

use serde::{Deserialize, Serialize};
use tickshot_common::{ItemId, PlayerId, Point, SimResult};
use tracing::trace;

use crate::geometry::Floor;
use crate::item::{Item, ItemClass};
use crate::settings::SimSettings;
use crate::sound::{SoundEvent, SoundKind};
use crate::world::World;

/// Turning further than this between airborne ticks cancels the move.
pub const MAX_AIR_TURN_DEGREES: i32 = 160;

/// Speed class of a moving player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gait {
    /// Crouched
    Crouch,
    /// Walking
    Walk,
    /// Running
    Run,
}

impl Gait {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crouch => "crouch",
            Self::Walk => "walk",
            Self::Run => "run",
        }
    }
}

/// Posture flags of a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stance {
    /// Walking instead of running
    pub walking: bool,
    /// Crouched
    pub crouching: bool,
    /// Jump in progress
    pub jumping: bool,
    /// Airborne without support
    pub flying: bool,
}

impl Stance {
    /// Speed class.
    #[must_use]
    pub const fn gait(&self) -> Gait {
        if self.crouching {
            Gait::Crouch
        } else if self.walking {
            Gait::Walk
        } else {
            Gait::Run
        }
    }

    /// Whether the player runs.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !self.walking
    }
}

/// Legality of a single movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanMove {
    /// The step is illegal
    Blocked,
    /// The step (possibly raised onto a floor) is legal
    Allowed,
    /// Only a one-unit move along a single axis is legal
    PartialSlide,
}

/// Movement memory of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementState {
    move_x: i32,
    move_z: i32,
    last_move_x: i32,
    last_move_z: i32,
    last_angle: Option<i32>,
    fall_height: i32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            move_x: 0,
            move_z: 0,
            last_move_x: 0,
            last_move_z: 0,
            last_angle: Some(0),
            fall_height: 0,
        }
    }
}

impl MovementState {
    /// Intends to move forward this tick.
    pub fn move_forward(&mut self) {
        self.move_z = 1;
    }

    /// Intends to move backward this tick.
    pub fn move_backward(&mut self) {
        self.move_z = -1;
    }

    /// Intends to strafe left this tick.
    pub fn move_left(&mut self) {
        self.move_x = -1;
    }

    /// Intends to strafe right this tick.
    pub fn move_right(&mut self) {
        self.move_x = 1;
    }

    /// Current intent as `(x, z)`.
    #[must_use]
    pub const fn intent(&self) -> (i32, i32) {
        (self.move_x, self.move_z)
    }

    /// Previous tick's intent as `(x, z)`.
    #[must_use]
    pub const fn last_intent(&self) -> (i32, i32) {
        (self.last_move_x, self.last_move_z)
    }

    /// Last angle a move was resolved at, `None` after an airborne reversal.
    #[must_use]
    pub const fn last_angle(&self) -> Option<i32> {
        self.last_angle
    }

    /// Accumulated free-fall height.
    #[must_use]
    pub const fn fall_height(&self) -> i32 {
        self.fall_height
    }

    /// Whether any intent is set.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.move_x != 0 || self.move_z != 0
    }

    const fn is_diagonal(&self) -> bool {
        self.move_x != 0 && self.move_z != 0
    }

    /// Whether the intent reverses last tick's move on its single axis.
    #[must_use]
    pub const fn is_counter_strafe(&self) -> bool {
        !self.is_diagonal()
            && ((self.move_x != 0 && self.last_move_x == -self.move_x)
                || (self.move_z != 0 && self.last_move_z == -self.move_z))
    }

    /// Raw move angle in degrees for a view angle, not normalized.
    #[must_use]
    pub fn move_angle(&self, view_angle: f32) -> f32 {
        let offset = if self.is_diagonal() {
            if self.move_z == 1 {
                self.move_x * 45
            } else {
                self.move_x * 135
            }
        } else if self.move_z == -1 {
            180
        } else {
            self.move_x * 90
        };
        view_angle + offset as f32
    }

    /// Ends the tick: the current intent becomes the last one.
    pub fn stop(&mut self) {
        self.last_move_x = self.move_x;
        self.last_move_z = self.move_z;
        self.move_x = 0;
        self.move_z = 0;
    }

    /// Forgets everything, as at the start of a round.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Where a player went during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Position before the tick
    pub from: Point,
    /// Resolved position
    pub to: Point,
}

impl MoveOutcome {
    const fn stationary(position: Point) -> Self {
        Self {
            from: position,
            to: position,
        }
    }

    /// Whether the position changed.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Result of a gravity tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallOutcome {
    /// Standing on a floor or the bottom of the world
    Supported,
    /// Jumping, gravity is left to the jump
    Jumping,
    /// Still in the air
    Falling,
    /// Touched down after falling `height` units
    Landed {
        /// Total fall height
        height: i32,
    },
    /// Touched down too hard
    Died,
}

/// Normalizes an angle to `[0, 360)`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Signed smallest rotation from `from` to `to`, in `(-180, 180]`.
#[must_use]
pub const fn smallest_delta_angle(from: i32, to: i32) -> i32 {
    let delta = (to - from).rem_euclid(360);
    if delta > 180 {
        delta - 360
    } else {
        delta
    }
}

/// Horizontal offset of `distance` units along `angle` (0 is +Z, 90 is +X).
#[must_use]
pub fn movement_xz(angle: f32, distance: i32) -> (i32, i32) {
    let radians = f64::from(angle).to_radians();
    let distance = f64::from(distance);
    (
        (radians.sin() * distance).round() as i32,
        (radians.cos() * distance).round() as i32,
    )
}

/// Whole units a player covers this tick.
pub fn move_speed(
    settings: &SimSettings,
    stance: &Stance,
    class: ItemClass,
    item: ItemId,
) -> SimResult<i32> {
    let mut speed = settings.move_distance(stance.gait())?;
    speed *= settings.weapon_speed_multiplier(class, item);
    if stance.jumping {
        speed *= settings.jump_movement_speed_multiplier;
    } else if stance.flying {
        speed *= settings.flying_movement_speed_multiplier;
    }
    Ok(speed.ceil() as i32)
}

/// Steps one player through the world's geometry.
///
/// Holds a working copy of the player's active floor; the caller writes it
/// back once the sweep is done.
#[derive(Debug)]
pub struct Mover<'w> {
    world: &'w World,
    player: PlayerId,
    radius: i32,
    height: i32,
    stance: Stance,
    active_floor: Option<Floor>,
    dropped: i32,
}

impl<'w> Mover<'w> {
    /// Creates a mover for a joined player.
    pub fn new(world: &'w World, player: PlayerId, stance: Stance) -> SimResult<Self> {
        let collider = world.collider(player)?;
        Ok(Self {
            world,
            player,
            radius: collider.archetype.radius,
            height: collider.archetype.head_height,
            stance,
            active_floor: collider.active_floor,
            dropped: 0,
        })
    }

    /// Floor supporting the player as resolved so far.
    #[must_use]
    pub const fn active_floor(&self) -> Option<Floor> {
        self.active_floor
    }

    /// Height lost to the ledge drop during the sweep.
    #[must_use]
    pub const fn dropped(&self) -> i32 {
        self.dropped
    }

    fn collides_with_player(&self, point: Point) -> bool {
        self.world
            .is_collision_with_other_players(self.player, point, self.radius, self.height)
            .is_some()
    }

    /// Checks one step from `start` to `candidate`.
    ///
    /// On a step-over `candidate` is raised onto the obstacle's floor and the
    /// floor becomes active. On a partial slide `candidate` is replaced by the
    /// one-unit single-axis position.
    pub fn can_move_to(
        &mut self,
        start: Point,
        candidate: &mut Point,
        angle: i32,
    ) -> SimResult<CanMove> {
        let radius = self.radius;
        let height = self.height;
        if self.collides_with_player(*candidate) {
            return Ok(CanMove::Blocked);
        }
        let max_ceiling = candidate.y + self.world.settings().obstacle_overcome_height;

        let x_wall = if start.x == candidate.x {
            None
        } else {
            let edge = if start.x < candidate.x { radius } else { -radius };
            self.world
                .highest_x_wall(candidate.add_x(edge), height, radius, max_ceiling)
        };
        let z_wall = if start.z == candidate.z {
            None
        } else {
            let edge = if start.z < candidate.z { radius } else { -radius };
            self.world
                .highest_z_wall(candidate.add_z(edge), height, radius, max_ceiling)
        };
        if x_wall.is_none() && z_wall.is_none() {
            return Ok(CanMove::Allowed);
        }

        if self.stance.flying {
            return Ok(CanMove::Blocked);
        }

        // Step over a single low wall
        let low_wall = match (x_wall, z_wall) {
            (Some(ceiling), None) | (None, Some(ceiling)) if ceiling <= max_ceiling => {
                Some(ceiling)
            }
            _ => None,
        };
        if let Some(ceiling) = low_wall {
            if let Some(floor) = self
                .world
                .find_floor(candidate.with_y(ceiling), radius)?
            {
                let landing = candidate.with_y(floor.y());
                if !self.collides_with_player(landing) {
                    *candidate = landing;
                    self.active_floor = Some(floor);
                    return Ok(CanMove::Allowed);
                }
            }
        }

        if angle % 90 == 0 {
            return Ok(CanMove::Blocked);
        }

        if x_wall.is_none() {
            let step = if angle > 180 { -1 } else { 1 };
            let slide = candidate.with_z(start.z).with_x(start.x + step);
            let probe = slide.add_x(step * radius);
            if self
                .world
                .check_x_side_wall_collision(probe, height, radius)
                .is_none()
                && !self.collides_with_player(slide)
            {
                *candidate = slide;
                return Ok(CanMove::PartialSlide);
            }
            return Ok(CanMove::Blocked);
        }
        if z_wall.is_none() {
            let step = if angle > 270 || angle < 90 { 1 } else { -1 };
            let slide = candidate.with_x(start.x).with_z(start.z + step);
            let probe = slide.add_z(step * radius);
            if self
                .world
                .check_z_side_wall_collision(probe, height, radius)
                .is_none()
                && !self.collides_with_player(slide)
            {
                *candidate = slide;
                return Ok(CanMove::PartialSlide);
            }
        }
        Ok(CanMove::Blocked)
    }

    /// Drops `point` by up to one tick of gravity, stopping on the first floor.
    ///
    /// Never goes below `y = 0`.
    pub fn gravity_drop(&self, point: Point) -> SimResult<(Point, Option<Floor>)> {
        let lowest = (point.y - self.world.settings().gravity_per_tick).max(0);
        for y in (lowest..=point.y).rev() {
            let probe = point.with_y(y);
            if let Some(floor) = self.world.find_floor(probe, self.radius)? {
                return Ok((probe, Some(floor)));
            }
        }
        Ok((point.with_y(lowest), None))
    }

    /// Walks `distance` unit steps from `origin` along `angle`.
    pub fn sweep(&mut self, origin: Point, angle: f32, distance: i32) -> SimResult<Point> {
        let angle_int = angle_to_int(angle);
        let mut target = origin;
        let mut dropped = false;

        for i in 1..=distance {
            let (dx, dz) = movement_xz(angle, i);
            let mut candidate = Point::new(origin.x + dx, target.y, origin.z + dz);
            if candidate == target {
                continue;
            }

            match self.can_move_to(target, &mut candidate, angle_int)? {
                CanMove::Blocked => {
                    trace!(player = %self.player, step = i, %target, "step blocked");
                    break;
                }
                CanMove::PartialSlide => {
                    trace!(player = %self.player, step = i, %candidate, "partial slide");
                    target = candidate;
                    break;
                }
                CanMove::Allowed => {
                    target = candidate;
                    if let Some(floor) = self.active_floor {
                        if !self.world.is_on_floor(&floor, target, self.radius) {
                            self.active_floor = None;
                        }
                    }
                    if !dropped && self.active_floor.is_none() && !self.stance.jumping {
                        let (landing, floor) = self.gravity_drop(target)?;
                        self.dropped += target.y - landing.y;
                        target = landing;
                        self.active_floor = floor;
                        dropped = true;
                    }
                }
            }
        }
        Ok(target)
    }
}

fn angle_to_int(angle: f32) -> i32 {
    (angle.round() as i32).rem_euclid(360)
}

/// Resolves one tick of movement for a player and consumes its intent.
pub fn resolve_tick(
    world: &mut World,
    state: &mut MovementState,
    player: PlayerId,
    stance: Stance,
    view_angle: f32,
    item: &dyn Item,
) -> SimResult<MoveOutcome> {
    let outcome = resolve(world, state, player, stance, view_angle, item);
    state.stop();
    outcome
}

fn resolve(
    world: &mut World,
    state: &mut MovementState,
    player: PlayerId,
    stance: Stance,
    view_angle: f32,
    item: &dyn Item,
) -> SimResult<MoveOutcome> {
    let origin = world.collider(player)?.position;
    if !state.is_moving() {
        return Ok(MoveOutcome::stationary(origin));
    }
    world.require_map()?;

    if state.is_counter_strafe() {
        trace!(player = %player, "counter-strafe");
        return Ok(MoveOutcome::stationary(origin));
    }

    let distance = move_speed(world.settings(), &stance, item.class(), item.id())?;
    let angle = normalize_angle(state.move_angle(view_angle));
    let angle_int = angle_to_int(angle);

    if stance.flying {
        let Some(last) = state.last_angle else {
            return Ok(MoveOutcome::stationary(origin));
        };
        if smallest_delta_angle(last, angle_int).abs() > MAX_AIR_TURN_DEGREES {
            trace!(player = %player, last, angle = angle_int, "air turn too sharp");
            state.last_angle = None;
            return Ok(MoveOutcome::stationary(origin));
        }
    }
    state.last_angle = Some(angle_int);

    let (target, active_floor) = {
        let mut mover = Mover::new(world, player, stance)?;
        let target = mover.sweep(origin, angle, distance)?;
        state.fall_height += mover.dropped();
        (target, mover.active_floor())
    };

    let collider = world.collider_mut(player)?;
    collider.position = target;
    collider.active_floor = active_floor;

    let outcome = MoveOutcome {
        from: origin,
        to: target,
    };
    if stance.is_running() && !stance.crouching && !stance.flying && outcome.moved() {
        world.make_sound(SoundEvent::new(target, SoundKind::Step).with_player(player));
    }
    Ok(outcome)
}

/// Applies one tick of free fall to a player that is not standing on a floor.
///
/// Updates `stance.flying`. A landing from higher than the lethal fall height
/// kills the player.
pub fn apply_gravity(
    world: &mut World,
    state: &mut MovementState,
    player: PlayerId,
    stance: &mut Stance,
) -> SimResult<FallOutcome> {
    let collider = world.collider(player)?;
    let position = collider.position;
    if stance.jumping {
        return Ok(FallOutcome::Jumping);
    }
    if collider.active_floor.is_some() || position.y <= 0 {
        state.fall_height = 0;
        stance.flying = false;
        return Ok(FallOutcome::Supported);
    }

    let (landing, floor) = Mover::new(world, player, *stance)?.gravity_drop(position)?;
    state.fall_height += position.y - landing.y;

    let collider = world.collider_mut(player)?;
    collider.position = landing;
    collider.active_floor = floor;

    if floor.is_none() && landing.y > 0 {
        stance.flying = true;
        return Ok(FallOutcome::Falling);
    }

    stance.flying = false;
    let height = std::mem::take(&mut state.fall_height);
    if height > world.settings().lethal_fall_height {
        world.player_died_to_fall_damage(player)?;
        return Ok(FallOutcome::Died);
    }
    if height == 0 {
        return Ok(FallOutcome::Supported);
    }
    trace!(player = %player, height, "landed");
    Ok(FallOutcome::Landed { height })
}
