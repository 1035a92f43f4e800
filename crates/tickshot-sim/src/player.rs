//! Player aggregate: movement memory, aim, stance and the equipped item.
//!
//! A player holds no reference to the world; every operation that needs
//! geometry or other players takes the [`World`] explicitly.

use tickshot_common::{PlayerId, Point, SimResult, Side};
use tracing::debug;

use crate::attack::{self, AimState, AttackResult};
use crate::bullet::Bullet;
use crate::collider::{Archetype, PlayerCollider};
use crate::item::{Item, ItemClass, Shot};
use crate::movement::{self, FallOutcome, MoveOutcome, MovementState, Stance};
use crate::rng::RandomSource;
use crate::sound::{SoundEvent, SoundKind};
use crate::world::World;

/// A participant of the match.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    side: Side,
    archetype: Archetype,
    item: Box<dyn Item>,
    trigger_held: bool,
    /// Posture
    pub stance: Stance,
    /// Movement intent and memory
    pub movement: MovementState,
    /// View angles
    pub aim: AimState,
}

impl Player {
    /// Creates a player with the default archetype.
    #[must_use]
    pub fn new(id: PlayerId, side: Side, item: Box<dyn Item>) -> Self {
        Self {
            id,
            side,
            archetype: Archetype::default(),
            item,
            trigger_held: false,
            stance: Stance::default(),
            movement: MovementState::default(),
            aim: AimState::default(),
        }
    }

    /// Player id.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Team side.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Body dimensions.
    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Equipped item.
    #[must_use]
    pub fn item(&self) -> &dyn Item {
        self.item.as_ref()
    }

    /// Replaces the equipped item.
    pub fn equip(&mut self, item: Box<dyn Item>) {
        self.item = item;
    }

    /// Registers this player's collider with the world.
    pub fn join(&self, world: &mut World) {
        let health = world.settings().player_health;
        world.add_player_collider(PlayerCollider::new(self.id, self.archetype, health));
    }

    // === Intents ===

    /// Moves forward this tick.
    pub fn move_forward(&mut self) {
        self.movement.move_forward();
    }

    /// Moves backward this tick.
    pub fn move_backward(&mut self) {
        self.movement.move_backward();
    }

    /// Strafes left this tick.
    pub fn move_left(&mut self) {
        self.movement.move_left();
    }

    /// Strafes right this tick.
    pub fn move_right(&mut self) {
        self.movement.move_right();
    }

    /// Switches to walking speed.
    pub fn speed_walk(&mut self) {
        self.stance.walking = true;
    }

    /// Switches to running speed.
    pub fn speed_run(&mut self) {
        self.stance.walking = false;
    }

    /// Crouches or stands up.
    pub fn crouch(&mut self, crouching: bool) {
        self.stance.crouching = crouching;
    }

    /// Starts attacking every tick until released.
    pub fn press_trigger(&mut self) {
        self.trigger_held = true;
    }

    /// Stops attacking.
    pub fn release_trigger(&mut self) {
        self.trigger_held = false;
    }

    /// Whether the trigger is held.
    #[must_use]
    pub const fn trigger_held(&self) -> bool {
        self.trigger_held
    }

    // === Lifecycle ===

    /// Clears round-scoped player state.
    pub fn round_reset(&mut self) {
        self.movement.reset();
        self.stance = Stance::default();
        self.aim.is_attacking = false;
        self.trigger_held = false;
    }

    /// Places the player on a fresh spawn position of its side.
    pub fn spawn<R: RandomSource + ?Sized>(
        &mut self,
        world: &mut World,
        randomize: bool,
        rng: &mut R,
    ) -> SimResult<Point> {
        let position = world.get_player_spawn_position(self.side, randomize, rng)?;
        world.set_player_position(self.id, position)?;
        self.movement.stop();
        debug!(player = %self.id, %position, "spawned");
        Ok(position)
    }

    /// Ends the tick's attack window.
    pub fn end_tick(&mut self) {
        self.aim.is_attacking = false;
    }

    /// Eye position.
    pub fn sight_position(&self, world: &World) -> SimResult<Point> {
        Ok(world
            .collider(self.id)?
            .position
            .add_y(self.archetype.sight_height))
    }

    // === Movement ===

    /// Applies a tick of free fall.
    pub fn apply_gravity(&mut self, world: &mut World) -> SimResult<FallOutcome> {
        movement::apply_gravity(world, &mut self.movement, self.id, &mut self.stance)
    }

    /// Resolves this tick's movement intent.
    pub fn resolve_movement(&mut self, world: &mut World) -> SimResult<MoveOutcome> {
        movement::resolve_tick(
            world,
            &mut self.movement,
            self.id,
            self.stance,
            self.aim.rotation_horizontal,
            self.item.as_ref(),
        )
    }

    // === Attacks ===

    fn item_sound(&self, position: Point, kind: SoundKind) -> SoundEvent {
        SoundEvent::new(position, kind)
            .with_player(self.id)
            .with_item(self.item.id())
    }

    fn shoot<R: RandomSource + ?Sized>(
        &self,
        world: &mut World,
        origin: Point,
        shot: Shot,
        rng: &mut R,
    ) -> SimResult<AttackResult> {
        let moving = self.movement.is_moving() || self.movement.last_intent() != (0, 0);
        let recoil = attack::movement_recoil(self.item.class(), &self.stance, moving, rng);
        let mut bullet = Bullet::new(
            self.id,
            origin,
            self.aim.rotation_horizontal + recoil.horizontal,
            self.aim.rotation_vertical + recoil.vertical,
            shot.damage,
        );
        let hits = attack::trace_bullet(world, &mut bullet, shot.range)?;
        debug!(player = %self.id, hits = hits.len(), "attack resolved");
        Ok(AttackResult {
            origin,
            recoil,
            hits,
        })
    }

    /// Attacks with the equipped item.
    ///
    /// At most one attack per tick. Items that cannot attack, an empty
    /// magazine or an item that is not ready yet make this a no-op.
    pub fn attack<R: RandomSource + ?Sized>(
        &mut self,
        world: &mut World,
        tick: u64,
        rng: &mut R,
    ) -> SimResult<Option<AttackResult>> {
        if self.aim.is_attacking {
            return Ok(None);
        }
        self.aim.is_attacking = true;

        let class = self.item.class();
        if class == ItemClass::Bomb {
            // Planting belongs to the match controller
            return Ok(None);
        }
        if !class.is_attack_enabled() {
            return Ok(None);
        }

        let origin = self.sight_position(world)?;
        if self.item.ammo() == Some(0) {
            world.make_sound(self.item_sound(origin, SoundKind::AttackNoAmmo));
            return Ok(None);
        }
        if !self.item.can_attack(tick) {
            return Ok(None);
        }
        let Some(shot) = self.item.fire(tick) else {
            return Ok(None);
        };

        world.make_sound(self.item_sound(origin, SoundKind::ItemAttack));
        self.shoot(world, origin, shot, rng).map(Some)
    }

    /// Secondary attack. Only knives have one.
    pub fn attack_secondary<R: RandomSource + ?Sized>(
        &mut self,
        world: &mut World,
        tick: u64,
        rng: &mut R,
    ) -> SimResult<Option<AttackResult>> {
        if self.item.class() != ItemClass::Knife {
            return Ok(None);
        }
        let Some(shot) = self.item.fire_secondary(tick) else {
            return Ok(None);
        };
        let origin = self.sight_position(world)?;
        world.make_sound(self.item_sound(origin, SoundKind::ItemAttack2));
        self.shoot(world, origin, shot, rng).map(Some)
    }

    /// Reloads the equipped item. Returns true if a reload started.
    pub fn reload(&mut self, world: &mut World) -> SimResult<bool> {
        if !self.item.reload() {
            return Ok(false);
        }
        let origin = self.sight_position(world)?;
        world.make_sound(self.item_sound(origin, SoundKind::ItemReload));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SimEvent;
    use crate::geometry::Floor;
    use crate::item::{Firearm, Gear, Knife};
    use crate::map::MapDef;
    use crate::rng::ScriptedRandom;
    use tickshot_common::ItemId;

    fn arena() -> World {
        let mut world = World::default();
        world.load_map(&MapDef {
            name: "arena".to_string(),
            floors: vec![Floor::new(Point::new(0, 0, 0), 2000, 2000)],
            spawn_attacker: vec![Point::new(500, 0, 100)],
            spawn_defender: vec![Point::new(500, 0, 400)],
            ..MapDef::default()
        });
        world
    }

    fn spawned(world: &mut World, id: u32, side: Side, item: Box<dyn Item>) -> Player {
        let mut player = Player::new(PlayerId::new(id), side, item);
        player.join(world);
        player
            .spawn(world, false, &mut ScriptedRandom::default())
            .expect("spawn");
        player
    }

    fn sounds(world: &World) -> Vec<SoundKind> {
        world
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                SimEvent::Sound(sound) => Some(sound.kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_attack_hits_enemy() {
        let mut world = arena();
        let mut shooter = spawned(&mut world, 1, Side::Attacker, Box::new(Firearm::rifle()));
        let target = spawned(&mut world, 2, Side::Defender, Box::new(Knife::default()));
        let mut rng = ScriptedRandom::default();

        let result = shooter
            .attack(&mut world, 0, &mut rng)
            .expect("attack")
            .expect("shot fired");
        assert_eq!(result.origin, Point::new(500, 180, 100));
        assert!(matches!(result.hits[0], crate::hit::HitTarget::Player(hit) if hit.player == target.id()));
        assert_eq!(sounds(&world), vec![SoundKind::ItemAttack]);
    }

    #[test]
    fn test_one_attack_per_tick() {
        let mut world = arena();
        let mut shooter = spawned(&mut world, 1, Side::Attacker, Box::new(Firearm::rifle()));
        let mut rng = ScriptedRandom::default();

        assert!(shooter.attack(&mut world, 0, &mut rng).expect("attack").is_some());
        assert!(shooter.attack(&mut world, 0, &mut rng).expect("attack").is_none());
        shooter.end_tick();
        assert!(shooter.attack(&mut world, 1, &mut rng).expect("attack").is_some());
    }

    #[test]
    fn test_empty_magazine_clicks() {
        let mut world = arena();
        let mut rifle = Firearm::rifle();
        rifle.ammo = 0;
        let mut shooter = spawned(&mut world, 1, Side::Attacker, Box::new(rifle));
        let mut rng = ScriptedRandom::default();

        assert!(shooter.attack(&mut world, 0, &mut rng).expect("attack").is_none());
        assert_eq!(sounds(&world), vec![SoundKind::AttackNoAmmo]);

        assert!(shooter.reload(&mut world).expect("reload"));
        assert_eq!(shooter.item().ammo(), Some(30));
        assert_eq!(sounds(&world), vec![SoundKind::ItemReload]);
    }

    #[test]
    fn test_not_ready_is_silent() {
        let mut world = arena();
        let mut shooter = spawned(&mut world, 1, Side::Attacker, Box::new(Firearm::pistol()));
        let mut rng = ScriptedRandom::default();

        assert!(shooter.attack(&mut world, 0, &mut rng).expect("attack").is_some());
        shooter.end_tick();
        world.drain_events();
        assert!(shooter.attack(&mut world, 1, &mut rng).expect("attack").is_none());
        assert!(sounds(&world).is_empty());
    }

    #[test]
    fn test_gear_does_nothing() {
        let mut world = arena();
        let bomb = Gear {
            id: ItemId::new(50),
            class: ItemClass::Bomb,
        };
        let mut carrier = spawned(&mut world, 1, Side::Attacker, Box::new(bomb));
        let mut rng = ScriptedRandom::default();

        assert!(carrier.attack(&mut world, 0, &mut rng).expect("attack").is_none());
        assert!(carrier
            .attack_secondary(&mut world, 0, &mut rng)
            .expect("attack")
            .is_none());
        assert!(!carrier.reload(&mut world).expect("reload"));
        assert!(sounds(&world).is_empty());
    }

    #[test]
    fn test_knife_secondary() {
        let mut world = arena();
        let mut stabber = spawned(&mut world, 1, Side::Attacker, Box::new(Knife::default()));
        let mut rng = ScriptedRandom::default();

        let result = stabber
            .attack_secondary(&mut world, 0, &mut rng)
            .expect("attack")
            .expect("stab");
        assert!(result.hits.is_empty());
        assert_eq!(sounds(&world), vec![SoundKind::ItemAttack2]);
    }
}
