//! The simulated world: geometry, player colliders, spawns and events.
//!
//! A `World` is passed explicitly to every movement and attack call. All
//! per-tick work reads and writes it sequentially.

use tickshot_common::{PlayerId, Point, SimError, SimResult, Side};
use tracing::{debug, info, warn};

use crate::bullet::Bullet;
use crate::collider::PlayerCollider;
use crate::events::{EventBus, SimEvent};
use crate::geometry::{BoxShape, Floor, FloorRecord, RampShape, Wall, WallRecord};
use crate::hit::HitTarget;
use crate::map::MapDef;
use crate::rng::RandomSource;
use crate::settings::SimSettings;
use crate::sound::SoundEvent;
use crate::spawn::SpawnAllocator;
use crate::store::GeometryStore;

/// Map data kept after geometry has been handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedMap {
    /// Display name
    pub name: String,
    /// Ordered attacker spawn candidates
    pub spawn_attacker: Vec<Point>,
    /// Ordered defender spawn candidates
    pub spawn_defender: Vec<Point>,
}

impl LoadedMap {
    fn spawns(&self, side: Side) -> &[Point] {
        match side {
            Side::Attacker => &self.spawn_attacker,
            Side::Defender => &self.spawn_defender,
        }
    }
}

/// Authoritative simulation state.
#[derive(Debug)]
pub struct World {
    settings: SimSettings,
    store: GeometryStore,
    map: Option<LoadedMap>,
    colliders: Vec<PlayerCollider>,
    spawns: SpawnAllocator,
    events: EventBus,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimSettings::default())
    }
}

impl World {
    /// Creates an empty world with no map.
    #[must_use]
    pub fn new(settings: SimSettings) -> Self {
        Self {
            settings,
            store: GeometryStore::new(),
            map: None,
            colliders: Vec::new(),
            spawns: SpawnAllocator::new(),
            events: EventBus::default(),
        }
    }

    /// Simulation settings.
    #[must_use]
    pub const fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// Geometry store.
    #[must_use]
    pub const fn store(&self) -> &GeometryStore {
        &self.store
    }

    // === Map lifecycle ===

    /// Replaces all geometry with the map's and resets the round.
    pub fn load_map(&mut self, map: &MapDef) {
        self.store.clear();
        for wall in &map.walls {
            self.store.add_wall(*wall);
        }
        for floor in &map.floors {
            self.store.add_floor(*floor);
        }
        for shape in &map.boxes {
            self.store.add_box(shape);
        }
        for ramp in &map.ramps {
            self.store.add_ramp(ramp);
        }
        if map.spawn_attacker.is_empty() || map.spawn_defender.is_empty() {
            warn!(map = %map.name, "map has a side without spawn candidates");
        }

        self.map = Some(LoadedMap {
            name: map.name.clone(),
            spawn_attacker: map.spawn_attacker.clone(),
            spawn_defender: map.spawn_defender.clone(),
        });
        info!(
            map = %map.name,
            walls = self.store.wall_count(),
            floors = self.store.floor_count(),
            "map loaded"
        );
        self.round_reset();
    }

    /// Loaded map, or [`SimError::NoMapLoaded`].
    pub fn require_map(&self) -> SimResult<&LoadedMap> {
        self.map.as_ref().ok_or(SimError::NoMapLoaded)
    }

    /// Clears spawn pools and round-scoped collider state.
    pub fn round_reset(&mut self) {
        self.spawns.reset();
        let health = self.settings.player_health;
        for collider in &mut self.colliders {
            collider.round_reset(health);
        }
        info!(players = self.colliders.len(), "round reset");
    }

    // === Geometry ===

    /// Adds a wall.
    pub fn add_wall(&mut self, wall: Wall) {
        self.store.add_wall(wall);
    }

    /// Adds a floor.
    pub fn add_floor(&mut self, floor: Floor) {
        self.store.add_floor(floor);
    }

    /// Adds a box.
    pub fn add_box(&mut self, shape: &BoxShape) {
        self.store.add_box(shape);
    }

    /// Adds a ramp.
    pub fn add_ramp(&mut self, ramp: &RampShape) {
        self.store.add_ramp(ramp);
    }

    /// See [`GeometryStore::is_wall_at`].
    #[must_use]
    pub fn is_wall_at(&self, point: Point) -> Option<Wall> {
        self.store.is_wall_at(point)
    }

    /// See [`GeometryStore::find_floor`].
    pub fn find_floor(&self, point: Point, radius: i32) -> SimResult<Option<Floor>> {
        self.store.find_floor(point, radius)
    }

    /// See [`GeometryStore::is_on_floor`].
    #[must_use]
    pub fn is_on_floor(&self, floor: &Floor, position: Point, radius: i32) -> bool {
        self.store.is_on_floor(floor, position, radius)
    }

    /// See [`GeometryStore::check_x_side_wall_collision`].
    #[must_use]
    pub fn check_x_side_wall_collision(
        &self,
        center: Point,
        height: i32,
        radius: i32,
    ) -> Option<Wall> {
        self.store.check_x_side_wall_collision(center, height, radius)
    }

    /// See [`GeometryStore::check_z_side_wall_collision`].
    #[must_use]
    pub fn check_z_side_wall_collision(
        &self,
        center: Point,
        height: i32,
        radius: i32,
    ) -> Option<Wall> {
        self.store.check_z_side_wall_collision(center, height, radius)
    }

    /// See [`GeometryStore::highest_x_wall`].
    #[must_use]
    pub fn highest_x_wall(
        &self,
        center: Point,
        height: i32,
        radius: i32,
        max_ceiling: i32,
    ) -> Option<i32> {
        self.store.highest_x_wall(center, height, radius, max_ceiling)
    }

    /// See [`GeometryStore::highest_z_wall`].
    #[must_use]
    pub fn highest_z_wall(
        &self,
        center: Point,
        height: i32,
        radius: i32,
        max_ceiling: i32,
    ) -> Option<i32> {
        self.store.highest_z_wall(center, height, radius, max_ceiling)
    }

    /// Wall snapshot.
    #[must_use]
    pub fn walls(&self) -> Vec<WallRecord> {
        self.store.walls()
    }

    /// Floor snapshot.
    #[must_use]
    pub fn floors(&self) -> Vec<FloorRecord> {
        self.store.floors()
    }

    // === Colliders ===

    /// Registers a player collider. A collider with the same id is replaced.
    pub fn add_player_collider(&mut self, collider: PlayerCollider) {
        if let Some(existing) = self.colliders.iter_mut().find(|c| c.id == collider.id) {
            warn!(player = %collider.id, "replacing existing collider");
            *existing = collider;
            return;
        }
        self.colliders.push(collider);
    }

    /// Colliders in join order.
    pub fn colliders(&self) -> impl Iterator<Item = &PlayerCollider> {
        self.colliders.iter()
    }

    /// Collider of a player.
    pub fn collider(&self, id: PlayerId) -> SimResult<&PlayerCollider> {
        self.colliders
            .iter()
            .find(|c| c.id == id)
            .ok_or(SimError::UnknownPlayer { id })
    }

    /// Mutable collider of a player.
    pub fn collider_mut(&mut self, id: PlayerId) -> SimResult<&mut PlayerCollider> {
        self.colliders
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(SimError::UnknownPlayer { id })
    }

    /// Teleports a player and re-derives its active floor.
    pub fn set_player_position(&mut self, id: PlayerId, position: Point) -> SimResult<()> {
        let radius = self.collider(id)?.archetype.radius;
        let floor = self.store.find_floor(position, radius)?;
        let collider = self.collider_mut(id)?;
        collider.position = position;
        collider.active_floor = floor;
        Ok(())
    }

    /// First live player other than `id` whose body overlaps a body at `point`.
    #[must_use]
    pub fn is_collision_with_other_players(
        &self,
        id: PlayerId,
        point: Point,
        radius: i32,
        height: i32,
    ) -> Option<PlayerId> {
        self.colliders
            .iter()
            .filter(|c| c.id != id && c.alive)
            .find(|c| c.collide(point, radius, height))
            .map(|c| c.id)
    }

    /// Marks a player dead from fall damage and notifies the match controller.
    pub fn player_died_to_fall_damage(&mut self, id: PlayerId) -> SimResult<()> {
        let collider = self.collider_mut(id)?;
        collider.alive = false;
        collider.health = 0;
        debug!(player = %id, "fall damage kill");
        self.events.publish(SimEvent::FallDamageKill { killed: id });
        Ok(())
    }

    // === Shots ===

    /// Resolves what a bullet hits at its current position.
    ///
    /// Player hits come first in join order, at most one per player over the
    /// bullet's life, then at most one terrain hit. A floor hides any wall at
    /// the same point.
    pub fn calculate_hits(&mut self, bullet: &mut Bullet) -> SimResult<Vec<HitTarget>> {
        let mut hits = Vec::new();
        for collider in &mut self.colliders {
            if collider.id == bullet.origin_player() || bullet.has_hit(collider.id) {
                continue;
            }
            let Some(hit) = collider.try_hit(bullet, &self.settings) else {
                continue;
            };
            bullet.mark_hit(hit.player);
            if hit.killed {
                debug!(killed = %hit.player, shooter = %bullet.origin_player(), headshot = hit.headshot, "attack kill");
                self.events.publish(SimEvent::AttackKill {
                    killed: hit.player,
                    shooter: bullet.origin_player(),
                    position: bullet.position(),
                    headshot: hit.headshot,
                });
            }
            hits.push(HitTarget::Player(hit));
        }

        let position = bullet.position();
        if let Some(floor) = self.store.find_floor(position, 0)? {
            hits.push(HitTarget::Floor { floor, position });
            return Ok(hits);
        }
        if let Some(wall) = self.store.is_wall_at(position) {
            hits.push(HitTarget::Wall { wall, position });
        }
        Ok(hits)
    }

    // === Spawns ===

    /// Allocates a spawn position for the round.
    pub fn get_player_spawn_position<R: RandomSource + ?Sized>(
        &mut self,
        side: Side,
        randomize: bool,
        rng: &mut R,
    ) -> SimResult<Point> {
        let map = self.map.as_ref().ok_or(SimError::NoMapLoaded)?;
        self.spawns.take(side, map.spawns(side), randomize, rng)
    }

    // === Events ===

    /// Publishes a sound.
    pub fn make_sound(&self, sound: SoundEvent) {
        self.events.publish(SimEvent::Sound(sound));
    }

    /// Event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Drains pending events in publish order.
    pub fn drain_events(&self) -> Vec<SimEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Archetype;
    use crate::rng::ScriptedRandom;
    use crate::sound::SoundKind;

    fn world_with_map() -> World {
        let mut world = World::default();
        let mut map = MapDef::practice_arena();
        map.spawn_attacker.truncate(2);
        world.load_map(&map);
        world
    }

    fn join(world: &mut World, id: u32, position: Point) -> PlayerId {
        let id = PlayerId::new(id);
        world.add_player_collider(PlayerCollider::new(id, Archetype::default(), 100));
        world.set_player_position(id, position).expect("known player");
        id
    }

    #[test]
    fn test_kill_survives_flooded_event_bus() {
        let mut world = world_with_map();
        let id = join(&mut world, 1, Point::new(100, 0, 100));
        let capacity = world.events().capacity();
        for _ in 0..capacity {
            world.make_sound(SoundEvent::new(Point::new(100, 0, 100), SoundKind::Step));
        }
        world.make_sound(SoundEvent::new(Point::new(100, 0, 100), SoundKind::Step));
        world.player_died_to_fall_damage(id).expect("known player");

        let events = world.drain_events();
        assert_eq!(events.len(), capacity + 1);
        assert_eq!(events.last(), Some(&SimEvent::FallDamageKill { killed: id }));
    }

    #[test]
    fn test_no_map_is_fatal() {
        let mut world = World::default();
        let mut rng = ScriptedRandom::default();
        assert_eq!(world.require_map().err(), Some(SimError::NoMapLoaded));
        assert_eq!(
            world.get_player_spawn_position(Side::Attacker, false, &mut rng),
            Err(SimError::NoMapLoaded)
        );
    }

    #[test]
    fn test_set_position_attaches_floor() {
        let mut world = world_with_map();
        let id = join(&mut world, 1, Point::new(100, 0, 100));
        let collider = world.collider(id).expect("collider");
        assert_eq!(collider.active_floor.map(|f| f.y()), Some(0));

        world
            .set_player_position(id, Point::new(100, 50, 100))
            .expect("known player");
        assert!(world.collider(id).expect("collider").active_floor.is_none());

        assert_eq!(
            world.set_player_position(PlayerId::new(9), Point::default()),
            Err(SimError::UnknownPlayer {
                id: PlayerId::new(9)
            })
        );
    }

    #[test]
    fn test_player_collision_skips_self_and_dead() {
        let mut world = world_with_map();
        let a = join(&mut world, 1, Point::new(100, 0, 100));
        let b = join(&mut world, 2, Point::new(150, 0, 100));

        assert_eq!(
            world.is_collision_with_other_players(a, Point::new(120, 0, 100), 44, 190),
            Some(b)
        );
        assert_eq!(
            world.is_collision_with_other_players(b, Point::new(150, 0, 100), 44, 190),
            Some(a)
        );

        world.player_died_to_fall_damage(b).expect("known player");
        assert_eq!(
            world.is_collision_with_other_players(a, Point::new(120, 0, 100), 44, 190),
            None
        );
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::FallDamageKill { killed: b }]
        );

        world.round_reset();
        assert!(world.collider(b).expect("collider").alive);
    }

    #[test]
    fn test_calculate_hits_players_then_terrain() {
        let mut world = world_with_map();
        let shooter = join(&mut world, 1, Point::new(100, 0, 100));
        let target = join(&mut world, 2, Point::new(100, 0, 200));

        // Aim straight down through the target onto the ground
        let mut bullet = Bullet::new(shooter, Point::new(100, 100, 200), 0.0, -90.0, 10);
        bullet.advance();
        let hits = world.calculate_hits(&mut bullet).expect("hits");
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0], HitTarget::Player(hit) if hit.player == target));

        // Same bullet does not hit the same player twice
        for _ in 0..99 {
            bullet.advance();
        }
        assert_eq!(bullet.position().y, 0);
        let hits = world.calculate_hits(&mut bullet).expect("hits");
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0], HitTarget::Floor { .. }));
    }

    #[test]
    fn test_calculate_hits_kill_event() {
        let mut world = world_with_map();
        let shooter = join(&mut world, 1, Point::new(100, 0, 100));
        let target = join(&mut world, 2, Point::new(100, 0, 300));

        let mut bullet = Bullet::new(shooter, Point::new(100, 181, 300), 0.0, -90.0, 100);
        bullet.advance();
        let hits = world.calculate_hits(&mut bullet).expect("hits");
        assert!(hits[0].is_kill());
        assert!(hits[0].was_headshot());
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::AttackKill {
                killed: target,
                shooter,
                position: Point::new(100, 180, 300),
                headshot: true,
            }]
        );
    }

    #[test]
    fn test_spawn_exhaustion_and_reset() {
        let mut world = world_with_map();
        let mut rng = ScriptedRandom::default();
        assert!(world
            .get_player_spawn_position(Side::Attacker, false, &mut rng)
            .is_ok());
        assert!(world
            .get_player_spawn_position(Side::Attacker, false, &mut rng)
            .is_ok());
        assert!(world
            .get_player_spawn_position(Side::Attacker, false, &mut rng)
            .is_err());

        world.round_reset();
        assert_eq!(
            world.get_player_spawn_position(Side::Attacker, false, &mut rng),
            Ok(Point::new(200, 0, 150))
        );
    }
}
