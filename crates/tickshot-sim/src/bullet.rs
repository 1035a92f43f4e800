//! A single fired shot travelling through the world one unit at a time.

use ahash::AHashSet;
use glam::Vec3;
use tickshot_common::{PlayerId, Point};

/// Ephemeral projectile, discarded once its hits are resolved.
#[derive(Debug, Clone)]
pub struct Bullet {
    origin_player: PlayerId,
    origin: Point,
    direction: Vec3,
    distance: u32,
    position: Point,
    damage: i32,
    hit_players: AHashSet<PlayerId>,
}

impl Bullet {
    /// Creates a bullet leaving `origin` along the given view angles (degrees).
    ///
    /// A horizontal angle of 0 points along +Z, 90 along +X. A positive
    /// vertical angle points up.
    #[must_use]
    pub fn new(
        origin_player: PlayerId,
        origin: Point,
        angle_horizontal: f32,
        angle_vertical: f32,
        damage: i32,
    ) -> Self {
        let h = angle_horizontal.to_radians();
        let v = angle_vertical.to_radians();
        let direction = Vec3::new(h.sin() * v.cos(), v.sin(), h.cos() * v.cos());
        Self {
            origin_player,
            origin,
            direction,
            distance: 0,
            position: origin,
            damage,
            hit_players: AHashSet::new(),
        }
    }

    /// Player who fired the bullet.
    #[must_use]
    pub const fn origin_player(&self) -> PlayerId {
        self.origin_player
    }

    /// Muzzle point.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Unit direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Distance travelled so far.
    #[must_use]
    pub const fn distance(&self) -> u32 {
        self.distance
    }

    /// Current lattice position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Damage before hitbox multipliers.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Moves the bullet one unit further along its trajectory.
    pub fn advance(&mut self) {
        self.distance += 1;
        let offset = self.direction * self.distance as f32;
        self.position = Point::new(
            self.origin.x + offset.x.round() as i32,
            self.origin.y + offset.y.round() as i32,
            self.origin.z + offset.z.round() as i32,
        );
    }

    /// Whether this bullet already hit `player`.
    #[must_use]
    pub fn has_hit(&self, player: PlayerId) -> bool {
        self.hit_players.contains(&player)
    }

    /// Records a hit on `player`.
    pub fn mark_hit(&mut self, player: PlayerId) {
        self.hit_players.insert(player);
    }
}
