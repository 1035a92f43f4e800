//! Per-player collision volume owned by the world.

use serde::{Deserialize, Serialize};
use tickshot_common::{PlayerId, Point};
use tracing::debug;

use crate::bullet::Bullet;
use crate::collision;
use crate::geometry::Floor;
use crate::hit::HitBox;
use crate::settings::SimSettings;

/// Body dimensions shared by every player of one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    /// Horizontal collision radius
    pub radius: i32,
    /// Height of the top of the head above the feet
    pub head_height: i32,
    /// Radius of the head zone
    pub head_radius: i32,
    /// Eye height above the feet
    pub sight_height: i32,
}

impl Default for Archetype {
    fn default() -> Self {
        Self {
            radius: 44,
            head_height: 190,
            head_radius: 16,
            sight_height: 180,
        }
    }
}

/// Armor worn by a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorType {
    /// Unprotected
    #[default]
    None,
    /// Vest
    Body,
    /// Vest and helmet
    BodyAndHead,
}

impl ArmorType {
    /// Whether body hits are reduced.
    #[must_use]
    pub const fn protects_body(self) -> bool {
        matches!(self, Self::Body | Self::BodyAndHead)
    }

    /// Whether head hits are reduced.
    #[must_use]
    pub const fn protects_head(self) -> bool {
        matches!(self, Self::BodyAndHead)
    }
}

/// Collision and damage state of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCollider {
    /// Owner
    pub id: PlayerId,
    /// Feet position
    pub position: Point,
    /// Body dimensions
    pub archetype: Archetype,
    /// Floor currently supporting the player
    pub active_floor: Option<Floor>,
    /// Remaining health
    pub health: i32,
    /// Worn armor
    pub armor: ArmorType,
    /// Whether the player is alive this round
    pub alive: bool,
}

impl PlayerCollider {
    /// Creates a live collider at the origin.
    #[must_use]
    pub fn new(id: PlayerId, archetype: Archetype, health: i32) -> Self {
        Self {
            id,
            position: Point::default(),
            archetype,
            active_floor: None,
            health,
            armor: ArmorType::None,
            alive: true,
        }
    }

    /// Resets round-scoped state.
    pub fn round_reset(&mut self, health: i32) {
        self.active_floor = None;
        self.health = health;
        self.alive = true;
    }

    /// Checks if another body standing at `point` would overlap this one.
    #[must_use]
    pub fn collide(&self, point: Point, radius: i32, height: i32) -> bool {
        collision::cylinder_overlap(
            point,
            radius,
            height,
            self.position,
            self.archetype.radius,
            self.archetype.head_height,
        )
    }

    /// Checks if `point` lies inside this collider's body.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if point.y < self.position.y || point.y > self.position.y + self.archetype.head_height {
            return false;
        }
        let dx = i64::from(point.x) - i64::from(self.position.x);
        let dz = i64::from(point.z) - i64::from(self.position.z);
        let r = i64::from(self.archetype.radius);
        dx * dx + dz * dz <= r * r
    }

    /// Applies a bullet passing through this collider.
    ///
    /// Returns `None` when the bullet misses or the player is already dead.
    pub fn try_hit(&mut self, bullet: &Bullet, settings: &SimSettings) -> Option<HitBox> {
        if !self.alive {
            return None;
        }
        let position = bullet.position();
        if !self.contains(position) {
            return None;
        }

        let head_floor =
            self.position.y + self.archetype.head_height - 2 * self.archetype.head_radius;
        let headshot = position.y >= head_floor;

        let mut damage = bullet.damage() as f32;
        if headshot {
            damage *= settings.headshot_multiplier;
        }
        let armored = if headshot {
            self.armor.protects_head()
        } else {
            self.armor.protects_body()
        };
        if armored {
            damage *= settings.armor_damage_factor;
        }
        let damage = damage.round() as i32;

        self.health -= damage;
        let killed = self.health <= 0;
        if killed {
            self.health = 0;
            self.alive = false;
        }
        debug!(player = %self.id, damage, headshot, killed, "player hit");

        Some(HitBox {
            player: self.id,
            position,
            damage,
            headshot,
            killed,
        })
    }
}
