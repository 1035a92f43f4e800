//! Hit targets returned by shot resolution.

use serde::{Deserialize, Serialize};
use tickshot_common::{PlayerId, Point};

use crate::geometry::{Floor, Wall};

/// Outcome of a bullet passing through one player collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitBox {
    /// Player that was hit
    pub player: PlayerId,
    /// Bullet position at the hit
    pub position: Point,
    /// Damage dealt after multipliers
    pub damage: i32,
    /// Whether the head zone was hit
    pub headshot: bool,
    /// Whether the hit was lethal
    pub killed: bool,
}

/// Anything a bullet can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HitTarget {
    /// A player hitbox
    Player(HitBox),
    /// A floor, always the last target of a shot
    Floor {
        /// Floor that stopped the bullet
        floor: Floor,
        /// Bullet position
        position: Point,
    },
    /// A wall, always the last target of a shot
    Wall {
        /// Wall that was hit
        wall: Wall,
        /// Bullet position
        position: Point,
    },
}

impl HitTarget {
    /// Bullet position at the hit.
    #[must_use]
    pub const fn position(&self) -> Point {
        match self {
            Self::Player(hit) => hit.position,
            Self::Floor { position, .. } | Self::Wall { position, .. } => *position,
        }
    }

    /// Whether the hit killed a player.
    #[must_use]
    pub const fn is_kill(&self) -> bool {
        matches!(self, Self::Player(HitBox { killed: true, .. }))
    }

    /// Whether the hit was a headshot.
    #[must_use]
    pub const fn was_headshot(&self) -> bool {
        matches!(self, Self::Player(HitBox { headshot: true, .. }))
    }

    /// Whether the target is level geometry.
    #[must_use]
    pub const fn is_terrain(&self) -> bool {
        !matches!(self, Self::Player(_))
    }
}
