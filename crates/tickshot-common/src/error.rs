//! Error types for Tickshot.
//!
//! Every variant is a configuration or programmer error. Ordinary gameplay
//! outcomes (blocked movement, empty magazine, ...) are never errors.

use thiserror::Error;

use crate::ids::{PlayerId, Side};

/// Fatal simulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A query needed map data but no map has been loaded
    #[error("no map is loaded")]
    NoMapLoaded,

    /// Floors only exist at non-negative layers
    #[error("floor query at negative y {y}")]
    NegativeFloorY {
        /// Offending layer
        y: i32,
    },

    /// Every spawn candidate of a side is already taken this round
    #[error("cannot find free spawn position for '{side}' player")]
    NoFreeSpawn {
        /// Requested side
        side: Side,
    },

    /// The configured movement speed for a gait is unusable
    #[error("no movement speed configured for gait '{gait}'")]
    NoMovementSpeed {
        /// Gait name
        gait: &'static str,
    },

    /// A player id has no collider in the world
    #[error("unknown player {id}")]
    UnknownPlayer {
        /// Missing player
        id: PlayerId,
    },
}

/// Result type alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
