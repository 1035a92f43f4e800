//! # Tickshot Sim
//!
//! Authoritative, tick-based simulation core for Tickshot.
//!
//! This crate provides:
//! - Exact integer collision predicates
//! - Bucketed geometry store (walls by axis, floors by layer)
//! - World: colliders, shot resolution, spawn allocation, events
//! - Movement resolver with step-over, wall sliding and gravity
//! - Attack pipeline with stance-dependent recoil
//! - Fixed-order tick runner
//!
//! All randomness goes through [`RandomSource`], so a seeded or scripted
//! source replays a match exactly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod attack;
pub mod bullet;
pub mod collider;
pub mod collision;
pub mod events;
pub mod geometry;
pub mod hit;
pub mod item;
pub mod map;
pub mod movement;
pub mod player;
pub mod rng;
pub mod settings;
pub mod sound;
pub mod spawn;
pub mod store;
pub mod tick;
pub mod world;

mod scenario_tests;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attack::*;
    pub use crate::bullet::*;
    pub use crate::collider::*;
    pub use crate::collision::*;
    pub use crate::events::*;
    pub use crate::geometry::*;
    pub use crate::hit::*;
    pub use crate::item::*;
    pub use crate::map::*;
    pub use crate::movement::*;
    pub use crate::player::*;
    pub use crate::rng::*;
    pub use crate::settings::*;
    pub use crate::sound::*;
    pub use crate::spawn::*;
    pub use crate::store::*;
    pub use crate::tick::*;
    pub use crate::world::*;
}

pub use prelude::*;
