//! # Tickshot Common
//!
//! Common types shared by the Tickshot simulation crates:
//! - Integer coordinates and plane projections
//! - ID types (players, items, sides)
//! - Simulation error type
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_projections() {
        let p = Point::new(1, 2, 3);
        assert_eq!(p.to_2d(Plane::Xz), Point2D::new(1, 3));
        assert_eq!(p.to_2d(Plane::Xy), Point2D::new(1, 2));
        assert_eq!(p.to_2d(Plane::Zy), Point2D::new(3, 2));
    }

    #[test]
    fn test_point_offsets_are_copies() {
        let p = Point::new(5, 5, 5);
        let moved = p.add_x(2).add_z(-1).with_y(0);
        assert_eq!(p, Point::new(5, 5, 5));
        assert_eq!(moved, Point::new(7, 0, 4));
    }

    #[test]
    fn test_side_names() {
        assert_eq!(Side::from_attacker(true), Side::Attacker);
        assert_eq!(Side::Defender.to_string(), "defender");
    }

    #[test]
    fn test_error_messages() {
        let err = SimError::NoFreeSpawn {
            side: Side::Attacker,
        };
        assert_eq!(
            err.to_string(),
            "cannot find free spawn position for 'attacker' player"
        );
    }

    proptest! {
        #[test]
        fn prop_bounds_match_sign(x in -100i32..100, y in 0i32..100, z in -100i32..100) {
            let p = Point::new(x, y, z);
            prop_assert_eq!(p.is_inside_horizontal_bounds(), x >= 0 && z >= 0);
        }
    }
}
