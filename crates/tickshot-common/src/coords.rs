//! Integer coordinate types and their 2D projections.
//!
//! All simulation geometry lives on an integer lattice so that the same
//! inputs classify identically on every tick. `y` is the vertical axis.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A point in world space.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(C)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate (up)
    pub y: i32,
    /// Z coordinate
    pub z: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns a copy with `x` replaced.
    #[must_use]
    pub const fn with_x(self, x: i32) -> Self {
        Self { x, ..self }
    }

    /// Returns a copy with `y` replaced.
    #[must_use]
    pub const fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    /// Returns a copy with `z` replaced.
    #[must_use]
    pub const fn with_z(self, z: i32) -> Self {
        Self { z, ..self }
    }

    /// Returns a copy offset along the x axis.
    #[must_use]
    pub const fn add_x(self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            ..self
        }
    }

    /// Returns a copy offset along the y axis.
    #[must_use]
    pub const fn add_y(self, dy: i32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    /// Returns a copy offset along the z axis.
    #[must_use]
    pub const fn add_z(self, dz: i32) -> Self {
        Self {
            z: self.z + dz,
            ..self
        }
    }

    /// Projects the point onto a named plane.
    #[must_use]
    pub const fn to_2d(self, plane: Plane) -> Point2D {
        match plane {
            Plane::Xz => Point2D::new(self.x, self.z),
            Plane::Xy => Point2D::new(self.x, self.y),
            Plane::Zy => Point2D::new(self.z, self.y),
        }
    }

    /// Returns true when both horizontal coordinates are non-negative.
    #[must_use]
    pub const fn is_inside_horizontal_bounds(self) -> bool {
        self.x >= 0 && self.z >= 0
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Projection planes. The first named axis becomes the 2D `x`, the second the 2D `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    /// Horizontal plane (floors)
    Xz,
    /// Vertical plane at a fixed z
    Xy,
    /// Vertical plane at a fixed x
    Zy,
}

/// A point on a projection plane.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(C)]
pub struct Point2D {
    /// First plane axis
    pub x: i32,
    /// Second plane axis
    pub y: i32,
}

impl Point2D {
    /// Creates a new 2D point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns a copy offset along the first plane axis.
    #[must_use]
    pub const fn add_x(self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}
