//! Static level primitives: walls, floors and the box/ramp generators.
//!
//! Only axis-aligned shapes exist. A wall is a vertical rectangle whose width
//! spans either the X or the Z axis; a floor is a horizontal rectangle at a
//! fixed `y` layer.

use serde::{Deserialize, Serialize};
use tickshot_common::{Plane, Point, Point2D};

use crate::collision;

/// Bucket axis of a wall: the axis along which the wall has a fixed coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WallAxis {
    /// Stands at a fixed `x`, width spans Z, crossed by movement along X
    X,
    /// Stands at a fixed `z`, width spans X, crossed by movement along Z
    Z,
}

/// A vertical, axis-aligned wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    /// Lowest corner
    pub start: Point,
    /// Whether the width spans the X axis (otherwise Z)
    pub width_on_x: bool,
    /// Extent along the spanned axis
    pub width: i32,
    /// Vertical extent
    pub height: i32,
}

impl Wall {
    /// Creates a new wall.
    #[must_use]
    pub const fn new(start: Point, width_on_x: bool, width: i32, height: i32) -> Self {
        Self {
            start,
            width_on_x,
            width,
            height,
        }
    }

    /// Synthetic wall standing for the solid negative edges of the world.
    #[must_use]
    pub const fn boundary(width_on_x: bool) -> Self {
        Self::new(Point::new(-1, -1, -1), width_on_x, 0, 0)
    }

    /// Returns true for the synthetic world-edge wall.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.start == Point::new(-1, -1, -1) && self.width == 0 && self.height == 0
    }

    /// Returns the bucket axis.
    #[must_use]
    pub const fn axis(&self) -> WallAxis {
        if self.width_on_x {
            WallAxis::Z
        } else {
            WallAxis::X
        }
    }

    /// Returns the fixed coordinate on the bucket axis.
    #[must_use]
    pub const fn base(&self) -> i32 {
        if self.width_on_x {
            self.start.z
        } else {
            self.start.x
        }
    }

    /// Returns the top `y` of the wall.
    #[must_use]
    pub const fn ceiling(&self) -> i32 {
        self.start.y + self.height
    }

    /// Returns the projection plane the wall lives in.
    #[must_use]
    pub const fn plane(&self) -> Plane {
        if self.width_on_x {
            Plane::Xy
        } else {
            Plane::Zy
        }
    }

    /// Returns the lowest corner projected onto the wall plane.
    #[must_use]
    pub const fn start_2d(&self) -> Point2D {
        self.start.to_2d(self.plane())
    }

    /// Checks if a point on the wall plane lies on the wall.
    #[must_use]
    pub fn intersects(&self, point: Point2D) -> bool {
        collision::point_in_rect(point, self.start_2d(), self.width, self.height)
    }

    /// Returns the diagnostic record of this wall.
    #[must_use]
    pub const fn record(&self) -> WallRecord {
        WallRecord {
            base: self.base(),
            width: self.width,
            height: self.height,
            ceiling: self.ceiling(),
            axis: self.axis(),
        }
    }
}

/// A horizontal, axis-aligned floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    /// Corner with the lowest `x` and `z`
    pub start: Point,
    /// Extent along X
    pub width: i32,
    /// Extent along Z
    pub depth: i32,
}

impl Floor {
    /// Creates a new floor.
    #[must_use]
    pub const fn new(start: Point, width: i32, depth: i32) -> Self {
        Self {
            start,
            width,
            depth,
        }
    }

    /// Returns the layer of the floor.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.start.y
    }

    /// Checks if a circle on the `xz` plane touches the floor.
    #[must_use]
    pub fn intersects(&self, point: Point2D, radius: i32) -> bool {
        collision::circle_with_rect(
            point,
            radius,
            self.start.to_2d(Plane::Xz),
            self.width,
            self.depth,
        )
    }

    /// Returns the diagnostic record of this floor.
    #[must_use]
    pub const fn record(&self) -> FloorRecord {
        FloorRecord {
            y: self.y(),
            shape: FloorShape {
                x: self.start.x,
                z: self.start.z,
                width: self.width,
                depth: self.depth,
            },
        }
    }
}

/// Read-only wall export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallRecord {
    /// Fixed coordinate on the bucket axis
    pub base: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
    /// Top `y`
    pub ceiling: i32,
    /// Bucket axis
    pub axis: WallAxis,
}

/// Footprint of a floor on the `xz` plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorShape {
    /// Lowest x
    pub x: i32,
    /// Lowest z
    pub z: i32,
    /// Extent along X
    pub width: i32,
    /// Extent along Z
    pub depth: i32,
}

/// Read-only floor export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRecord {
    /// Layer
    pub y: i32,
    /// Footprint
    pub shape: FloorShape,
}

/// Which faces of a box are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSides {
    /// Wall at the lowest `z`
    pub front: bool,
    /// Wall at the highest `z`
    pub back: bool,
    /// Wall at the lowest `x`
    pub left: bool,
    /// Wall at the highest `x`
    pub right: bool,
    /// Floor on top
    pub top: bool,
}

impl Default for BoxSides {
    fn default() -> Self {
        Self::all()
    }
}

impl BoxSides {
    /// Every face.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            front: true,
            back: true,
            left: true,
            right: true,
            top: true,
        }
    }
}

/// Axis-aligned solid box, decomposed into walls and a top floor at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxShape {
    /// Corner with the lowest coordinates
    pub start: Point,
    /// Extent along X
    pub width: i32,
    /// Extent along Y
    pub height: i32,
    /// Extent along Z
    pub depth: i32,
    /// Generated faces
    #[serde(default)]
    pub sides: BoxSides,
}

impl BoxShape {
    /// Creates a box with every face.
    #[must_use]
    pub const fn new(start: Point, width: i32, height: i32, depth: i32) -> Self {
        Self {
            start,
            width,
            height,
            depth,
            sides: BoxSides::all(),
        }
    }

    /// Returns the box walls.
    #[must_use]
    pub fn walls(&self) -> Vec<Wall> {
        let mut walls = Vec::with_capacity(4);
        if self.sides.front {
            walls.push(Wall::new(self.start, true, self.width, self.height));
        }
        if self.sides.back {
            walls.push(Wall::new(
                self.start.add_z(self.depth),
                true,
                self.width,
                self.height,
            ));
        }
        if self.sides.left {
            walls.push(Wall::new(self.start, false, self.depth, self.height));
        }
        if self.sides.right {
            walls.push(Wall::new(
                self.start.add_x(self.width),
                false,
                self.depth,
                self.height,
            ));
        }
        walls
    }

    /// Returns the box floors (at most the top face).
    #[must_use]
    pub fn floors(&self) -> Vec<Floor> {
        if self.sides.top {
            vec![Floor::new(
                self.start.add_y(self.height),
                self.width,
                self.depth,
            )]
        } else {
            Vec::new()
        }
    }
}

/// Direction a ramp climbs towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampDirection {
    /// Climbs towards +X
    PositiveX,
    /// Climbs towards -X
    NegativeX,
    /// Climbs towards +Z
    PositiveZ,
    /// Climbs towards -Z
    NegativeZ,
}

/// A staircase built from boxes, each one step higher than the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampShape {
    /// Ground corner of the first step (lowest coordinates of the first step)
    pub start: Point,
    /// Climbing direction
    pub direction: RampDirection,
    /// Number of steps
    pub step_count: u32,
    /// Step extent across the climbing direction
    pub step_width: i32,
    /// Height gained per step
    pub step_height: i32,
    /// Step extent along the climbing direction
    pub step_depth: i32,
}

impl RampShape {
    /// Returns the boxes forming the ramp, lowest step first.
    #[must_use]
    pub fn boxes(&self) -> Vec<BoxShape> {
        (0..self.step_count as i32)
            .map(|i| {
                let height = (i + 1) * self.step_height;
                match self.direction {
                    RampDirection::PositiveX => BoxShape::new(
                        self.start.add_x(i * self.step_depth),
                        self.step_depth,
                        height,
                        self.step_width,
                    ),
                    RampDirection::NegativeX => BoxShape::new(
                        self.start.add_x(-i * self.step_depth),
                        self.step_depth,
                        height,
                        self.step_width,
                    ),
                    RampDirection::PositiveZ => BoxShape::new(
                        self.start.add_z(i * self.step_depth),
                        self.step_width,
                        height,
                        self.step_depth,
                    ),
                    RampDirection::NegativeZ => BoxShape::new(
                        self.start.add_z(-i * self.step_depth),
                        self.step_width,
                        height,
                        self.step_depth,
                    ),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_axis_and_base() {
        let along_x = Wall::new(Point::new(10, 0, 50), true, 100, 30);
        assert_eq!(along_x.axis(), WallAxis::Z);
        assert_eq!(along_x.base(), 50);
        assert_eq!(along_x.ceiling(), 30);
        assert_eq!(along_x.start_2d(), Point2D::new(10, 0));

        let along_z = Wall::new(Point::new(10, 5, 50), false, 100, 30);
        assert_eq!(along_z.axis(), WallAxis::X);
        assert_eq!(along_z.base(), 10);
        assert_eq!(along_z.ceiling(), 35);
        assert_eq!(along_z.start_2d(), Point2D::new(50, 5));
    }

    #[test]
    fn test_wall_intersects_projection() {
        let wall = Wall::new(Point::new(10, 0, 50), true, 100, 30);
        assert!(wall.intersects(Point2D::new(10, 0)));
        assert!(wall.intersects(Point2D::new(110, 30)));
        assert!(!wall.intersects(Point2D::new(111, 30)));
        assert!(!wall.intersects(Point2D::new(50, 31)));
    }

    #[test]
    fn test_boundary_wall() {
        assert!(Wall::boundary(true).is_boundary());
        assert!(!Wall::new(Point::new(-1, -1, -1), true, 1, 0).is_boundary());
    }

    #[test]
    fn test_floor_intersects_with_radius() {
        let floor = Floor::new(Point::new(0, 20, 0), 100, 100);
        assert!(floor.intersects(Point2D::new(50, 50), 0));
        assert!(!floor.intersects(Point2D::new(110, 50), 9));
        assert!(floor.intersects(Point2D::new(110, 50), 10));
    }

    #[test]
    fn test_box_decomposition() {
        let b = BoxShape::new(Point::new(100, 0, 200), 50, 20, 40);
        let walls = b.walls();
        assert_eq!(walls.len(), 4);
        assert_eq!(walls[0].axis(), WallAxis::Z);
        assert_eq!(walls[0].base(), 200);
        assert_eq!(walls[1].base(), 240);
        assert_eq!(walls[2].axis(), WallAxis::X);
        assert_eq!(walls[2].base(), 100);
        assert_eq!(walls[3].base(), 150);
        assert!(walls.iter().all(|w| w.ceiling() == 20));

        let floors = b.floors();
        assert_eq!(floors, vec![Floor::new(Point::new(100, 20, 200), 50, 40)]);
    }

    #[test]
    fn test_box_without_top() {
        let mut b = BoxShape::new(Point::new(0, 0, 0), 10, 10, 10);
        b.sides.top = false;
        b.sides.back = false;
        assert!(b.floors().is_empty());
        assert_eq!(b.walls().len(), 3);
    }

    #[test]
    fn test_ramp_steps_climb() {
        let ramp = RampShape {
            start: Point::new(0, 0, 0),
            direction: RampDirection::PositiveZ,
            step_count: 3,
            step_width: 60,
            step_height: 10,
            step_depth: 20,
        };
        let boxes = ramp.boxes();
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[2].start, Point::new(0, 0, 40));
        assert_eq!(boxes[2].height, 30);
        assert_eq!(boxes[2].width, 60);
        assert_eq!(boxes[2].depth, 20);
    }

    #[test]
    fn test_records() {
        let wall = Wall::new(Point::new(10, 0, 50), false, 100, 30);
        let record = wall.record();
        assert_eq!(record.base, 10);
        assert_eq!(record.axis, WallAxis::X);

        let floor = Floor::new(Point::new(1, 2, 3), 4, 5);
        assert_eq!(floor.record().y, 2);
        assert_eq!(floor.record().shape.depth, 5);
    }
}
