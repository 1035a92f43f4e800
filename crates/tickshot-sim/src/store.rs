//! Bucketed storage for static level geometry.
//!
//! Walls are bucketed by axis and base coordinate so that a point query scans
//! at most one bucket per axis. Floors are bucketed by their exact `y` layer so
//! floors on different layers never interfere.

use ahash::AHashMap;
use tickshot_common::{Plane, Point, SimError, SimResult};
use tracing::trace;

use crate::collision;
use crate::geometry::{BoxShape, Floor, FloorRecord, RampShape, Wall, WallAxis, WallRecord};

/// Ceiling reported for the world edge: never climbable.
pub const BOUNDARY_CEILING: i32 = i32::MAX;

/// Radii probed by [`GeometryStore::find_floor`].
///
/// Small radii are probed one by one; past 3 the search jumps ahead by 8,
/// capped so the requested radius itself is always probed last.
#[derive(Debug, Clone)]
pub struct FloorSearchRadii {
    next: i32,
    max: i32,
}

impl FloorSearchRadii {
    /// Creates the probe sequence for a maximum radius.
    #[must_use]
    pub const fn new(max: i32) -> Self {
        Self { next: 0, max }
    }
}

impl Iterator for FloorSearchRadii {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.next > self.max {
            return None;
        }
        let r = self.next;
        let mut following = r;
        if r > 3 && r < self.max {
            following = (r + 8).min(self.max - 1);
        }
        self.next = following + 1;
        Some(r)
    }
}

/// Owns every wall and floor of the loaded level.
#[derive(Debug, Default, Clone)]
pub struct GeometryStore {
    /// Walls standing at a fixed x, keyed by x
    x_walls: AHashMap<i32, Vec<Wall>>,
    /// Walls standing at a fixed z, keyed by z
    z_walls: AHashMap<i32, Vec<Wall>>,
    /// Floors keyed by y
    floors: AHashMap<i32, Vec<Floor>>,
}

impl GeometryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all geometry.
    pub fn clear(&mut self) {
        self.x_walls.clear();
        self.z_walls.clear();
        self.floors.clear();
    }

    /// Adds a wall to the bucket of its axis and base coordinate.
    pub fn add_wall(&mut self, wall: Wall) {
        let buckets = match wall.axis() {
            WallAxis::X => &mut self.x_walls,
            WallAxis::Z => &mut self.z_walls,
        };
        buckets.entry(wall.base()).or_default().push(wall);
    }

    /// Adds a floor to the bucket of its layer.
    pub fn add_floor(&mut self, floor: Floor) {
        self.floors.entry(floor.y()).or_default().push(floor);
    }

    /// Adds every wall and floor of a box.
    pub fn add_box(&mut self, shape: &BoxShape) {
        for wall in shape.walls() {
            self.add_wall(wall);
        }
        for floor in shape.floors() {
            self.add_floor(floor);
        }
    }

    /// Adds every step of a ramp.
    pub fn add_ramp(&mut self, ramp: &RampShape) {
        for shape in ramp.boxes() {
            self.add_box(&shape);
        }
    }

    /// Returns the number of stored walls.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.x_walls.values().chain(self.z_walls.values()).map(Vec::len).sum()
    }

    /// Returns the number of stored floors.
    #[must_use]
    pub fn floor_count(&self) -> usize {
        self.floors.values().map(Vec::len).sum()
    }

    fn bucket(&self, axis: WallAxis, base: i32) -> &[Wall] {
        let buckets = match axis {
            WallAxis::X => &self.x_walls,
            WallAxis::Z => &self.z_walls,
        };
        buckets.get(&base).map_or(&[], Vec::as_slice)
    }

    /// Returns the wall occupying a point, if any.
    ///
    /// Points with a negative `x` or `z` always hit the boundary wall.
    #[must_use]
    pub fn is_wall_at(&self, point: Point) -> Option<Wall> {
        if point.x < 0 || point.z < 0 {
            return Some(Wall::boundary(point.z < 0));
        }

        let candidate_z = point.to_2d(Plane::Xy);
        if let Some(wall) = self
            .bucket(WallAxis::Z, point.z)
            .iter()
            .find(|wall| wall.intersects(candidate_z))
        {
            return Some(*wall);
        }

        let candidate_x = point.to_2d(Plane::Zy);
        self.bucket(WallAxis::X, point.x)
            .iter()
            .find(|wall| wall.intersects(candidate_x))
            .copied()
    }

    /// Finds a floor on the layer of `point` within `radius` of it.
    ///
    /// The first floor (in insertion order) touched at the smallest probed
    /// radius wins.
    pub fn find_floor(&self, point: Point, radius: i32) -> SimResult<Option<Floor>> {
        if point.y < 0 {
            return Err(SimError::NegativeFloorY { y: point.y });
        }

        let Some(floors) = self.floors.get(&point.y) else {
            return Ok(None);
        };
        let candidate = point.to_2d(Plane::Xz);
        for r in FloorSearchRadii::new(radius) {
            if let Some(floor) = floors.iter().find(|floor| floor.intersects(candidate, r)) {
                trace!(y = point.y, radius = r, "floor found");
                return Ok(Some(*floor));
            }
        }
        Ok(None)
    }

    /// Checks if a circle at `position` stands on `floor`.
    #[must_use]
    pub fn is_on_floor(&self, floor: &Floor, position: Point, radius: i32) -> bool {
        if floor.y() != position.y {
            return false;
        }
        floor.intersects(position.to_2d(Plane::Xz), radius)
    }

    /// Walls of one bucket that a player slab at `center` would touch.
    ///
    /// A wall whose ceiling is exactly at the player's feet is skipped:
    /// standing flush on top of a wall is not a collision.
    fn colliding_walls(
        &self,
        axis: WallAxis,
        center: Point,
        height: i32,
        radius: i32,
    ) -> impl Iterator<Item = &Wall> + '_ {
        let (base, plane) = match axis {
            WallAxis::X => (center.x, Plane::Zy),
            WallAxis::Z => (center.z, Plane::Xy),
        };
        let candidate = center.to_2d(plane).add_x(-radius);
        self.bucket(axis, base).iter().filter(move |wall| {
            wall.ceiling() != center.y
                && collision::rect_with_rect(
                    wall.start_2d(),
                    wall.width,
                    wall.height,
                    candidate,
                    2 * radius,
                    height,
                )
        })
    }

    fn side_wall_collision(
        &self,
        axis: WallAxis,
        center: Point,
        height: i32,
        radius: i32,
    ) -> Option<Wall> {
        let outside = match axis {
            WallAxis::X => center.x < 0,
            WallAxis::Z => center.z < 0,
        };
        if outside {
            return Some(Wall::boundary(axis == WallAxis::Z));
        }
        self.colliding_walls(axis, center, height, radius)
            .next()
            .copied()
    }

    /// Returns a wall blocking movement across the X axis at `center`.
    #[must_use]
    pub fn check_x_side_wall_collision(
        &self,
        center: Point,
        height: i32,
        radius: i32,
    ) -> Option<Wall> {
        self.side_wall_collision(WallAxis::X, center, height, radius)
    }

    /// Returns a wall blocking movement across the Z axis at `center`.
    #[must_use]
    pub fn check_z_side_wall_collision(
        &self,
        center: Point,
        height: i32,
        radius: i32,
    ) -> Option<Wall> {
        self.side_wall_collision(WallAxis::Z, center, height, radius)
    }

    fn highest_wall(
        &self,
        axis: WallAxis,
        center: Point,
        height: i32,
        radius: i32,
        max_ceiling: i32,
    ) -> Option<i32> {
        let outside = match axis {
            WallAxis::X => center.x < 0,
            WallAxis::Z => center.z < 0,
        };
        if outside {
            return Some(BOUNDARY_CEILING);
        }

        let mut highest = None;
        for wall in self.colliding_walls(axis, center, height, radius) {
            let ceiling = wall.ceiling();
            if ceiling > max_ceiling {
                return Some(ceiling);
            }
            highest = highest.max(Some(ceiling));
        }
        highest
    }

    /// Returns the highest ceiling among walls blocking the X crossing at `center`.
    ///
    /// `None` means the crossing is clear. The scan stops early at the first
    /// ceiling above `max_ceiling`.
    #[must_use]
    pub fn highest_x_wall(
        &self,
        center: Point,
        height: i32,
        radius: i32,
        max_ceiling: i32,
    ) -> Option<i32> {
        self.highest_wall(WallAxis::X, center, height, radius, max_ceiling)
    }

    /// Returns the highest ceiling among walls blocking the Z crossing at `center`.
    #[must_use]
    pub fn highest_z_wall(
        &self,
        center: Point,
        height: i32,
        radius: i32,
        max_ceiling: i32,
    ) -> Option<i32> {
        self.highest_wall(WallAxis::Z, center, height, radius, max_ceiling)
    }

    /// Ordered wall export: X axis buckets then Z axis buckets, by base, in insertion order.
    #[must_use]
    pub fn walls(&self) -> Vec<WallRecord> {
        let mut output = Vec::with_capacity(self.wall_count());
        for buckets in [&self.x_walls, &self.z_walls] {
            let mut bases: Vec<_> = buckets.keys().copied().collect();
            bases.sort_unstable();
            for base in bases {
                output.extend(buckets[&base].iter().map(Wall::record));
            }
        }
        output
    }

    /// Ordered floor export: by layer, in insertion order.
    #[must_use]
    pub fn floors(&self) -> Vec<FloorRecord> {
        let mut layers: Vec<_> = self.floors.keys().copied().collect();
        layers.sort_unstable();
        layers
            .into_iter()
            .flat_map(|y| self.floors[&y].iter().map(Floor::record))
            .collect()
    }
}
