//! Map description handed over by the map provider.
//!
//! The on-disk format is up to the caller; anything serde can read works.

use serde::{Deserialize, Serialize};
use tickshot_common::{Point, Side};

use crate::geometry::{BoxShape, Floor, RampDirection, RampShape, Wall};

/// Static geometry and spawn candidates of one map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDef {
    /// Display name
    pub name: String,
    /// Free-standing walls
    pub walls: Vec<Wall>,
    /// Free-standing floors
    pub floors: Vec<Floor>,
    /// Solid boxes
    pub boxes: Vec<BoxShape>,
    /// Staircases
    pub ramps: Vec<RampShape>,
    /// Ordered attacker spawn candidates
    pub spawn_attacker: Vec<Point>,
    /// Ordered defender spawn candidates
    pub spawn_defender: Vec<Point>,
}

impl MapDef {
    /// Spawn candidates of a side.
    #[must_use]
    pub fn spawns(&self, side: Side) -> &[Point] {
        match side {
            Side::Attacker => &self.spawn_attacker,
            Side::Defender => &self.spawn_defender,
        }
    }

    /// A small square arena with a step, a crate and a staircase.
    #[must_use]
    pub fn practice_arena() -> Self {
        const SIZE: i32 = 2000;
        const WALL_HEIGHT: i32 = 400;

        Self {
            name: "practice-arena".to_string(),
            walls: vec![
                Wall::new(Point::new(SIZE, 0, 0), false, SIZE, WALL_HEIGHT),
                Wall::new(Point::new(0, 0, SIZE), true, SIZE, WALL_HEIGHT),
            ],
            floors: vec![Floor::new(Point::new(0, 0, 0), SIZE, SIZE)],
            boxes: vec![
                BoxShape::new(Point::new(600, 0, 900), 300, 20, 200),
                BoxShape::new(Point::new(1200, 0, 900), 200, 120, 200),
            ],
            ramps: vec![RampShape {
                start: Point::new(300, 0, 1300),
                direction: RampDirection::PositiveX,
                step_count: 6,
                step_width: 200,
                step_height: 15,
                step_depth: 60,
            }],
            spawn_attacker: (0..5).map(|i| Point::new(200 + i * 150, 0, 150)).collect(),
            spawn_defender: (0..5).map(|i| Point::new(200 + i * 150, 0, 1850)).collect(),
        }
    }
}
