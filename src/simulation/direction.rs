use serde::{Deserialize, Serialize};
use super::{Point, Vec2, SPAWN_OFFSET};
use crate::config::PlayfieldConfig;

/// Lane offsets across the field for each approach.
const NORTH_BOUND_LANE_X: f32 = 330.0;
const SOUTH_BOUND_LANE_X: f32 = 250.0;
const EAST_BOUND_LANE_Y: f32 = 430.0;
const WEST_BOUND_LANE_Y: f32 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    NorthBound,
    SouthBound,
    EastBound,
    WestBound,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::NorthBound,
        Direction::SouthBound,
        Direction::EastBound,
        Direction::WestBound,
    ];

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::NorthBound | Direction::SouthBound)
    }

    /// Unit displacement per tick in screen space (y grows downwards).
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::NorthBound => Vec2::new(0.0, -1.0),
            Direction::SouthBound => Vec2::new(0.0, 1.0),
            Direction::EastBound => Vec2::new(1.0, 0.0),
            Direction::WestBound => Vec2::new(-1.0, 0.0),
        }
    }

    /// Top-left corner where a car on this approach enters, one offset outside the field.
    pub fn spawn_origin(&self, playfield: &PlayfieldConfig) -> Point {
        match self {
            Direction::NorthBound => Point::new(NORTH_BOUND_LANE_X, playfield.height + SPAWN_OFFSET),
            Direction::SouthBound => Point::new(SOUTH_BOUND_LANE_X, -SPAWN_OFFSET),
            Direction::EastBound => Point::new(-SPAWN_OFFSET, EAST_BOUND_LANE_Y),
            Direction::WestBound => Point::new(playfield.width + SPAWN_OFFSET, WEST_BOUND_LANE_Y),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::NorthBound => "north-bound",
            Direction::SouthBound => "south-bound",
            Direction::EastBound => "east-bound",
            Direction::WestBound => "west-bound",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
