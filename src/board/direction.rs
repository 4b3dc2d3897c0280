//! Movement directions.
//!
//! Directions are absolute to the board: `Forward` always decreases the
//! row index, whichever side is moving.

use crate::error::RuleError;

/// One of the eight directions a unit can be ordered to move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
}

pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::Forward,
    Direction::Backward,
    Direction::Left,
    Direction::Right,
    Direction::ForwardLeft,
    Direction::ForwardRight,
    Direction::BackwardLeft,
    Direction::BackwardRight,
];

impl Direction {
    /// Returns the one-cell `(row, col)` delta.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Forward => (-1, 0),
            Direction::Backward => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::ForwardLeft => (-1, -1),
            Direction::ForwardRight => (-1, 1),
            Direction::BackwardLeft => (1, -1),
            Direction::BackwardRight => (1, 1),
        }
    }

    /// Returns the short wire token (`F`, `BL`, ...).
    pub const fn token(self) -> &'static str {
        match self {
            Direction::Forward => "F",
            Direction::Backward => "B",
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::ForwardLeft => "FL",
            Direction::ForwardRight => "FR",
            Direction::BackwardLeft => "BL",
            Direction::BackwardRight => "BR",
        }
    }

    /// Parses a direction from its short token or long name, ignoring case.
    pub fn parse(s: &str) -> Result<Direction, RuleError> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        let dir = match normalized.as_str() {
            "F" | "FORWARD" => Direction::Forward,
            "B" | "BACKWARD" => Direction::Backward,
            "L" | "LEFT" => Direction::Left,
            "R" | "RIGHT" => Direction::Right,
            "FL" | "FORWARD_LEFT" | "FORWARDLEFT" => Direction::ForwardLeft,
            "FR" | "FORWARD_RIGHT" | "FORWARDRIGHT" => Direction::ForwardRight,
            "BL" | "BACKWARD_LEFT" | "BACKWARDLEFT" => Direction::BackwardLeft,
            "BR" | "BACKWARD_RIGHT" | "BACKWARDRIGHT" => Direction::BackwardRight,
            _ => return Err(RuleError::InvalidDirection(s.to_string())),
        };
        Ok(dir)
    }
}
