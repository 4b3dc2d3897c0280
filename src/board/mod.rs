//! Board representation and unit types.
//!
//! Contains the grid, the unit arena it references, and the movement
//! directions units can be ordered in.

pub mod direction;
pub mod grid;
pub mod unit;

pub use direction::{Direction, ALL_DIRECTIONS};
pub use grid::{Board, BOARD_SIZE};
pub use unit::{Position, Side, Unit, UnitId, UnitKind, ALL_SIDES};
