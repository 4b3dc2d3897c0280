//! The 5x5 board.
//!
//! The board owns every unit of a match in an arena and references them
//! from its cells by [`UnitId`]. Cells are only written through the
//! mutation primitives below, which keep a live unit's stored position
//! equal to the cell that references it.

use super::unit::{Position, Side, Unit, UnitId};
use crate::error::RuleError;

/// Number of rows and columns.
pub const BOARD_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<UnitId>; BOARD_SIZE]; BOARD_SIZE],
    units: Vec<Unit>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board with no units.
    pub fn new() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            units: Vec::new(),
        }
    }

    /// Returns true if the position lies on the grid.
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        slot(pos).is_some()
    }

    /// Returns true if no unit occupies the position. Off-grid cells are empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.unit_at(pos).is_none()
    }

    /// Returns the unit occupying the position, if any.
    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        slot(pos).and_then(|(r, c)| self.cells[r][c])
    }

    /// Returns the unit behind a handle.
    ///
    /// # Panics
    /// If the handle was not issued by this board.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }

    /// Iterates over every unit ever placed on this board, captured ones included.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units.iter().enumerate().map(|(i, u)| (UnitId(i), u))
    }

    /// Counts the live units belonging to a side.
    pub fn alive_count(&self, side: Side) -> usize {
        self.units
            .iter()
            .filter(|u| u.side == side && u.alive)
            .count()
    }

    /// Adds a unit to the arena and puts it on the given cell.
    pub fn place(&mut self, mut unit: Unit, pos: Position) -> Result<UnitId, RuleError> {
        let (r, c) = slot(pos).ok_or(RuleError::OutOfBounds {
            row: pos.row,
            col: pos.col,
        })?;
        if self.cells[r][c].is_some() {
            return Err(RuleError::SlotOccupied {
                row: pos.row,
                col: pos.col,
            });
        }

        let id = UnitId(self.units.len());
        unit.position = pos;
        unit.alive = true;
        self.units.push(unit);
        self.cells[r][c] = Some(id);
        Ok(id)
    }

    /// Moves a unit to a new cell.
    ///
    /// Fails if the target is off the grid or holds a unit of the same side.
    /// An enemy standing on the target is captured. Whether the move has a
    /// legal shape is decided by the caller. Returns the captured unit.
    pub fn move_unit(&mut self, id: UnitId, to: Position) -> Result<Option<UnitId>, RuleError> {
        let (r, c) = slot(to).ok_or(RuleError::OutOfBounds {
            row: to.row,
            col: to.col,
        })?;
        let side = self.units[id.0].side;

        let captured = match self.cells[r][c] {
            Some(other) if other == id => return Ok(None),
            Some(other) if self.units[other.0].side == side => {
                return Err(RuleError::FriendlyBlocked)
            }
            Some(other) => {
                self.units[other.0].alive = false;
                Some(other)
            }
            None => None,
        };

        if let Some((fr, fc)) = slot(self.units[id.0].position) {
            if self.cells[fr][fc] == Some(id) {
                self.cells[fr][fc] = None;
            }
        }
        self.cells[r][c] = Some(id);
        self.units[id.0].position = to;
        Ok(captured)
    }

    /// Removes the unit on a cell from play. Returns the captured unit.
    pub fn capture(&mut self, pos: Position) -> Option<UnitId> {
        let (r, c) = slot(pos)?;
        let id = self.cells[r][c].take()?;
        self.units[id.0].alive = false;
        Some(id)
    }
}

/// Maps an on-grid position to array indices.
fn slot(pos: Position) -> Option<(usize, usize)> {
    let size = BOARD_SIZE as i32;
    if (0..size).contains(&pos.row) && (0..size).contains(&pos.col) {
        Some((pos.row as usize, pos.col as usize))
    } else {
        None
    }
}

/// Asserts that every occupied cell references a live unit whose position
/// is that cell, and that every live unit occupies a cell.
#[cfg(test)]
pub(crate) fn assert_consistent(board: &Board) {
    let mut seen = 0;
    for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
            let pos = Position::new(row, col);
            if let Some(id) = board.unit_at(pos) {
                let unit = board.unit(id);
                assert!(unit.is_alive(), "dead unit {} left at {}", unit.name, pos);
                assert_eq!(unit.position(), pos);
                seen += 1;
            }
        }
    }
    let alive = board.units().filter(|(_, u)| u.is_alive()).count();
    assert_eq!(seen, alive, "every live unit occupies exactly one cell");
}
