//! One side of a match.

use crate::board::{Board, Side, UnitId};
use crate::resolve::PlacementEntry;

/// A side's identity, display name, deployed units and pending placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub side: Side,
    pub name: String,
    pub(crate) units: Vec<UnitId>,
    pub(crate) pending: Option<Vec<PlacementEntry>>,
}

impl Roster {
    /// Creates a roster with no units.
    pub fn new(side: Side, name: impl Into<String>) -> Self {
        Roster {
            side,
            name: name.into(),
            units: Vec::new(),
            pending: None,
        }
    }

    /// Returns true once a display name has been assigned.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// Returns true if a placement is waiting for the other side.
    pub fn has_pending_placement(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the handles of this side's deployed units in placement order.
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    /// Finds a deployed unit by display name.
    pub fn find_unit(&self, board: &Board, name: &str) -> Option<UnitId> {
        self.units
            .iter()
            .copied()
            .find(|&id| board.unit(id).name == name)
    }

    /// Drops deployed units and any pending placement.
    pub(crate) fn clear(&mut self) {
        self.units.clear();
        self.pending = None;
    }
}
