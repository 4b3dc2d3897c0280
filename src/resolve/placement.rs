//! Setup-phase placement.
//!
//! Each side submits five unit names. The first two characters of a name
//! are its unit code and pick the unit kind; units are deployed on the
//! side's home row in submission order, one per column.

use crate::board::{Board, Position, Side, Unit, UnitId, UnitKind};
use crate::error::RuleError;

/// Number of units each side deploys.
pub const ROSTER_SIZE: usize = 5;

/// A validated placement entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementEntry {
    pub name: String,
    pub kind: UnitKind,
}

/// Resolves the unit kind for a unit name from its two-character code.
pub fn kind_for_name(name: &str) -> Result<UnitKind, RuleError> {
    name.get(..2)
        .and_then(UnitKind::from_code)
        .ok_or_else(|| RuleError::InvalidUnitCode(name.to_string()))
}

/// Checks a submitted placement list: exactly five names, each with a
/// known code, no name used twice.
///
/// Names may not contain `:`, which separates the unit name from the
/// direction in a move command.
pub fn validate_placement(names: &[String]) -> Result<Vec<PlacementEntry>, RuleError> {
    if names.len() != ROSTER_SIZE {
        return Err(RuleError::PlacementCount(names.len()));
    }

    let mut entries: Vec<PlacementEntry> = Vec::with_capacity(ROSTER_SIZE);
    for name in names {
        if name.contains(':') {
            return Err(RuleError::InvalidUnitCode(name.clone()));
        }
        let kind = kind_for_name(name)?;
        if entries.iter().any(|e| e.name == *name) {
            return Err(RuleError::DuplicateUnitName(name.clone()));
        }
        entries.push(PlacementEntry {
            name: name.clone(),
            kind,
        });
    }
    Ok(entries)
}

/// Places a side's units on its home row, columns 0..4 in list order.
pub fn deploy(
    board: &mut Board,
    side: Side,
    entries: &[PlacementEntry],
) -> Result<Vec<UnitId>, RuleError> {
    let row = side.home_row();
    entries
        .iter()
        .zip(0..)
        .map(|(entry, col)| {
            board.place(
                Unit::new(side, entry.name.clone(), entry.kind),
                Position::new(row, col),
            )
        })
        .collect()
}
