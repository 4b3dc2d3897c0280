//! Unit movement and capture.
//!
//! Pawns step one cell onto an empty cell. Heroes leap two cells and
//! sweep the cells along the way: every unit found on the path is
//! captured, friend or foe, and the sweep ends at the first enemy it
//! removes. The hero then lands on the destination.
//!
//! A move is either applied completely or rejected without touching the
//! board: the sweep is planned on a shared borrow before anything is
//! captured.

use crate::board::{Board, Direction, Position, Side, UnitId};
use crate::error::RuleError;

/// What a successful move did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub unit: UnitId,
    pub from: Position,
    pub to: Position,
    /// Units removed by this move, in sweep order.
    pub captured: Vec<UnitId>,
}

/// Moves a unit one step in a direction, following its kind's rules.
pub fn apply_move(board: &mut Board, id: UnitId, dir: Direction) -> Result<MoveOutcome, RuleError> {
    let unit = board.unit(id);
    if !unit.is_alive() {
        return Err(RuleError::UnitCaptured(unit.name.clone()));
    }

    let kind = unit.kind;
    let from = unit.position();
    let (d_row, d_col) = dir.delta();
    let stride = kind.stride();
    let to = from.offset(d_row * stride, d_col * stride);

    if !board.is_in_bounds(to) {
        return Err(RuleError::OutOfBounds {
            row: to.row,
            col: to.col,
        });
    }

    if kind.is_hero() {
        hero_leap(board, id, from, to)
    } else {
        pawn_step(board, id, from, to)
    }
}

fn pawn_step(
    board: &mut Board,
    id: UnitId,
    from: Position,
    to: Position,
) -> Result<MoveOutcome, RuleError> {
    if !board.is_empty(to) {
        return Err(RuleError::TargetOccupied);
    }
    board.move_unit(id, to)?;
    Ok(MoveOutcome {
        unit: id,
        from,
        to,
        captured: Vec::new(),
    })
}

fn hero_leap(
    board: &mut Board,
    id: UnitId,
    from: Position,
    to: Position,
) -> Result<MoveOutcome, RuleError> {
    let side = board.unit(id).side;
    let swept = plan_sweep(board, side, from, to);

    if !swept.contains(&to) {
        if let Some(occupant) = board.unit_at(to) {
            if board.unit(occupant).side == side {
                return Err(RuleError::FriendlyBlocked);
            }
        }
    }

    let mut captured: Vec<UnitId> = swept.iter().filter_map(|&pos| board.capture(pos)).collect();
    if let Some(landed_on) = board.move_unit(id, to)? {
        captured.push(landed_on);
    }

    Ok(MoveOutcome {
        unit: id,
        from,
        to,
        captured,
    })
}

/// Returns the cells whose occupants a hero moving from `from` to `to`
/// would capture, in path order.
///
/// The walk stops at the grid edge and right after the first enemy.
pub fn plan_sweep(board: &Board, side: Side, from: Position, to: Position) -> Vec<Position> {
    let row_step = (to.row - from.row).signum();
    let col_step = (to.col - from.col).signum();
    let steps = (to.row - from.row).abs().max((to.col - from.col).abs());

    let mut swept = Vec::new();
    for i in 1..=steps {
        let pos = from.offset(row_step * i, col_step * i);
        if !board.is_in_bounds(pos) {
            break;
        }
        if let Some(occupant) = board.unit_at(pos) {
            swept.push(pos);
            if board.unit(occupant).side != side {
                break;
            }
        }
    }
    swept
}
