//! Move and placement resolution.
//!
//! Applies movement orders and setup placements to a board.

pub mod movement;
pub mod placement;

pub use movement::{apply_move, plan_sweep, MoveOutcome};
pub use placement::{deploy, kind_for_name, validate_placement, PlacementEntry, ROSTER_SIZE};
