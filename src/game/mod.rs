//! Match state and phase sequencing.

pub mod phase;
pub mod roster;
pub mod state;

pub use phase::Phase;
pub use roster::Roster;
pub use state::{Match, SetupProgress, Snapshot};
