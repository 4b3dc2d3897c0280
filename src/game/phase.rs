//! Match phase sequencing.
//!
//! Phase flow:
//! - Setup   -> Playing (both sides placed)
//! - Playing -> Over    (one side has no units left)
//! - any     -> Setup   (reset)

use std::fmt;

use serde::{Deserialize, Serialize};

/// The phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Playing,
    Over,
}

impl Phase {
    /// Returns the token used in snapshots.
    pub const fn token(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Playing => "playing",
            Phase::Over => "over",
        }
    }

    /// Returns true if a match may move from `self` to `next`.
    pub const fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Setup, Phase::Playing) | (Phase::Playing, Phase::Over) | (_, Phase::Setup)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
