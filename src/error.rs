//! Error types for the rule engine, session layer, wire protocol and
//! configuration.
//!
//! Rule and session errors are always recoverable: they are reported back
//! to the participant that issued the command and leave match state as it
//! was.

use crate::game::phase::Phase;

/// A rejected board, unit, or match operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("position out of bounds: row {row}, col {col}")]
    OutOfBounds { row: i32, col: i32 },

    #[error("position already occupied: row {row}, col {col}")]
    SlotOccupied { row: i32, col: i32 },

    #[error("cannot move onto a friendly unit")]
    FriendlyBlocked,

    #[error("target position occupied")]
    TargetOccupied,

    #[error("invalid unit code: '{0}'")]
    InvalidUnitCode(String),

    #[error("each side must place exactly 5 units, got {0}")]
    PlacementCount(usize),

    #[error("duplicate unit name: '{0}'")]
    DuplicateUnitName(String),

    #[error("command not allowed during {actual} phase (expected {expected})")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("unit not found: '{0}'")]
    UnknownUnit(String),

    #[error("invalid move direction: '{0}'")]
    InvalidDirection(String),

    #[error("unit '{0}' has been captured")]
    UnitCaptured(String),

    #[error("illegal phase transition from {from} to {to}")]
    IllegalTransition { from: Phase, to: Phase },
}

/// A rejected session-layer command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("player name cannot be empty")]
    EmptyName,

    #[error("you are already in a game")]
    AlreadyBound,

    #[error("you are not in a game")]
    NotBound,

    #[error("it's not your turn")]
    NotYourTurn,

    #[error("malformed move command: '{0}'")]
    MalformedCommand(String),

    #[error("your opponent has left the game")]
    OpponentLeft,

    #[error("unknown participant")]
    UnknownParticipant,

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Failure to decode or encode a wire envelope.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The input is not JSON at all; the connection cannot be trusted.
    #[error("malformed envelope: {0}")]
    Malformed(serde_json::Error),

    /// Well-formed JSON that is not a known command.
    #[error("invalid message: {0}")]
    InvalidCommand(serde_json::Error),

    #[error("failed to encode message: {0}")]
    Encode(serde_json::Error),
}

/// Invalid command-line configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("invalid value for {flag}: '{value}'")]
    InvalidValue { flag: String, value: String },

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}
