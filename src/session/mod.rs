//! Session layer: participants, seats, matchmaking and broadcast.

pub mod registry;

pub use registry::{MatchId, ParticipantId, Seat, SessionRegistry};
