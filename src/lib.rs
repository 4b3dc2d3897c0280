//! Skirmish game server library.
//!
//! Exposes the board representation, move resolution, match state machine,
//! wire protocol and session registry for use by integration tests and the
//! binary entry point.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod resolve;
pub mod server;
pub mod session;
