//! Wire protocol handling.
//!
//! This module implements the JSON envelope exchanged with participants
//! and the parser for move commands carried inside it.

pub mod command;
pub mod message;

pub use command::{parse_move_command, MoveCommand};
pub use message::{
    decode_client_message, encode_server_message, ClientMessage, JoinRequest, ServerMessage,
};
