//! Wire messages.
//!
//! Every message travels in a `{ "type": ..., "data": ... }` envelope.
//! Inbound envelopes decode into [`ClientMessage`], outbound notifications
//! are built as [`ServerMessage`].

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::game::Snapshot;

/// Payload of a `join_game` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    #[serde(rename = "playerName")]
    pub player_name: String,
}

/// A command sent by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask to be seated in a match.
    JoinGame(JoinRequest),

    /// Submit the five unit names for this side, in column order.
    SetupDone(Vec<String>),

    /// Move a unit: `"<unitName>:<direction>"`.
    MakeMove(String),

    /// Reset the match to setup.
    NewGame,
}

/// A notification sent to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Seat assignment (1 or 2); the client returns to its setup view.
    GameSetup(u8),

    /// Both sides are named, or both sides are placed.
    GameStart(Snapshot),

    /// State after a move.
    GameState(Snapshot),

    /// The match has a winner.
    GameOver(String),

    /// A command was rejected.
    Error(String),

    /// The other participant disconnected.
    OpponentLeft(String),
}

impl ServerMessage {
    /// Returns the envelope type tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::GameSetup(_) => "game_setup",
            ServerMessage::GameStart(_) => "game_start",
            ServerMessage::GameState(_) => "game_state",
            ServerMessage::GameOver(_) => "game_over",
            ServerMessage::Error(_) => "error",
            ServerMessage::OpponentLeft(_) => "opponent_left",
        }
    }
}

/// Decodes one inbound envelope.
///
/// Text that is not JSON is reported as [`ProtocolError::Malformed`]; JSON
/// with an unknown type or a payload of the wrong shape as
/// [`ProtocolError::InvalidCommand`].
pub fn decode_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
    serde_json::from_value(value).map_err(ProtocolError::InvalidCommand)
}

/// Encodes one outbound envelope as a single line of JSON.
pub fn encode_server_message(msg: &ServerMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(msg).map_err(ProtocolError::Encode)
}
