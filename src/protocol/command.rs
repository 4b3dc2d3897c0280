//! Move command parsing.
//!
//! A move is written `<unitName>:<direction>`, e.g. `H1:FL`.

use crate::board::Direction;
use crate::error::SessionError;

/// A parsed move command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    pub unit: String,
    pub direction: Direction,
}

/// Parses `<unitName>:<direction>`.
///
/// Anything other than exactly two `:`-separated parts is malformed; an
/// unknown direction token is reported as such.
pub fn parse_move_command(text: &str) -> Result<MoveCommand, SessionError> {
    let parts: Vec<&str> = text.split(':').collect();
    let [unit, dir] = parts.as_slice() else {
        return Err(SessionError::MalformedCommand(text.to_string()));
    };
    let direction = Direction::parse(dir)?;
    Ok(MoveCommand {
        unit: unit.to_string(),
        direction,
    })
}
