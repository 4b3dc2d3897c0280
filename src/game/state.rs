//! Match state.
//!
//! A [`Match`] owns the board and both rosters and drives the phase state
//! machine: placement during setup, alternating moves while playing, and
//! victory detection. Turn ownership is enforced by the session layer;
//! the match only advances the turn after a legal move.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use super::roster::Roster;
use crate::board::{Board, Direction, Position, Side, ALL_SIDES, BOARD_SIZE};
use crate::error::RuleError;
use crate::resolve::{apply_move, deploy, validate_placement, MoveOutcome};

/// Result of a placement submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupProgress {
    /// The other side has not submitted yet.
    Waiting,
    /// Both sides are deployed and the match is playing.
    Started,
}

/// Serializable view of a match sent to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    /// Each cell is empty or `"<side>-<unit name>"`.
    pub board: [[String; BOARD_SIZE]; BOARD_SIZE],
    pub current_turn: usize,
    /// Winner's display name, empty while undecided.
    pub winner: String,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    board: Board,
    rosters: [Roster; 2],
    current_turn: Side,
    phase: Phase,
    winner: Option<Side>,
}

impl Match {
    /// Starts a match in setup with two empty rosters and a fresh board.
    pub fn new(name_a: impl Into<String>, name_b: impl Into<String>) -> Self {
        Match {
            board: Board::new(),
            rosters: [Roster::new(Side::A, name_a), Roster::new(Side::B, name_b)],
            current_turn: Side::A,
            phase: Phase::Setup,
            winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn roster(&self, side: Side) -> &Roster {
        &self.rosters[side.index()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The side allowed to move next.
    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Assigns a side's display name. Used when a participant takes a seat.
    pub fn set_roster_name(&mut self, side: Side, name: impl Into<String>) {
        self.rosters[side.index()].name = name.into();
    }

    /// Records a side's placement. When both sides have submitted, deploys
    /// both rosters and starts play.
    ///
    /// A side may resubmit while the other side has not yet submitted.
    pub fn submit_placement(
        &mut self,
        side: Side,
        names: &[String],
    ) -> Result<SetupProgress, RuleError> {
        self.expect_phase(Phase::Setup)?;
        let entries = validate_placement(names)?;
        self.rosters[side.index()].pending = Some(entries);

        if !ALL_SIDES
            .iter()
            .all(|s| self.rosters[s.index()].has_pending_placement())
        {
            return Ok(SetupProgress::Waiting);
        }

        for s in ALL_SIDES {
            let roster = &mut self.rosters[s.index()];
            let entries = roster.pending.take().unwrap_or_default();
            roster.units = deploy(&mut self.board, s, &entries)?;
        }
        self.transition(Phase::Playing)?;
        Ok(SetupProgress::Started)
    }

    /// Moves one of `side`'s units and passes the turn.
    ///
    /// Victory is evaluated as part of the move: when the move leaves a side
    /// without live units, the winner is recorded and the match is over.
    pub fn apply_move(
        &mut self,
        side: Side,
        unit_name: &str,
        dir: Direction,
    ) -> Result<MoveOutcome, RuleError> {
        self.expect_phase(Phase::Playing)?;
        let id = self.rosters[side.index()]
            .find_unit(&self.board, unit_name)
            .ok_or_else(|| RuleError::UnknownUnit(unit_name.to_string()))?;

        let outcome = apply_move(&mut self.board, id, dir)?;
        self.current_turn = self.current_turn.opponent();
        self.check_victory();
        Ok(outcome)
    }

    /// Records the other side as winner if a deployed side has no live units
    /// left, ending the match. Returns the winner, if any.
    pub fn check_victory(&mut self) -> Option<Side> {
        if self.winner.is_some() || self.phase != Phase::Playing {
            return self.winner;
        }

        let defeated = ALL_SIDES.into_iter().find(|&s| {
            !self.rosters[s.index()].units.is_empty() && self.board.alive_count(s) == 0
        });
        if let Some(loser) = defeated {
            if self.transition(Phase::Over).is_ok() {
                self.winner = Some(loser.opponent());
            }
        }
        self.winner
    }

    /// Returns the match to setup: fresh board, no units, no winner, first
    /// side to move. Display names are kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        for roster in &mut self.rosters {
            roster.clear();
        }
        self.current_turn = Side::A;
        self.winner = None;
        self.phase = Phase::Setup;
    }

    /// Builds the participant-facing view of the match.
    pub fn snapshot(&self) -> Snapshot {
        let mut board: [[String; BOARD_SIZE]; BOARD_SIZE] = Default::default();
        for (row, cells) in board.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                if let Some(id) = self.board.unit_at(Position::new(row as i32, col as i32)) {
                    let unit = self.board.unit(id);
                    *cell = format!("{}-{}", unit.side.token(), unit.name);
                }
            }
        }

        Snapshot {
            board,
            current_turn: self.current_turn.index(),
            winner: self
                .winner
                .map(|s| self.roster(s).name.clone())
                .unwrap_or_default(),
            phase: self.phase,
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), RuleError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RuleError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn transition(&mut self, next: Phase) -> Result<(), RuleError> {
        if !self.phase.can_transition_to(next) {
            return Err(RuleError::IllegalTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}
