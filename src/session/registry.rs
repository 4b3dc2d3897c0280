//! Participant registry and matchmaking.
//!
//! The registry owns the table of connected participants, every match
//! reachable from it, and the binding of participants to seats. All reads
//! and writes of that state happen inside one mutex-guarded section per
//! operation. Notifications are queued on the participants' outboxes before
//! the lock is released, so every participant of a match sees them in the
//! order the operations were applied. Outboxes are unbounded; the blocking
//! network write happens on the connection's own thread.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_channel::Sender;
use tracing::{debug, info};

use crate::board::{Side, ALL_SIDES};
use crate::error::SessionError;
use crate::game::{Match, Phase, SetupProgress, Snapshot};
use crate::protocol::{parse_move_command, ClientMessage, ServerMessage};

/// Identifies a connected participant for the lifetime of its connection.
pub type ParticipantId = u64;

/// Identifies a match. Ids increase in creation order.
pub type MatchId = u64;

/// A participant's place in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    pub match_id: MatchId,
    pub side: Side,
}

impl Seat {
    /// One-based seat number shown to the participant.
    pub fn number(&self) -> u8 {
        self.side.seat()
    }
}

struct Participant {
    outbox: Sender<ServerMessage>,
    seat: Option<Seat>,
}

struct MatchEntry {
    game: Match,
    /// Participant bound to each side, indexed by `Side::index`.
    seats: [Option<ParticipantId>; 2],
    /// Set when a participant left while the other stayed bound.
    abandoned: bool,
}

impl MatchEntry {
    fn new() -> Self {
        MatchEntry {
            game: Match::new("", ""),
            seats: [None, None],
            abandoned: false,
        }
    }

    fn bound_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    fn is_open(&self) -> bool {
        self.game.phase() == Phase::Setup && !self.abandoned && self.bound_count() == 1
    }

    /// Bound participants with their sides, in seat order.
    fn bound(&self) -> Vec<(ParticipantId, Side)> {
        ALL_SIDES
            .iter()
            .filter_map(|&side| self.seats[side.index()].map(|pid| (pid, side)))
            .collect()
    }
}

#[derive(Default)]
struct RegistryState {
    participants: HashMap<ParticipantId, Participant>,
    matches: BTreeMap<MatchId, MatchEntry>,
    next_participant: ParticipantId,
    next_match: MatchId,
}

impl RegistryState {
    fn seat_of(&self, pid: ParticipantId) -> Result<Seat, SessionError> {
        self.participants
            .get(&pid)
            .ok_or(SessionError::UnknownParticipant)?
            .seat
            .ok_or(SessionError::NotBound)
    }

    /// Returns the match a seated participant plays in, rejecting matches
    /// whose other participant has left.
    fn active_match(&mut self, seat: Seat) -> Result<&mut MatchEntry, SessionError> {
        let entry = self
            .matches
            .get_mut(&seat.match_id)
            .ok_or(SessionError::NotBound)?;
        if entry.abandoned {
            return Err(SessionError::OpponentLeft);
        }
        Ok(entry)
    }

    fn open_match_id(&self) -> Option<MatchId> {
        self.matches
            .iter()
            .find(|(_, entry)| entry.is_open())
            .map(|(&id, _)| id)
    }

    /// Queues a notification on a participant's outbox. Never blocks.
    fn notify(&self, to: ParticipantId, msg: ServerMessage) {
        let Some(p) = self.participants.get(&to) else {
            return;
        };
        if p.outbox.send(msg).is_err() {
            debug!(participant = to, "dropping notification for closed connection");
        }
    }

    fn broadcast(&self, to: &[(ParticipantId, Side)], msg: &ServerMessage) {
        for &(pid, _) in to {
            self.notify(pid, msg.clone());
        }
    }
}

/// Process-wide table of participants and matches.
#[derive(Default)]
pub struct SessionRegistry {
    state: Mutex<RegistryState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a newly connected participant. Notifications for it are
    /// sent to `outbox`.
    pub fn register(&self, outbox: Sender<ServerMessage>) -> ParticipantId {
        let mut state = self.lock();
        state.next_participant += 1;
        let pid = state.next_participant;
        state
            .participants
            .insert(pid, Participant { outbox, seat: None });
        pid
    }

    /// Dispatches a decoded command to the matching operation.
    pub fn handle(&self, pid: ParticipantId, msg: ClientMessage) -> Result<(), SessionError> {
        match msg {
            ClientMessage::JoinGame(req) => self.join(pid, &req.player_name),
            ClientMessage::SetupDone(names) => self.submit_setup(pid, &names),
            ClientMessage::MakeMove(cmd) => self.submit_move(pid, &cmd),
            ClientMessage::NewGame => self.request_reset(pid),
        }
    }

    /// Seats a participant in the first match waiting for an opponent, or
    /// in a new match if none is waiting.
    pub fn join(&self, pid: ParticipantId, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        let mut guard = self.lock();
        let state = &mut *guard;
        match state.seat_of(pid) {
            Ok(_) => return Err(SessionError::AlreadyBound),
            Err(SessionError::NotBound) => {}
            Err(e) => return Err(e),
        }

        let match_id = match state.open_match_id() {
            Some(id) => id,
            None => {
                state.next_match += 1;
                state.next_match
            }
        };
        let entry = state.matches.entry(match_id).or_insert_with(MatchEntry::new);

        let side = if entry.game.roster(Side::A).is_named() {
            Side::B
        } else {
            Side::A
        };
        entry.game.set_roster_name(side, name);
        entry.seats[side.index()] = Some(pid);

        let both_named = ALL_SIDES.iter().all(|&s| entry.game.roster(s).is_named());
        let start = both_named.then(|| entry.game.snapshot());
        let bound = entry.bound();

        let seat = Seat { match_id, side };
        if let Some(p) = state.participants.get_mut(&pid) {
            p.seat = Some(seat);
        }
        info!(participant = pid, name, seat = seat.number(), match_id, "joined match");

        state.notify(pid, ServerMessage::GameSetup(seat.number()));
        if let Some(snapshot) = start {
            info!(match_id, "match ready for setup");
            state.broadcast(&bound, &ServerMessage::GameStart(snapshot));
        }
        Ok(())
    }

    /// Records the participant's placement. Once both sides have placed,
    /// every bound participant receives the opening snapshot.
    pub fn submit_setup(&self, pid: ParticipantId, names: &[String]) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let seat = state.seat_of(pid)?;
        let entry = state.active_match(seat)?;

        let progress = entry.game.submit_placement(seat.side, names)?;
        debug!(participant = pid, match_id = seat.match_id, "placement accepted");
        if progress == SetupProgress::Started {
            let snapshot = entry.game.snapshot();
            let bound = entry.bound();
            info!(match_id = seat.match_id, "match started");
            state.broadcast(&bound, &ServerMessage::GameStart(snapshot));
        }
        Ok(())
    }

    /// Applies a `"<unitName>:<direction>"` move for the participant whose
    /// turn it is, then broadcasts the new state and, if the move decided
    /// the match, the result.
    pub fn submit_move(&self, pid: ParticipantId, command: &str) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let seat = state.seat_of(pid)?;
        let entry = state.active_match(seat)?;

        if entry.game.current_turn() != seat.side {
            return Err(SessionError::NotYourTurn);
        }
        let cmd = parse_move_command(command)?;
        let outcome = entry
            .game
            .apply_move(seat.side, &cmd.unit, cmd.direction)?;
        info!(
            match_id = seat.match_id,
            side = %seat.side,
            unit = %cmd.unit,
            direction = cmd.direction.token(),
            to = %outcome.to,
            captured = outcome.captured.len(),
            "move applied"
        );

        let snapshot = entry.game.snapshot();
        let winner = entry
            .game
            .check_victory()
            .map(|side| entry.game.roster(side).name.clone());
        let bound = entry.bound();

        state.broadcast(&bound, &ServerMessage::GameState(snapshot));
        if let Some(name) = winner {
            info!(match_id = seat.match_id, winner = %name, "match over");
            let notice = ServerMessage::GameOver(format!("Game Over! {} wins!", name));
            state.broadcast(&bound, &notice);
        }
        Ok(())
    }

    /// Resets the participant's match to setup and tells every bound
    /// participant its seat again. A match abandoned by one participant is
    /// reopened to matchmaking.
    pub fn request_reset(&self, pid: ParticipantId) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let seat = state.seat_of(pid)?;
        let entry = state
            .matches
            .get_mut(&seat.match_id)
            .ok_or(SessionError::NotBound)?;

        entry.game.reset();
        entry.abandoned = false;
        let bound = entry.bound();
        info!(match_id = seat.match_id, participant = pid, "match reset");

        for (to, side) in bound {
            state.notify(to, ServerMessage::GameSetup(side.seat()));
        }
        Ok(())
    }

    /// Removes a participant. If it was seated, the seat is vacated and the
    /// remaining participant, if any, is told its opponent left; a match
    /// nobody is bound to any more is discarded.
    pub fn leave(&self, pid: ParticipantId) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(participant) = state.participants.remove(&pid) else {
            return;
        };
        let Some(seat) = participant.seat else {
            debug!(participant = pid, "unseated participant left");
            return;
        };
        let Some(entry) = state.matches.get_mut(&seat.match_id) else {
            return;
        };

        let name = entry.game.roster(seat.side).name.clone();
        entry.seats[seat.side.index()] = None;
        entry.game.set_roster_name(seat.side, "");

        let remaining = entry.seats[seat.side.opponent().index()];
        match remaining {
            Some(remaining) => {
                entry.abandoned = true;
                info!(match_id = seat.match_id, participant = pid, "opponent left, match abandoned");
                let notice = ServerMessage::OpponentLeft(format!("{} has left the game", name));
                state.notify(remaining, notice);
            }
            None => {
                state.matches.remove(&seat.match_id);
                info!(match_id = seat.match_id, "match closed");
            }
        }
    }

    /// Returns the seat a participant is bound to.
    pub fn seat_of(&self, pid: ParticipantId) -> Option<Seat> {
        self.lock().seat_of(pid).ok()
    }

    /// Returns the current snapshot of a match.
    pub fn snapshot(&self, match_id: MatchId) -> Option<Snapshot> {
        self.lock()
            .matches
            .get(&match_id)
            .map(|entry| entry.game.snapshot())
    }

    /// Returns true if the match lost a participant and awaits a reset.
    pub fn is_abandoned(&self, match_id: MatchId) -> bool {
        self.lock()
            .matches
            .get(&match_id)
            .is_some_and(|entry| entry.abandoned)
    }

    pub fn participant_count(&self) -> usize {
        self.lock().participants.len()
    }

    pub fn match_count(&self) -> usize {
        self.lock().matches.len()
    }
}

// SessionRegistry is shared across connection threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SessionRegistry>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver};

    fn connect(registry: &SessionRegistry) -> (ParticipantId, Receiver<ServerMessage>) {
        let (tx, rx) = unbounded();
        (registry.register(tx), rx)
    }

    fn drain(rx: &Receiver<ServerMessage>) -> Vec<ServerMessage> {
        rx.try_iter().collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_join_creates_match_and_takes_seat_one() {
        let registry = SessionRegistry::new();
        let (p1, rx1) = connect(&registry);
        registry.join(p1, "alice").unwrap();

        let seat = registry.seat_of(p1).unwrap();
        assert_eq!(seat.number(), 1);
        assert_eq!(registry.match_count(), 1);
        assert_eq!(drain(&rx1), vec![ServerMessage::GameSetup(1)]);
    }

    #[test]
    fn second_join_pairs_and_starts() {
        let registry = SessionRegistry::new();
        let (p1, rx1) = connect(&registry);
        let (p2, rx2) = connect(&registry);
        registry.join(p1, "alice").unwrap();
        drain(&rx1);
        registry.join(p2, "bob").unwrap();

        assert_eq!(registry.match_count(), 1);
        assert_eq!(registry.seat_of(p2).unwrap().number(), 2);

        let msgs = drain(&rx2);
        assert_eq!(msgs[0], ServerMessage::GameSetup(2));
        assert!(matches!(msgs[1], ServerMessage::GameStart(_)));
        let msgs = drain(&rx1);
        assert_eq!(msgs.len(), 1);
        assert!(matches!(msgs[0], ServerMessage::GameStart(_)));
    }

    #[test]
    fn third_participant_gets_new_match() {
        let registry = SessionRegistry::new();
        let (p1, _rx1) = connect(&registry);
        let (p2, _rx2) = connect(&registry);
        let (p3, _rx3) = connect(&registry);
        registry.join(p1, "alice").unwrap();
        registry.join(p2, "bob").unwrap();
        registry.join(p3, "carol").unwrap();

        assert_eq!(registry.match_count(), 2);
        let s1 = registry.seat_of(p1).unwrap();
        let s3 = registry.seat_of(p3).unwrap();
        assert_ne!(s1.match_id, s3.match_id);
        assert_eq!(s3.number(), 1);
    }

    #[test]
    fn join_validation() {
        let registry = SessionRegistry::new();
        let (p1, _rx1) = connect(&registry);
        assert_eq!(registry.join(p1, "   "), Err(SessionError::EmptyName));
        registry.join(p1, "alice").unwrap();
        assert_eq!(registry.join(p1, "alice"), Err(SessionError::AlreadyBound));
        assert_eq!(registry.join(99, "ghost"), Err(SessionError::UnknownParticipant));
    }

    #[test]
    fn unseated_commands_are_rejected() {
        let registry = SessionRegistry::new();
        let (p1, _rx1) = connect(&registry);
        assert_eq!(registry.submit_move(p1, "P1:F"), Err(SessionError::NotBound));
        assert_eq!(registry.request_reset(p1), Err(SessionError::NotBound));
        assert_eq!(
            registry.submit_setup(p1, &names(&["P1", "P2", "P3", "P4", "P5"])),
            Err(SessionError::NotBound)
        );
    }

    #[test]
    fn leave_notifies_remaining_participant() {
        let registry = SessionRegistry::new();
        let (p1, rx1) = connect(&registry);
        let (p2, _rx2) = connect(&registry);
        registry.join(p1, "alice").unwrap();
        registry.join(p2, "bob").unwrap();
        drain(&rx1);

        let match_id = registry.seat_of(p1).unwrap().match_id;
        registry.leave(p2);

        assert_eq!(registry.participant_count(), 1);
        assert!(registry.is_abandoned(match_id));
        assert_eq!(
            drain(&rx1),
            vec![ServerMessage::OpponentLeft("bob has left the game".to_string())]
        );
        assert_eq!(registry.submit_move(p1, "P1:F"), Err(SessionError::OpponentLeft));
    }

    #[test]
    fn last_leave_discards_match() {
        let registry = SessionRegistry::new();
        let (p1, _rx1) = connect(&registry);
        registry.join(p1, "alice").unwrap();
        registry.leave(p1);
        assert_eq!(registry.match_count(), 0);
        assert_eq!(registry.participant_count(), 0);
        registry.leave(p1);
    }

    #[test]
    fn reset_reopens_abandoned_match() {
        let registry = SessionRegistry::new();
        let (p1, rx1) = connect(&registry);
        let (p2, _rx2) = connect(&registry);
        registry.join(p1, "alice").unwrap();
        registry.join(p2, "bob").unwrap();
        registry.leave(p2);
        drain(&rx1);

        let match_id = registry.seat_of(p1).unwrap().match_id;
        registry.request_reset(p1).unwrap();
        assert!(!registry.is_abandoned(match_id));
        assert_eq!(drain(&rx1), vec![ServerMessage::GameSetup(1)]);

        let (p3, rx3) = connect(&registry);
        registry.join(p3, "carol").unwrap();
        let seat = registry.seat_of(p3).unwrap();
        assert_eq!(seat.match_id, match_id);
        assert_eq!(seat.number(), 2);
        assert!(matches!(drain(&rx3)[1], ServerMessage::GameStart(_)));
    }

    #[test]
    fn vacated_first_seat_is_refilled_first() {
        let registry = SessionRegistry::new();
        let (p1, _rx1) = connect(&registry);
        let (p2, _rx2) = connect(&registry);
        registry.join(p1, "alice").unwrap();
        registry.join(p2, "bob").unwrap();
        registry.leave(p1);
        registry.request_reset(p2).unwrap();

        let (p3, _rx3) = connect(&registry);
        registry.join(p3, "carol").unwrap();
        assert_eq!(registry.seat_of(p3).unwrap().number(), 1);
        let snapshot = registry
            .snapshot(registry.seat_of(p3).unwrap().match_id)
            .unwrap();
        assert_eq!(snapshot.phase, Phase::Setup);
    }
}
