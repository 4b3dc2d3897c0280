//! Unit types and ownership.
//!
//! Represents pawns and heroes, their owning side, and their current
//! position on the board.

use std::fmt;

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    A,
    B,
}

/// Both sides in seat order.
pub const ALL_SIDES: [Side; 2] = [Side::A, Side::B];

impl Side {
    /// Returns the zero-based index used for turn tracking and roster lookup.
    pub const fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    /// Returns the side for a zero-based index.
    pub fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::A),
            1 => Some(Side::B),
            _ => None,
        }
    }

    /// Returns the one-based seat number shown to participants.
    pub const fn seat(self) -> u8 {
        match self {
            Side::A => 1,
            Side::B => 2,
        }
    }

    /// Returns the side for a one-based seat number.
    pub fn from_seat(seat: u8) -> Option<Side> {
        match seat {
            1 => Some(Side::A),
            2 => Some(Side::B),
            _ => None,
        }
    }

    /// Returns the opposing side.
    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Returns the row this side deploys its units on.
    pub const fn home_row(self) -> i32 {
        match self {
            Side::A => 4,
            Side::B => 0,
        }
    }

    /// Returns the token used in snapshot cells.
    pub const fn token(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The kind of a unit, which decides how it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Pawn,
    HeroA,
    HeroB,
}

impl UnitKind {
    /// Parses a unit kind from the two-character code prefix of a unit name.
    ///
    /// `P1`..`P5` are pawns, `H1` and `H2` the two heroes.
    pub fn from_code(code: &str) -> Option<UnitKind> {
        match code {
            "P1" | "P2" | "P3" | "P4" | "P5" => Some(UnitKind::Pawn),
            "H1" => Some(UnitKind::HeroA),
            "H2" => Some(UnitKind::HeroB),
            _ => None,
        }
    }

    /// Returns true for both hero variants.
    pub const fn is_hero(self) -> bool {
        matches!(self, UnitKind::HeroA | UnitKind::HeroB)
    }

    /// Number of cells a single step covers.
    pub const fn stride(self) -> i32 {
        if self.is_hero() {
            2
        } else {
            1
        }
    }
}

/// A cell coordinate. May lie off the grid while a move is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns this position shifted by the given deltas.
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Handle of a unit inside a board's unit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub(crate) usize);

impl UnitId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A unit on (or captured from) the board.
///
/// `position` is only written by the board's mutation primitives; after a
/// capture it keeps the last cell the unit stood on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub side: Side,
    pub name: String,
    pub kind: UnitKind,
    pub(crate) position: Position,
    pub(crate) alive: bool,
}

impl Unit {
    /// Creates a live unit. Its position is assigned when it is placed.
    pub fn new(side: Side, name: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            side,
            name: name.into(),
            kind,
            position: Position::new(0, 0),
            alive: true,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_kind_from_code() {
        for code in ["P1", "P2", "P3", "P4", "P5"] {
            assert_eq!(UnitKind::from_code(code), Some(UnitKind::Pawn));
        }
        assert_eq!(UnitKind::from_code("H1"), Some(UnitKind::HeroA));
        assert_eq!(UnitKind::from_code("H2"), Some(UnitKind::HeroB));
        assert_eq!(UnitKind::from_code("P6"), None);
        assert_eq!(UnitKind::from_code("H3"), None);
        assert_eq!(UnitKind::from_code("p1"), None);
    }

    #[test]
    fn side_seat_and_index() {
        for side in ALL_SIDES {
            assert_eq!(Side::from_seat(side.seat()), Some(side));
            assert_eq!(Side::from_index(side.index()), Some(side));
        }
        assert_eq!(Side::from_seat(0), None);
        assert_eq!(Side::from_seat(3), None);
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::B.opponent(), Side::A);
    }

    #[test]
    fn home_rows_face_each_other() {
        assert_eq!(Side::A.home_row(), 4);
        assert_eq!(Side::B.home_row(), 0);
    }

    #[test]
    fn hero_stride_is_two() {
        assert_eq!(UnitKind::Pawn.stride(), 1);
        assert_eq!(UnitKind::HeroA.stride(), 2);
        assert_eq!(UnitKind::HeroB.stride(), 2);
    }
}
