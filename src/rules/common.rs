//! Common types for checkers: sides, squares, move kinds and board errors.

use super::config::{clamp_coord, mirror, BOARD_SIZE, MAX_COORD};

/// Owner of a piece, always from this instance's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Pieces controlled by this instance; they start on rows 5..=7.
    Local,
    /// Pieces controlled by the peer; they start on rows 0..=2.
    Remote,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Side {
        match self {
            Side::Local => Side::Remote,
            Side::Remote => Side::Local,
        }
    }

    /// Row delta of a forward step: local men move toward row 0, remote men
    /// toward row 7.
    pub fn forward(self) -> i32 {
        match self {
            Side::Local => -1,
            Side::Remote => 1,
        }
    }

    /// Row on which a man of this side is crowned.
    pub fn far_row(self) -> u8 {
        match self {
            Side::Local => 0,
            Side::Remote => MAX_COORD,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Local => 0,
            Side::Remote => 1,
        }
    }
}

/// A square on the board. Both coordinates are always in `[0, 7]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub(crate) x: u8,
    pub(crate) y: u8,
}

impl Square {
    /// Build a square, rejecting coordinates off the board.
    pub fn new(x: u8, y: u8) -> Result<Self, BoardError> {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return Err(BoardError::OutOfBounds);
        }
        Ok(Self { x, y })
    }

    /// Build a square from unchecked input, clamping each axis onto the board.
    pub fn clamped(x: i32, y: i32) -> Self {
        Self {
            x: clamp_coord(x),
            y: clamp_coord(y),
        }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    /// The same square as seen from the peer's board.
    pub fn mirrored(self) -> Self {
        Self {
            x: mirror(self.x),
            y: mirror(self.y),
        }
    }

    /// Signed offset `(dx, dy)` from `self` to `other`.
    pub fn delta(self, other: Square) -> (i32, i32) {
        (
            other.x as i32 - self.x as i32,
            other.y as i32 - self.y as i32,
        )
    }

    /// Square halfway between two squares two diagonals apart.
    pub(crate) fn midpoint(self, other: Square) -> Square {
        Square {
            x: (self.x + other.x) / 2,
            y: (self.y + other.y) / 2,
        }
    }
}

/// Shape of a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// One diagonal square.
    Step,
    /// Two diagonal squares over an opposing piece, capturing it.
    Jump,
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinates are off the board.
    OutOfBounds,
    /// No live piece with that id or on that square.
    NoPiece,
    /// Target square already holds a piece.
    Occupied,
    /// Every piece slot of that side is in use.
    SideFull,
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds => write!(f, "Coordinates are off the board"),
            BoardError::NoPiece => write!(f, "No piece found"),
            BoardError::Occupied => write!(f, "Target square is occupied"),
            BoardError::SideFull => write!(f, "No free piece slot for that side"),
        }
    }
}
