//! Checker pieces.

use super::common::{Side, Square};

/// Stable handle to a piece for the lifetime of a board.
///
/// Local pieces of the standard formation use ids `0..12`, remote pieces
/// `12..24`, each in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u8);

impl PieceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for PieceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live piece: who owns it, where it stands, and whether it is crowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    side: Side,
    square: Square,
    king: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, side: Side, square: Square, king: bool) -> Self {
        Self {
            id,
            side,
            square,
            king,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn is_king(&self) -> bool {
        self.king
    }

    pub(crate) fn relocate(&mut self, square: Square) {
        self.square = square;
    }

    /// Crown the piece. There is no way back.
    pub(crate) fn crown(&mut self) {
        self.king = true;
    }
}
