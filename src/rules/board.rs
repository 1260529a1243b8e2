//! Board state and move validation.

use super::common::{BoardError, MoveKind, Side, Square};
use super::config::{BOARD_SIZE, HOME_ROWS, MAX_COORD, PIECES_PER_SIDE, TOTAL_PIECES};
use super::piece::{Piece, PieceId};
use core::fmt;

/// Result of applying a move to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub kind: MoveKind,
    pub from: Square,
    pub to: Square,
    /// Piece removed from the midpoint of a jump.
    pub captured: Option<Piece>,
    /// Whether this move crowned the mover.
    pub promoted: bool,
}

/// Piece arena plus occupancy grid.
///
/// `grid[x][y]` holds the id of the piece on `(x, y)`; `pieces[id]` holds the
/// piece itself, or `None` once it has been captured. Both views are updated
/// together so they never disagree.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pieces: [Option<Piece>; TOTAL_PIECES],
    grid: [[Option<PieceId>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    live: [usize; 2],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Board {
            pieces: [None; TOTAL_PIECES],
            grid: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            live: [0; 2],
        }
    }

    /// Board in the starting formation: each side fills its three home rows on
    /// the dark squares, the remote side as the point mirror of the local one.
    pub fn standard() -> Self {
        let mut board = Board::new();
        let mut n = 0;
        for y in (BOARD_SIZE - HOME_ROWS)..BOARD_SIZE {
            let mut x = (y + 1) % 2;
            while x < BOARD_SIZE {
                let local = Square { x, y };
                board.insert(PieceId(n), Side::Local, local, false);
                board.insert(
                    PieceId(n + PIECES_PER_SIDE as u8),
                    Side::Remote,
                    local.mirrored(),
                    false,
                );
                n += 1;
                x += 2;
            }
        }
        board
    }

    /// Put a new piece on the board, using the lowest free id of its side.
    pub fn place(&mut self, side: Side, square: Square, king: bool) -> Result<PieceId, BoardError> {
        if self.occupant(square).is_some() {
            return Err(BoardError::Occupied);
        }
        let base = side.index() * PIECES_PER_SIDE;
        let slot = (base..base + PIECES_PER_SIDE)
            .find(|&i| self.pieces[i].is_none())
            .ok_or(BoardError::SideFull)?;
        let id = PieceId(slot as u8);
        self.insert(id, side, square, king);
        Ok(id)
    }

    fn insert(&mut self, id: PieceId, side: Side, square: Square, king: bool) {
        self.pieces[id.index()] = Some(Piece::new(id, side, square, king));
        self.grid[square.x() as usize][square.y() as usize] = Some(id);
        self.live[side.index()] += 1;
    }

    fn occupant(&self, square: Square) -> Option<PieceId> {
        self.grid[square.x() as usize][square.y() as usize]
    }

    /// Piece standing on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.occupant(square)
            .and_then(|id| self.pieces[id.index()].as_ref())
    }

    /// Live piece with the given id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index()).and_then(Option::as_ref)
    }

    /// Live pieces of one side, in id order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = &Piece> + '_ {
        let base = side.index() * PIECES_PER_SIDE;
        self.pieces[base..base + PIECES_PER_SIDE]
            .iter()
            .filter_map(Option::as_ref)
    }

    /// Number of live pieces of one side.
    pub fn count(&self, side: Side) -> usize {
        self.live[side.index()]
    }

    /// Number of live pieces on the board.
    pub fn total(&self) -> usize {
        self.live[0] + self.live[1]
    }

    /// The side that has won, once the other side has no pieces left.
    pub fn winner(&self) -> Option<Side> {
        if self.count(Side::Local) == 0 {
            Some(Side::Remote)
        } else if self.count(Side::Remote) == 0 {
            Some(Side::Local)
        } else {
            None
        }
    }

    /// Whether moving piece `id` to the (clamped) target is legal.
    pub fn is_legal_move(&self, id: PieceId, target_x: i32, target_y: i32) -> bool {
        self.classify(id, Square::clamped(target_x, target_y)).is_some()
    }

    /// Kind of the move if it is legal, `None` otherwise.
    ///
    /// A man steps one square diagonally forward or jumps two squares
    /// diagonally forward; a king may do either in any diagonal direction. A
    /// jump needs an opposing piece on the midpoint.
    pub fn classify(&self, id: PieceId, target: Square) -> Option<MoveKind> {
        let piece = self.piece(id)?;
        let (dx, dy) = piece.square().delta(target);
        if dx == 0 || dy == 0 || self.occupant(target).is_some() {
            return None;
        }
        // Men only count rows in their forward direction.
        let rows = if piece.is_king() {
            dy.abs()
        } else {
            dy * piece.side().forward()
        };
        match (dx.abs(), rows) {
            (1, 1) => Some(MoveKind::Step),
            (2, 2) => {
                let jumped = self.piece_at(piece.square().midpoint(target))?;
                (jumped.side() != piece.side()).then_some(MoveKind::Jump)
            }
            _ => None,
        }
    }

    /// Move piece `id` to the (clamped) target without judging legality.
    ///
    /// A two-by-two diagonal move removes whatever stands on its midpoint. A
    /// man landing on its far row is crowned. Fails without mutating the board
    /// when the piece is gone or the target is occupied.
    pub fn apply_move(
        &mut self,
        id: PieceId,
        target_x: i32,
        target_y: i32,
    ) -> Result<MoveOutcome, BoardError> {
        let to = Square::clamped(target_x, target_y);
        let mut piece = *self.piece(id).ok_or(BoardError::NoPiece)?;
        if self.occupant(to).is_some() {
            return Err(BoardError::Occupied);
        }
        let from = piece.square();
        let (dx, dy) = from.delta(to);
        let jump = dx.abs() == 2 && dy.abs() == 2;

        self.grid[from.x() as usize][from.y() as usize] = None;
        self.grid[to.x() as usize][to.y() as usize] = Some(id);
        piece.relocate(to);

        let promoted = !piece.is_king() && to.y() == piece.side().far_row();
        if promoted {
            piece.crown();
        }
        self.pieces[id.index()] = Some(piece);

        let captured = if jump {
            self.remove(from.midpoint(to))
        } else {
            None
        };

        Ok(MoveOutcome {
            kind: if jump { MoveKind::Jump } else { MoveKind::Step },
            from,
            to,
            captured,
            promoted,
        })
    }

    fn remove(&mut self, square: Square) -> Option<Piece> {
        let id = self.grid[square.x() as usize][square.y() as usize].take()?;
        let piece = self.pieces[id.index()].take()?;
        self.live[piece.side().index()] -= 1;
        Some(piece)
    }

    /// Check that the grid and every piece agree on positions and counts.
    pub fn is_consistent(&self) -> bool {
        let mut counts = [0usize; 2];
        for piece in self.pieces.iter().flatten() {
            let sq = piece.square();
            if self.occupant(sq) != Some(piece.id()) {
                return false;
            }
            counts[piece.side().index()] += 1;
        }
        let occupied = self.grid.iter().flatten().filter(|c| c.is_some()).count();
        counts == self.live && occupied == counts[0] + counts[1]
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ local: {}, remote: {} }}", self.live[0], self.live[1])?;
        for y in 0..=MAX_COORD {
            for x in 0..=MAX_COORD {
                let ch = match self.piece_at(Square { x, y }) {
                    Some(p) => match (p.side(), p.is_king()) {
                        (Side::Local, false) => 'l',
                        (Side::Local, true) => 'L',
                        (Side::Remote, false) => 'r',
                        (Side::Remote, true) => 'R',
                    },
                    None => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
