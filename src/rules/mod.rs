//! Core checkers rules (no_std compatible)
//!
//! Board state and move validation with no I/O and no allocation. Both peers
//! run this same engine; each trusts the other's verdict on its own moves.

pub mod board;
pub mod common;
pub mod config;
pub mod piece;

pub use board::{Board, MoveOutcome};
pub use common::{BoardError, MoveKind, Side, Square};
pub use config::*;
pub use piece::{Piece, PieceId};
