//! Board geometry and the coordinate helpers shared by both peers.

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 8;
/// Pieces each side starts with.
pub const PIECES_PER_SIDE: usize = 12;
/// Total number of piece slots on a board.
pub const TOTAL_PIECES: usize = 2 * PIECES_PER_SIDE;
/// Rows filled by each side in the starting formation.
pub const HOME_ROWS: u8 = 3;

/// Largest valid coordinate on either axis.
pub const MAX_COORD: u8 = BOARD_SIZE - 1;

/// Map a coordinate into the peer's perspective. The two boards are drawn as
/// mirror images, so every raw coordinate crossing the wire goes through this.
///
/// `v` must be in `[0, MAX_COORD]`.
pub const fn mirror(v: u8) -> u8 {
    MAX_COORD - v
}

/// Clamp an arbitrary coordinate to the nearest value on the board.
pub fn clamp_coord(v: i32) -> u8 {
    v.clamp(0, MAX_COORD as i32) as u8
}
