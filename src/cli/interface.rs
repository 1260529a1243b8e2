#![cfg(feature = "std")]

//! Terminal rendering for the board and session events.

use std::fmt::Write;

use crate::rules::{Board, Side, Square, BOARD_SIZE};
use crate::session::{Outcome, SessionObserver};

/// Render the board from the local player's seat: row 0 at the top, our
/// pieces at the bottom. `o`/`O` are ours, `x`/`X` the opponent's, upper case
/// for kings.
pub fn render_board(board: &Board) -> String {
    let mut s = String::new();
    s.push_str("    ");
    for x in 0..BOARD_SIZE {
        let _ = write!(s, " {}", x);
    }
    s.push('\n');
    s.push_str("   ╔═════════════════╗\n");
    for y in 0..BOARD_SIZE {
        let _ = write!(s, " {} ║", y);
        for x in 0..BOARD_SIZE {
            let ch = match Square::new(x, y).ok().and_then(|sq| board.piece_at(sq)) {
                Some(p) => match (p.side(), p.is_king()) {
                    (Side::Local, false) => 'o',
                    (Side::Local, true) => 'O',
                    (Side::Remote, false) => 'x',
                    (Side::Remote, true) => 'X',
                },
                None if (x + y) % 2 == 1 => '·',
                None => ' ',
            };
            let _ = write!(s, " {}", ch);
        }
        s.push_str(" ║\n");
    }
    s.push_str("   ╚═════════════════╝\n");
    let _ = writeln!(
        s,
        "   you: {}   opponent: {}",
        board.count(Side::Local),
        board.count(Side::Remote)
    );
    s
}

pub fn describe_outcome(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::LocalWin => "VICTORY! You won the game.",
        Outcome::RemoteWin => "DEFEAT. Your opponent won the game.",
        Outcome::Draw => "The game ended in a draw.",
        Outcome::Abandoned => "The game was abandoned: the connection to your opponent was lost.",
    }
}

/// Prints every session event to stdout.
pub struct TerminalObserver;

impl SessionObserver for TerminalObserver {
    fn on_board_changed(&mut self, board: &Board) {
        println!("\n{}", render_board(board));
    }

    fn on_turn_changed(&mut self, is_local_turn: bool) {
        if is_local_turn {
            println!(">>> YOUR TURN  (move X Y TX TY, end, draw, resign)");
        } else {
            println!("... waiting for your opponent");
        }
    }

    fn on_game_ended(&mut self, outcome: Outcome) {
        println!("\n=== GAME OVER ===\n{}", describe_outcome(outcome));
    }

    fn on_draw_requested(&mut self) {
        println!("Your opponent offers a draw. Type `accept` or `reject`.");
    }

    fn on_chat_received(&mut self, text: &str) {
        println!("[opponent] {}", text);
    }

    fn on_session_closed(&mut self) {
        println!("Session closed. Press Enter to exit.");
    }
}
