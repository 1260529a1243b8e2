//! Command-line front-end for a networked game
//!
//! This module provides the pieces the `checkers` binary is built from:
//! - Board rendering and a stdout [`SessionObserver`](crate::SessionObserver)
//! - Parsing of the line commands typed during a game

#![cfg(feature = "std")]

pub mod interface;

pub use interface::*;

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  move X Y TX TY   move your piece on (X,Y) to (TX,TY)
  end              end your turn after a capture
  draw             offer a draw
  accept | reject  answer a draw offer
  resign           give up the game
  say TEXT         chat with your opponent
  board            show the board
  help             show this help
  quit             leave";

/// One line typed by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Move { x: u8, y: u8, tx: i32, ty: i32 },
    EndTurn,
    Draw,
    RespondDraw(bool),
    Resign,
    Say(String),
    Board,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<UiCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "move" | "m" => {
            let nums: Vec<&str> = rest.split_whitespace().collect();
            if nums.len() != 4 {
                return Err("usage: move X Y TX TY".to_string());
            }
            let x = parse_coord(nums[0])?;
            let y = parse_coord(nums[1])?;
            // Targets may be off the board; the engine clamps them.
            let tx: i32 = nums[2]
                .parse()
                .map_err(|_| format!("Invalid target '{}'", nums[2]))?;
            let ty: i32 = nums[3]
                .parse()
                .map_err(|_| format!("Invalid target '{}'", nums[3]))?;
            Ok(UiCommand::Move { x, y, tx, ty })
        }
        "end" => Ok(UiCommand::EndTurn),
        "draw" => Ok(UiCommand::Draw),
        "accept" => Ok(UiCommand::RespondDraw(true)),
        "reject" => Ok(UiCommand::RespondDraw(false)),
        "resign" => Ok(UiCommand::Resign),
        "say" if !rest.is_empty() => Ok(UiCommand::Say(rest.to_string())),
        "say" => Err("usage: say TEXT".to_string()),
        "board" | "b" => Ok(UiCommand::Board),
        "help" | "?" => Ok(UiCommand::Help),
        "quit" | "exit" => Ok(UiCommand::Quit),
        "" => Err("Empty input".to_string()),
        other => Err(format!("Unknown command '{}' (try `help`)", other)),
    }
}

fn parse_coord(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(v) if v < crate::rules::BOARD_SIZE => Ok(v),
        _ => Err(format!("Invalid square coordinate '{}' - must be 0-7", s)),
    }
}
