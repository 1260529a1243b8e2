//! Turn and session state machine.
//!
//! [`GameSession`] does no I/O. Every operation records what must happen next
//! (frames to send, notifications to emit, whether to tear down) in an
//! [`Outbox`]; [`SessionHandle`] runs the session inside one task and carries
//! the outbox out.

use rand::Rng;

use crate::connection::Role;
use crate::error::LinkError;
use crate::protocol::Message;
use crate::rules::{Board, BoardError, MoveKind, MoveOutcome, PieceId, Side, Square};

pub mod observer;
pub mod runner;

pub use observer::{ChannelObserver, Notification, SessionObserver};
pub use runner::{SessionHandle, SessionSnapshot};

/// Longest chat text accepted for sending, in bytes.
pub const MAX_CHAT_LEN: usize = 4096;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    LocalWin,
    RemoteWin,
    Draw,
    /// The link failed or the peer sent something unusable.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Ended(Outcome),
}

/// Side effects produced by one session operation, in order.
#[derive(Debug, Default)]
pub struct Outbox {
    pub messages: Vec<Message>,
    pub notifications: Vec<Notification>,
    /// Set once, on the transition into a terminal state.
    pub teardown: bool,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.notifications.is_empty() && !self.teardown
    }

    fn send(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    fn notify(&mut self, n: Notification) {
        self.notifications.push(n);
    }
}

pub struct GameSession {
    role: Role,
    board: Board,
    state: SessionState,
    local_turn: bool,
    moved_this_turn: bool,
    // Piece that captured this turn; only it may keep jumping.
    chain: Option<PieceId>,
    peer_offered_draw: bool,
    draw_requested: bool,
    teardown_scheduled: bool,
}

impl GameSession {
    pub fn new(role: Role) -> Self {
        Self::with_board(role, Board::standard())
    }

    /// Session that plays from `board` instead of the starting formation.
    pub fn with_board(role: Role, board: Board) -> Self {
        Self {
            role,
            board,
            state: SessionState::NotStarted,
            local_turn: false,
            moved_this_turn: false,
            chain: None,
            peer_offered_draw: false,
            draw_requested: false,
            teardown_scheduled: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SessionState::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == SessionState::InProgress
    }

    pub fn is_local_turn(&self) -> bool {
        self.local_turn
    }

    pub fn has_moved_this_turn(&self) -> bool {
        self.moved_this_turn
    }

    /// Whether the peer's draw offer is waiting for an answer.
    pub fn is_draw_offered(&self) -> bool {
        self.peer_offered_draw
    }

    fn reset_turn(&mut self) {
        self.moved_this_turn = false;
        self.chain = None;
    }

    /// Show the board. The host also draws the first mover, tells the guest
    /// its turn and starts play; the guest waits for `GameStarted`.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R, out: &mut Outbox) {
        if self.state != SessionState::NotStarted {
            return;
        }
        out.notify(Notification::BoardChanged);

        if self.role == Role::Host {
            self.local_turn = rng.random_bool(0.5);
            self.reset_turn();
            out.send(Message::TurnChanged {
                is_recipients_turn: !self.local_turn,
            });
            out.send(Message::GameStarted);
            self.state = SessionState::InProgress;
            out.notify(Notification::TurnChanged {
                is_local_turn: self.local_turn,
            });
            log::info!(
                "Game started, {} moves first",
                if self.local_turn { "host" } else { "guest" }
            );
        }
    }

    /// Try to move one of our pieces. Returns `false`, with no side effects,
    /// when the move is not allowed right now.
    ///
    /// After a capture the same piece may keep capturing; any other move has
    /// to wait for the next turn. A step ends the turn on its own.
    pub fn attempt_local_move(
        &mut self,
        id: PieceId,
        target_x: i32,
        target_y: i32,
        out: &mut Outbox,
    ) -> bool {
        if self.state != SessionState::InProgress || !self.local_turn {
            return false;
        }
        match self.board.piece(id) {
            Some(piece) if piece.side() == Side::Local => {}
            _ => return false,
        }
        let target = Square::clamped(target_x, target_y);
        let Some(kind) = self.board.classify(id, target) else {
            return false;
        };
        if self.moved_this_turn && !(kind == MoveKind::Jump && self.chain == Some(id)) {
            return false;
        }
        let outcome = match self
            .board
            .apply_move(id, target.x() as i32, target.y() as i32)
        {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Legal move {} -> {:?} failed to apply: {}", id, target, e);
                return false;
            }
        };

        out.send(Message::PieceMoved {
            from_x: outcome.from.x(),
            from_y: outcome.from.y(),
            to_x: outcome.to.x(),
            to_y: outcome.to.y(),
        });
        out.notify(Notification::BoardChanged);
        self.moved_this_turn = true;
        match kind {
            MoveKind::Jump => self.chain = Some(id),
            MoveKind::Step => {
                self.end_turn(out);
            }
        }

        if let Some(winner) = self.board.winner() {
            self.declare_end(winner == Side::Local, out);
        }
        true
    }

    /// Apply the peer's move. Coordinates are in the peer's perspective and
    /// get mirrored first. Legality is not re-checked: the peer's engine owns
    /// its moves. An error means the two boards no longer agree.
    pub fn apply_remote_move(
        &mut self,
        from_x: u8,
        from_y: u8,
        to_x: u8,
        to_y: u8,
        out: &mut Outbox,
    ) -> Result<MoveOutcome, BoardError> {
        let from = Square::new(from_x, from_y)?.mirrored();
        let to = Square::new(to_x, to_y)?.mirrored();
        let piece = match self.board.piece_at(from) {
            Some(piece) if piece.side() == Side::Remote => *piece,
            _ => return Err(BoardError::NoPiece),
        };
        if !self.local_turn {
            log::debug!("Remote move {:?} -> {:?}", from, to);
        } else {
            log::warn!("Remote move {:?} -> {:?} arrived on our turn", from, to);
        }
        let outcome = self
            .board
            .apply_move(piece.id(), to.x() as i32, to.y() as i32)?;
        out.notify(Notification::BoardChanged);

        if let Some(winner) = self.board.winner() {
            self.declare_end(winner == Side::Local, out);
        }
        Ok(outcome)
    }

    /// Hand the turn to the peer. Needs at least one move this turn.
    pub fn end_turn(&mut self, out: &mut Outbox) -> bool {
        if self.state != SessionState::InProgress || !self.local_turn || !self.moved_this_turn {
            return false;
        }
        self.local_turn = false;
        self.reset_turn();
        out.send(Message::TurnChanged {
            is_recipients_turn: true,
        });
        out.notify(Notification::TurnChanged {
            is_local_turn: false,
        });
        true
    }

    pub fn resign(&mut self, out: &mut Outbox) -> bool {
        self.declare_end(false, out)
    }

    /// End the game with a winner and tell the peer the mirrored result.
    pub fn declare_end(&mut self, local_won: bool, out: &mut Outbox) -> bool {
        if self.state != SessionState::InProgress {
            return false;
        }
        out.send(Message::GameEnded {
            did_recipient_win: !local_won,
        });
        self.finish(
            if local_won {
                Outcome::LocalWin
            } else {
                Outcome::RemoteWin
            },
            out,
        );
        true
    }

    pub fn request_draw(&mut self, out: &mut Outbox) -> bool {
        if self.state != SessionState::InProgress || self.draw_requested {
            return false;
        }
        self.draw_requested = true;
        out.send(Message::DrawRequested);
        true
    }

    /// Answer the peer's pending draw offer. Accepting ends the game here at
    /// once; the peer ends its own game when the answer reaches it.
    pub fn respond_draw(&mut self, accepted: bool, out: &mut Outbox) -> bool {
        if self.state != SessionState::InProgress || !self.peer_offered_draw {
            return false;
        }
        self.peer_offered_draw = false;
        out.send(Message::DrawResponse { accepted });
        if accepted {
            self.finish(Outcome::Draw, out);
        }
        true
    }

    pub fn send_chat(&mut self, text: &str, out: &mut Outbox) -> bool {
        if matches!(self.state, SessionState::Ended(_)) || text.len() > MAX_CHAT_LEN {
            return false;
        }
        out.send(Message::ChatMessage {
            text: text.to_string(),
        });
        true
    }

    /// Apply one frame from the peer.
    pub fn receive(&mut self, msg: Message, out: &mut Outbox) {
        match msg {
            Message::GameStarted
                if self.state == SessionState::NotStarted && self.role == Role::Guest =>
            {
                self.state = SessionState::InProgress;
                out.notify(Notification::TurnChanged {
                    is_local_turn: self.local_turn,
                });
                log::info!("Game started, {} moves first", if self.local_turn { "guest" } else { "host" });
            }
            Message::TurnChanged { is_recipients_turn }
                if !matches!(self.state, SessionState::Ended(_)) =>
            {
                self.local_turn = is_recipients_turn;
                self.reset_turn();
                if self.state == SessionState::InProgress {
                    out.notify(Notification::TurnChanged {
                        is_local_turn: is_recipients_turn,
                    });
                }
            }
            Message::PieceMoved {
                from_x,
                from_y,
                to_x,
                to_y,
            } if self.state == SessionState::InProgress => {
                if let Err(e) = self.apply_remote_move(from_x, from_y, to_x, to_y, out) {
                    log::error!(
                        "Boards diverged on remote move ({},{}) -> ({},{}): {}",
                        from_x,
                        from_y,
                        to_x,
                        to_y,
                        e
                    );
                    self.finish(Outcome::Abandoned, out);
                }
            }
            Message::GameEnded { did_recipient_win } if self.state == SessionState::InProgress => {
                self.finish(
                    if did_recipient_win {
                        Outcome::LocalWin
                    } else {
                        Outcome::RemoteWin
                    },
                    out,
                );
            }
            Message::DrawRequested if self.state == SessionState::InProgress => {
                self.peer_offered_draw = true;
                out.notify(Notification::DrawRequested);
            }
            Message::DrawResponse { accepted }
                if self.state == SessionState::InProgress && self.draw_requested =>
            {
                self.draw_requested = false;
                if accepted {
                    self.finish(Outcome::Draw, out);
                } else {
                    log::info!("Opponent declined the draw");
                }
            }
            Message::ChatMessage { text } => {
                out.notify(Notification::ChatReceived(text));
            }
            other => {
                log::debug!("Ignoring {} in state {:?}", other.kind(), self.state);
            }
        }
    }

    /// The link failed. Before the game ended that abandons it; afterwards it
    /// is the expected close.
    pub fn link_failed(&mut self, err: &LinkError, out: &mut Outbox) {
        match self.state {
            SessionState::Ended(_) => log::debug!("Link closed after game end: {}", err),
            _ => {
                log::warn!("Connection lost: {}", err);
                self.finish(Outcome::Abandoned, out);
            }
        }
    }

    /// The local player walks away. Nothing is sent; the peer learns of it
    /// when the link closes.
    pub fn abandon(&mut self, out: &mut Outbox) -> bool {
        if matches!(self.state, SessionState::Ended(_)) {
            return false;
        }
        self.finish(Outcome::Abandoned, out);
        true
    }

    fn finish(&mut self, outcome: Outcome, out: &mut Outbox) {
        self.state = SessionState::Ended(outcome);
        self.local_turn = false;
        self.reset_turn();
        self.peer_offered_draw = false;
        self.draw_requested = false;
        out.notify(Notification::GameEnded(outcome));
        if !self.teardown_scheduled {
            self.teardown_scheduled = true;
            out.teardown = true;
        }
        log::info!("Game over: {:?}", outcome);
    }
}
