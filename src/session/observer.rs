//! Notifications from a session to whatever front-end drives it.

use tokio::sync::mpsc;

use super::Outcome;
use crate::rules::Board;

/// Callbacks a front-end implements to follow a session.
///
/// All calls come from the session task, one at a time, in the order the
/// underlying events happened.
pub trait SessionObserver: Send + 'static {
    fn on_board_changed(&mut self, _board: &Board) {}
    fn on_turn_changed(&mut self, _is_local_turn: bool) {}
    fn on_game_ended(&mut self, _outcome: Outcome) {}
    fn on_draw_requested(&mut self) {}
    fn on_chat_received(&mut self, _text: &str) {}
    /// The link is closed and the session is gone.
    fn on_session_closed(&mut self) {}
}

/// A notification as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    BoardChanged,
    TurnChanged { is_local_turn: bool },
    GameEnded(Outcome),
    DrawRequested,
    ChatReceived(String),
    SessionClosed,
}

impl Notification {
    /// Deliver to an observer; `board` is the state after the change.
    pub fn dispatch(&self, observer: &mut dyn SessionObserver, board: &Board) {
        match self {
            Notification::BoardChanged => observer.on_board_changed(board),
            Notification::TurnChanged { is_local_turn } => observer.on_turn_changed(*is_local_turn),
            Notification::GameEnded(outcome) => observer.on_game_ended(*outcome),
            Notification::DrawRequested => observer.on_draw_requested(),
            Notification::ChatReceived(text) => observer.on_chat_received(text),
            Notification::SessionClosed => observer.on_session_closed(),
        }
    }
}

/// Observer that forwards every callback as a [`Notification`] on a channel.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, n: Notification) {
        // A dropped receiver just means nobody is watching any more.
        let _ = self.tx.send(n);
    }
}

impl SessionObserver for ChannelObserver {
    fn on_board_changed(&mut self, _board: &Board) {
        self.emit(Notification::BoardChanged);
    }

    fn on_turn_changed(&mut self, is_local_turn: bool) {
        self.emit(Notification::TurnChanged { is_local_turn });
    }

    fn on_game_ended(&mut self, outcome: Outcome) {
        self.emit(Notification::GameEnded(outcome));
    }

    fn on_draw_requested(&mut self) {
        self.emit(Notification::DrawRequested);
    }

    fn on_chat_received(&mut self, text: &str) {
        self.emit(Notification::ChatReceived(text.to_string()));
    }

    fn on_session_closed(&mut self) {
        self.emit(Notification::SessionClosed);
    }
}
