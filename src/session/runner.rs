//! The task that owns a running session.
//!
//! Local requests and frames from the listener arrive on one queue and are
//! applied strictly one after another, so the board is only ever touched from
//! this task.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

use super::{GameSession, Outbox, Outcome, SessionObserver, SessionState};
use crate::config::SessionConfig;
use crate::connection::Role;
use crate::listener::{ListenerEvent, MessageListener};
use crate::rules::{Board, PieceId};
use crate::transport::{MessageSink, MessageSource};

/// Copy of the session state for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub role: Role,
    pub board: Board,
    pub state: SessionState,
    pub is_local_turn: bool,
    pub has_moved_this_turn: bool,
    pub is_draw_offered: bool,
}

enum Command {
    AttemptMove {
        piece: PieceId,
        x: i32,
        y: i32,
        reply: oneshot::Sender<bool>,
    },
    EndTurn(oneshot::Sender<bool>),
    Resign,
    RequestDraw,
    RespondDraw(bool),
    Chat(String),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Listener(ListenerEvent),
    Close,
}

impl From<ListenerEvent> for Command {
    fn from(event: ListenerEvent) -> Self {
        Command::Listener(event)
    }
}

enum Wake {
    Command(Option<Command>),
    Teardown,
}

/// Front-end side of a running session. Every call only queues a request;
/// none of them waits on the network.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<Outcome>,
}

impl SessionHandle {
    /// Start the session over an established link: spawn the listener on
    /// `source` and the session task writing to `sink`.
    pub fn spawn<Src, Snk, O>(
        role: Role,
        source: Src,
        sink: Snk,
        observer: O,
        config: SessionConfig,
    ) -> Self
    where
        Src: MessageSource + 'static,
        Snk: MessageSink + 'static,
        O: SessionObserver,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = MessageListener::spawn(source, tx.clone());
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let actor = SessionActor {
            session: GameSession::new(role),
            sink,
            observer,
            listener,
            commands: rx,
            teardown_delay: config.teardown_delay,
            teardown_at: None,
        };
        let task = tokio::spawn(actor.run(rng));
        Self { commands: tx, task }
    }

    fn submit(&self, cmd: Command) -> bool {
        self.commands.send(cmd).is_ok()
    }

    /// Try to move `piece`; resolves to whether the move was accepted.
    pub async fn attempt_move(&self, piece: PieceId, x: i32, y: i32) -> bool {
        let (reply, rx) = oneshot::channel();
        if !self.submit(Command::AttemptMove { piece, x, y, reply }) {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    /// Hand the turn over; resolves to `false` when no move was made yet.
    pub async fn end_turn(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        if !self.submit(Command::EndTurn(reply)) {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    pub fn resign(&self) -> bool {
        self.submit(Command::Resign)
    }

    pub fn request_draw(&self) -> bool {
        self.submit(Command::RequestDraw)
    }

    pub fn respond_draw(&self, accepted: bool) -> bool {
        self.submit(Command::RespondDraw(accepted))
    }

    pub fn send_chat(&self, text: impl Into<String>) -> bool {
        self.submit(Command::Chat(text.into()))
    }

    /// Current state, or `None` once the session is gone.
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        if !self.submit(Command::Snapshot(reply)) {
            return None;
        }
        rx.await.ok()
    }

    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end on its own and return how the game ended.
    pub async fn join(self) -> Outcome {
        let SessionHandle { commands, task } = self;
        drop(commands);
        task.await.unwrap_or(Outcome::Abandoned)
    }

    /// Leave the session. A finished game still waits out its teardown
    /// delay; a running one is abandoned.
    pub async fn leave(self) -> Outcome {
        let SessionHandle { commands, task } = self;
        // The listener holds a sender too, so dropping ours alone would not
        // stop the task.
        let _ = commands.send(Command::Close);
        drop(commands);
        task.await.unwrap_or(Outcome::Abandoned)
    }
}

struct SessionActor<Snk, O> {
    session: GameSession,
    sink: Snk,
    observer: O,
    listener: MessageListener,
    commands: mpsc::UnboundedReceiver<Command>,
    teardown_delay: Duration,
    teardown_at: Option<Instant>,
}

impl<Snk, O> SessionActor<Snk, O>
where
    Snk: MessageSink,
    O: SessionObserver,
{
    async fn run(mut self, mut rng: SmallRng) -> Outcome {
        let mut out = Outbox::new();
        self.session.start(&mut rng, &mut out);
        self.flush(out).await;

        loop {
            let deadline = self.teardown_at;
            let wake = tokio::select! {
                cmd = self.commands.recv() => Wake::Command(cmd),
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => Wake::Teardown,
            };
            match wake {
                Wake::Command(Some(Command::Close)) | Wake::Command(None) => {
                    let mut out = Outbox::new();
                    if self.session.abandon(&mut out) {
                        self.flush(out).await;
                    } else if let Some(at) = self.teardown_at {
                        sleep_until(at).await;
                    }
                    break;
                }
                Wake::Command(Some(cmd)) => self.handle(cmd).await,
                Wake::Teardown => break,
            }
        }

        self.shutdown().await;
        self.session.outcome().unwrap_or(Outcome::Abandoned)
    }

    async fn handle(&mut self, cmd: Command) {
        let mut out = Outbox::new();
        match cmd {
            Command::AttemptMove { piece, x, y, reply } => {
                let accepted = self.session.attempt_local_move(piece, x, y, &mut out);
                if !accepted {
                    log::debug!("Rejected move {} -> ({}, {})", piece, x, y);
                }
                let _ = reply.send(accepted);
            }
            Command::EndTurn(reply) => {
                let _ = reply.send(self.session.end_turn(&mut out));
            }
            Command::Resign => {
                self.session.resign(&mut out);
            }
            Command::RequestDraw => {
                self.session.request_draw(&mut out);
            }
            Command::RespondDraw(accepted) => {
                self.session.respond_draw(accepted, &mut out);
            }
            Command::Chat(text) => {
                self.session.send_chat(&text, &mut out);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Listener(ListenerEvent::Frame(msg)) => self.session.receive(msg, &mut out),
            Command::Listener(ListenerEvent::Stopped(err)) => {
                self.session.link_failed(&err, &mut out)
            }
            Command::Close => {}
        }
        self.flush(out).await;
    }

    /// Write queued frames in order, then tell the observer, then arm the
    /// teardown timer if the session just ended.
    async fn flush(&mut self, mut out: Outbox) {
        let messages = std::mem::take(&mut out.messages);
        for msg in messages {
            log::debug!("Sending {}", msg.kind());
            if let Err(err) = self.sink.send(msg).await {
                // Whatever was queued behind the failed frame is dropped.
                self.session.link_failed(&err, &mut out);
                break;
            }
        }
        for n in &out.notifications {
            n.dispatch(&mut self.observer, self.session.board());
        }
        if out.teardown && self.teardown_at.is_none() {
            log::info!("Closing session in {:?}", self.teardown_delay);
            self.teardown_at = Some(Instant::now() + self.teardown_delay);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            role: self.session.role(),
            board: self.session.board().clone(),
            state: self.session.state(),
            is_local_turn: self.session.is_local_turn(),
            has_moved_this_turn: self.session.has_moved_this_turn(),
            is_draw_offered: self.session.is_draw_offered(),
        }
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.sink.close().await {
            log::debug!("Error while closing link: {}", e);
        }
        self.listener.stop();
        self.observer.on_session_closed();
        log::info!("Session closed");
    }
}
