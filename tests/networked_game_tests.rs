use std::time::Duration;

use checkers_link::prelude::*;
use checkers_link::{ChannelObserver, Notification};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

struct Player {
    handle: SessionHandle,
    events: UnboundedReceiver<Notification>,
}

impl Player {
    /// Drain notifications until one matches.
    async fn wait_for(&mut self, wanted: Notification) {
        let found = timeout(WAIT, async {
            while let Some(n) = self.events.recv().await {
                if n == wanted {
                    return true;
                }
            }
            false
        })
        .await;
        assert_eq!(found, Ok(true), "never saw {:?}", wanted);
    }

    async fn is_local_turn(&self) -> bool {
        self.handle.snapshot().await.unwrap().is_local_turn
    }
}

fn config() -> SessionConfig {
    SessionConfig::default()
        .with_seed(7)
        .with_teardown_delay(Duration::from_millis(50))
}

fn in_memory_game() -> (Player, Player) {
    let (a, b) = InMemoryTransport::pair();
    let (host_src, host_sink) = a.split();
    let (guest_src, guest_sink) = b.split();
    let (host_obs, host_events) = ChannelObserver::new();
    let (guest_obs, guest_events) = ChannelObserver::new();
    let host = SessionHandle::spawn(Role::Host, host_src, host_sink, host_obs, config());
    let guest = SessionHandle::spawn(Role::Guest, guest_src, guest_sink, guest_obs, config());
    (
        Player {
            handle: host,
            events: host_events,
        },
        Player {
            handle: guest,
            events: guest_events,
        },
    )
}

/// Wait until both sides are playing; returns (mover, waiter).
async fn started(host: Player, mut guest: Player) -> (Player, Player) {
    let host_first = {
        let snapshot = host.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, SessionState::InProgress);
        snapshot.is_local_turn
    };
    guest
        .wait_for(Notification::TurnChanged {
            is_local_turn: !host_first,
        })
        .await;
    if host_first {
        (host, guest)
    } else {
        (guest, host)
    }
}

#[tokio::test]
async fn exactly_one_side_moves_first() {
    let (host, guest) = in_memory_game();
    let (mover, waiter) = started(host, guest).await;
    assert!(mover.is_local_turn().await);
    assert!(!waiter.is_local_turn().await);
}

#[tokio::test]
async fn first_move_reaches_the_peer_mirrored() {
    let (host, guest) = in_memory_game();
    let (mover, mut waiter) = started(host, guest).await;

    let snapshot = mover.handle.snapshot().await.unwrap();
    let piece = snapshot.board.piece_at(Square::new(2, 5).unwrap()).unwrap().id();
    assert!(mover.handle.attempt_move(piece, 3, 4).await);
    assert!(!mover.is_local_turn().await);

    waiter
        .wait_for(Notification::TurnChanged {
            is_local_turn: true,
        })
        .await;
    let seen = waiter.handle.snapshot().await.unwrap();
    assert!(seen.board.piece_at(Square::new(5, 2).unwrap()).is_none());
    assert_eq!(
        seen.board.piece_at(Square::new(4, 3).unwrap()).unwrap().side(),
        Side::Remote
    );
    assert!(seen.is_local_turn);

    // A move out of turn is refused.
    let piece = snapshot.board.piece_at(Square::new(0, 5).unwrap()).unwrap().id();
    assert!(!mover.handle.attempt_move(piece, 1, 4).await);
}

#[tokio::test]
async fn resignation_ends_both_sides() {
    let (host, guest) = in_memory_game();
    let (mut mover, mut waiter) = started(host, guest).await;

    assert!(mover.handle.resign());
    mover.wait_for(Notification::GameEnded(Outcome::RemoteWin)).await;
    waiter.wait_for(Notification::GameEnded(Outcome::LocalWin)).await;
    mover.wait_for(Notification::SessionClosed).await;
    waiter.wait_for(Notification::SessionClosed).await;

    assert_eq!(mover.handle.join().await, Outcome::RemoteWin);
    assert_eq!(waiter.handle.join().await, Outcome::LocalWin);
}

#[tokio::test]
async fn accepted_draw_ends_both_sides() {
    let (host, guest) = in_memory_game();
    let (mover, mut waiter) = started(host, guest).await;

    assert!(mover.handle.request_draw());
    waiter.wait_for(Notification::DrawRequested).await;
    assert!(waiter.handle.snapshot().await.unwrap().is_draw_offered);
    assert!(waiter.handle.respond_draw(true));

    let (a, b) = tokio::join!(mover.handle.join(), waiter.handle.join());
    assert_eq!(a, Outcome::Draw);
    assert_eq!(b, Outcome::Draw);
}

#[tokio::test]
async fn rejected_draw_keeps_both_playing() {
    let (host, guest) = in_memory_game();
    let (mut mover, mut waiter) = started(host, guest).await;

    mover.handle.request_draw();
    waiter.wait_for(Notification::DrawRequested).await;
    waiter.handle.respond_draw(false);
    // Chat after the answer proves the answer was processed first.
    waiter.handle.send_chat("not yet");

    mover
        .wait_for(Notification::ChatReceived("not yet".to_string()))
        .await;
    let a = mover.handle.snapshot().await.unwrap();
    let b = waiter.handle.snapshot().await.unwrap();
    assert_eq!(a.state, SessionState::InProgress);
    assert_eq!(b.state, SessionState::InProgress);
    assert!(!b.is_draw_offered);
}

#[tokio::test]
async fn end_turn_reports_refusal() {
    let (host, guest) = in_memory_game();
    let (mover, waiter) = started(host, guest).await;

    assert!(!mover.handle.end_turn().await);
    assert!(!waiter.handle.end_turn().await);
    assert!(mover.is_local_turn().await);

    let snapshot = mover.handle.snapshot().await.unwrap();
    let piece = snapshot.board.piece_at(Square::new(6, 5).unwrap()).unwrap().id();
    assert!(mover.handle.attempt_move(piece, 7, 4).await);
    // The step already handed the turn over.
    assert!(!mover.handle.end_turn().await);
    assert!(!mover.is_local_turn().await);

    mover.handle.leave().await;
    waiter.handle.leave().await;
}

#[tokio::test]
async fn leaving_mid_game_abandons_both() {
    let (host, guest) = in_memory_game();
    let (mover, mut waiter) = started(host, guest).await;

    let Player { handle, mut events } = mover;
    assert_eq!(handle.leave().await, Outcome::Abandoned);
    let mut seen = Vec::new();
    while let Ok(n) = events.try_recv() {
        seen.push(n);
    }
    let ended = seen
        .iter()
        .position(|n| *n == Notification::GameEnded(Outcome::Abandoned))
        .expect("leaving player told the game ended");
    assert_eq!(seen.last(), Some(&Notification::SessionClosed));
    assert!(ended < seen.len() - 1);

    waiter.wait_for(Notification::GameEnded(Outcome::Abandoned)).await;
    assert_eq!(waiter.handle.join().await, Outcome::Abandoned);
}

#[tokio::test(flavor = "multi_thread")]
async fn full_game_setup_over_tcp() -> anyhow::Result<()> {
    let host_mgr = ConnectionManager::new(
        NetConfig::default()
            .with_bind_ip("127.0.0.1".parse()?)
            .with_port(0),
    );
    let listener = host_mgr.listen().await?;
    let port = listener.local_addr()?.port();
    let guest_mgr = ConnectionManager::new(NetConfig::default().with_port(port));
    let (host_conn, guest_conn) = tokio::join!(listener.accept(), guest_mgr.join("127.0.0.1"));

    let (host_src, host_sink) = host_conn?.into_transport().split();
    let (guest_src, guest_sink) = guest_conn?.into_transport().split();
    let (host_obs, host_events) = ChannelObserver::new();
    let (guest_obs, guest_events) = ChannelObserver::new();
    let host = Player {
        handle: SessionHandle::spawn(Role::Host, host_src, host_sink, host_obs, config()),
        events: host_events,
    };
    let guest = Player {
        handle: SessionHandle::spawn(Role::Guest, guest_src, guest_sink, guest_obs, config()),
        events: guest_events,
    };

    let (mut mover, mut waiter) = started(host, guest).await;
    let snapshot = mover.handle.snapshot().await.unwrap();
    let piece = snapshot.board.piece_at(Square::new(6, 5).unwrap()).unwrap().id();
    assert!(mover.handle.attempt_move(piece, 7, 4).await);
    waiter
        .wait_for(Notification::TurnChanged {
            is_local_turn: true,
        })
        .await;
    let seen = waiter.handle.snapshot().await.unwrap();
    assert_eq!(
        seen.board.piece_at(Square::new(0, 3).unwrap()).unwrap().side(),
        Side::Remote
    );

    waiter.handle.send_chat("nice");
    mover.wait_for(Notification::ChatReceived("nice".to_string())).await;

    waiter.handle.resign();
    let (a, b) = tokio::join!(mover.handle.join(), waiter.handle.join());
    assert_eq!(a, Outcome::LocalWin);
    assert_eq!(b, Outcome::RemoteWin);
    Ok(())
}
