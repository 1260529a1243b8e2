#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use checkers_link::cli::{parse_command, render_board, TerminalObserver, UiCommand, HELP};
#[cfg(feature = "std")]
use checkers_link::prelude::*;
#[cfg(feature = "std")]
use checkers_link::{init_logging, DEFAULT_PORT};

#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use std::net::IpAddr;
#[cfg(feature = "std")]
use tokio::io::{AsyncBufReadExt, BufReader};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Host a game and wait for an opponent to join.
    Host {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        bind: IpAddr,
        #[arg(long, help = "Fix RNG seed for the first-turn draw (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Delay in milliseconds between game end and teardown")]
        teardown_ms: Option<u64>,
    },
    /// Join a game hosted at ADDRESS.
    Join {
        address: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, help = "Delay in milliseconds between game end and teardown")]
        teardown_ms: Option<u64>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let (connection, config) = match cli.command {
        Commands::Host {
            port,
            bind,
            seed,
            teardown_ms,
        } => {
            let manager =
                ConnectionManager::new(NetConfig::default().with_port(port).with_bind_ip(bind));
            println!("Hosting on {}:{}...", bind, port);
            if let Some(s) = seed {
                println!("Using fixed seed: {} (first turn will be reproducible)", s);
            }
            let listener = manager.listen().await?;
            println!("Waiting for an opponent on {}...", listener.local_addr()?);
            let connection = listener.accept().await?;
            let mut config = session_config(teardown_ms);
            config.seed = seed;
            (connection, config)
        }
        Commands::Join {
            address,
            port,
            teardown_ms,
        } => {
            let manager = ConnectionManager::new(NetConfig::default().with_port(port));
            println!("Connecting to {}:{}...", address, port);
            let connection = manager.join(&address).await?;
            (connection, session_config(teardown_ms))
        }
    };
    println!("Connected to {}", connection.peer_addr());
    println!("{}", HELP);

    let role = connection.role();
    let (source, sink) = connection.into_transport().split();
    let handle = SessionHandle::spawn(role, source, sink, TerminalObserver, config);
    run_prompt(&handle).await?;

    let outcome = handle.leave().await;
    log::info!("{:?} finished: {:?}", role, outcome);
    Ok(())
}

#[cfg(feature = "std")]
fn session_config(teardown_ms: Option<u64>) -> SessionConfig {
    match teardown_ms {
        Some(ms) => SessionConfig::default().with_teardown_delay(Duration::from_millis(ms)),
        None => SessionConfig::default(),
    }
}

#[cfg(feature = "std")]
async fn run_prompt(handle: &SessionHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if handle.is_closed() {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match cmd {
            UiCommand::Move { x, y, tx, ty } => {
                let Some(snapshot) = handle.snapshot().await else {
                    break;
                };
                let piece = Square::new(x, y)
                    .ok()
                    .and_then(|sq| snapshot.board.piece_at(sq))
                    .filter(|p| p.side() == Side::Local);
                match piece {
                    Some(piece) => {
                        if !handle.attempt_move(piece.id(), tx, ty).await {
                            println!("Move not allowed.");
                        }
                    }
                    None => println!("You have no piece on ({}, {}).", x, y),
                }
            }
            UiCommand::EndTurn => {
                if !handle.end_turn().await {
                    println!("You must move before ending your turn.");
                }
            }
            UiCommand::Draw => {
                handle.request_draw();
                println!("Draw offered.");
            }
            UiCommand::RespondDraw(accepted) => {
                handle.respond_draw(accepted);
            }
            UiCommand::Resign => {
                handle.resign();
            }
            UiCommand::Say(text) => {
                handle.send_chat(text);
            }
            UiCommand::Board => {
                if let Some(snapshot) = handle.snapshot().await {
                    println!("{}", render_board(&snapshot.board));
                    println!(
                        "{:?}: {:?}, your turn: {}",
                        snapshot.role, snapshot.state, snapshot.is_local_turn
                    );
                }
            }
            UiCommand::Help => println!("{}", HELP),
            UiCommand::Quit => break,
        }
    }
    Ok(())
}
