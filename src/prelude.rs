//! Commonly used types and utilities for ease of import.

pub use crate::{Board, MoveKind, PieceId, Side, Square};

pub use crate::{
    ConnectionManager, GameSession, LinkError, Message, NetConfig, Outcome, Role, SessionConfig,
    SessionHandle, SessionObserver, SessionState,
};

pub use crate::transport::{in_memory::InMemoryTransport, tcp::TcpTransport, MessageSink, MessageSource};
