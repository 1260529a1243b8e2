#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod rules;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod connection;
#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod listener;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod prelude;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;

pub use rules::*;

#[cfg(feature = "std")]
pub use config::*;
#[cfg(feature = "std")]
pub use connection::{Connection, ConnectionManager, HostListener, Role};
#[cfg(feature = "std")]
pub use error::{CodecError, LinkError};
#[cfg(feature = "std")]
pub use listener::{ListenerEvent, MessageListener};
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with, parse_level, LOG_ENV};
#[cfg(feature = "std")]
pub use protocol::{decode, encode, Message};
#[cfg(feature = "std")]
pub use session::{
    ChannelObserver, GameSession, Notification, Outbox, Outcome, SessionHandle, SessionObserver,
    SessionSnapshot, SessionState,
};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, MessageSink, MessageSource};
