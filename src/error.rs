#![cfg(feature = "std")]

//! Errors of the networked layer.

use thiserror::Error;

/// Failures while encoding or decoding a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Payload too short to hold a tag.
    #[error("Frame truncated: {0} bytes")]
    Truncated(usize),

    /// Tag outside the known message kinds.
    #[error("Unknown message tag: {0}")]
    UnknownTag(u32),

    /// A move coordinate is off the board.
    #[error("Move coordinate out of range: {0}")]
    CoordinateOutOfRange(u8),

    /// Fields could not be decoded.
    #[error("Malformed frame: {0}")]
    Malformed(String),

    /// Message could not be serialized.
    #[error("Serialization error: {0}")]
    Encode(String),

    /// Length prefix of zero.
    #[error("Invalid message length: 0")]
    EmptyFrame,

    /// Length prefix above the configured maximum.
    #[error("Message too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },
}

/// Failures of a connection attempt or an established link.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Host unreachable or connection refused.
    #[error("Could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Listening endpoint could not be opened.
    #[error("Could not listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Another listen or connect attempt is already active.
    #[error("A connection attempt is already in progress")]
    Busy,

    /// The peer sent something we cannot decode.
    #[error("Protocol error: {0}")]
    Protocol(#[from] CodecError),

    /// Stream closed or reset by the peer.
    #[error("Connection closed by peer")]
    Closed,

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinkError {
    /// Recoverable errors abort one attempt; everything else ends the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LinkError::Connect { .. } | LinkError::Bind { .. } | LinkError::Busy
        )
    }

    /// Map an I/O error from an established stream, folding the
    /// "peer went away" kinds into [`LinkError::Closed`].
    pub(crate) fn from_stream(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe => LinkError::Closed,
            _ => LinkError::Io(err),
        }
    }
}
