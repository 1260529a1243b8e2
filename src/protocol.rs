#![cfg(feature = "std")]

//! Wire codec for the seven session messages.
//!
//! A payload is the bincode encoding of [`Message`] with fixed-width
//! little-endian integers: a `u32` tag (the variant index) followed by the
//! variant's fields in declaration order. Tags are part of the protocol and
//! must never be reordered.

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::rules::MAX_COORD;

/// Highest tag in use.
pub const MAX_TAG: u32 = 6;

/// Size of the encoded tag.
const TAG_LEN: usize = 4;

/// Messages exchanged between the two peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// 0: the host has set up the board and assigned turns.
    GameStarted,
    /// 1: turn assignment or hand-over.
    TurnChanged { is_recipients_turn: bool },
    /// 2: a move, in the sender's coordinates.
    PieceMoved {
        from_x: u8,
        from_y: u8,
        to_x: u8,
        to_y: u8,
    },
    /// 3: the sender's game is over.
    GameEnded { did_recipient_win: bool },
    /// 4: the sender offers a draw.
    DrawRequested,
    /// 5: answer to a draw offer.
    DrawResponse { accepted: bool },
    /// 6: free text for the opponent.
    ChatMessage { text: String },
}

impl Message {
    /// Numeric tag written on the wire.
    pub fn tag(&self) -> u32 {
        match self {
            Message::GameStarted => 0,
            Message::TurnChanged { .. } => 1,
            Message::PieceMoved { .. } => 2,
            Message::GameEnded { .. } => 3,
            Message::DrawRequested => 4,
            Message::DrawResponse { .. } => 5,
            Message::ChatMessage { .. } => 6,
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::GameStarted => "GameStarted",
            Message::TurnChanged { .. } => "TurnChanged",
            Message::PieceMoved { .. } => "PieceMoved",
            Message::GameEnded { .. } => "GameEnded",
            Message::DrawRequested => "DrawRequested",
            Message::DrawResponse { .. } => "DrawResponse",
            Message::ChatMessage { .. } => "ChatMessage",
        }
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Serialize a message into one frame payload.
pub fn encode(msg: &Message) -> Result<Vec<u8>, CodecError> {
    options()
        .serialize(msg)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Parse one frame payload.
///
/// The tag is checked before any field is read, so an unknown kind always
/// fails the same way regardless of what follows it.
pub fn decode(payload: &[u8]) -> Result<Message, CodecError> {
    if payload.len() < TAG_LEN {
        return Err(CodecError::Truncated(payload.len()));
    }
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&payload[..TAG_LEN]);
    let tag = u32::from_le_bytes(tag);
    if tag > MAX_TAG {
        return Err(CodecError::UnknownTag(tag));
    }

    let msg: Message = options()
        .deserialize(payload)
        .map_err(|e| CodecError::Malformed(e.to_string()))?;

    if let Message::PieceMoved {
        from_x,
        from_y,
        to_x,
        to_y,
    } = msg
    {
        if let Some(&bad) = [from_x, from_y, to_x, to_y]
            .iter()
            .find(|&&v| v > MAX_COORD)
        {
            return Err(CodecError::CoordinateOutOfRange(bad));
        }
    }
    Ok(msg)
}
