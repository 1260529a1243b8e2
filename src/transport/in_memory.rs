#![cfg(feature = "std")]

use tokio::sync::mpsc;

use crate::error::LinkError;
use crate::protocol::{self, Message};
use crate::transport::{MessageSink, MessageSource};

/// One end of an in-process link. Frames cross as encoded bytes, so the codec
/// runs exactly as it does over TCP.
pub struct InMemoryTransport {
    incoming: mpsc::UnboundedReceiver<Vec<u8>>,
    outgoing: mpsc::UnboundedSender<Vec<u8>>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        (
            Self {
                incoming: rx1,
                outgoing: tx2,
            },
            Self {
                incoming: rx2,
                outgoing: tx1,
            },
        )
    }

    pub fn split(self) -> (InMemorySource, InMemorySink) {
        (
            InMemorySource {
                incoming: self.incoming,
            },
            InMemorySink {
                outgoing: Some(self.outgoing),
            },
        )
    }
}

pub struct InMemorySource {
    incoming: mpsc::UnboundedReceiver<Vec<u8>>,
}

pub struct InMemorySink {
    outgoing: Option<mpsc::UnboundedSender<Vec<u8>>>,
}

impl InMemorySink {
    /// Push raw bytes as one frame, bypassing the encoder.
    pub fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), LinkError> {
        let outgoing = self.outgoing.as_ref().ok_or(LinkError::Closed)?;
        outgoing.send(frame).map_err(|_| LinkError::Closed)
    }
}

#[async_trait::async_trait]
impl MessageSink for InMemorySink {
    async fn send(&mut self, msg: Message) -> Result<(), LinkError> {
        let frame = protocol::encode(&msg)?;
        self.send_frame(frame)
    }

    async fn close(&mut self) -> Result<(), LinkError> {
        self.outgoing = None;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MessageSource for InMemorySource {
    async fn recv(&mut self) -> Result<Message, LinkError> {
        match self.incoming.recv().await {
            Some(frame) => Ok(protocol::decode(&frame)?),
            None => Err(LinkError::Closed),
        }
    }
}
