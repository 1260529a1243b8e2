use crate::error::LinkError;
use crate::protocol::Message;

/// Writing half of a peer link.
#[async_trait::async_trait]
pub trait MessageSink: Send {
    /// Write one message as one frame.
    async fn send(&mut self, msg: Message) -> Result<(), LinkError>;
    /// Close the link; later sends fail.
    async fn close(&mut self) -> Result<(), LinkError>;
}

/// Reading half of a peer link.
#[async_trait::async_trait]
pub trait MessageSource: Send {
    /// Wait for the next complete message.
    async fn recv(&mut self) -> Result<Message, LinkError>;
}

#[cfg(feature = "std")]
pub mod tcp;
#[cfg(feature = "std")]
pub mod in_memory;
