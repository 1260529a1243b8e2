#![cfg(feature = "std")]

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::config::MAX_MESSAGE_SIZE;
use crate::error::{CodecError, LinkError};
use crate::protocol::{self, Message};
use crate::transport::{MessageSink, MessageSource};

/// Length-prefixed framing over a TCP stream.
///
/// Every frame is a 4-byte big-endian payload length followed by the payload.
pub struct TcpTransport {
    stream: TcpStream,
    max_message_size: u32,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    pub fn with_max_message_size(stream: TcpStream, max_message_size: u32) -> Self {
        Self {
            stream,
            max_message_size,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, LinkError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Split into independent reading and writing halves so the listener can
    /// block on reads while the session keeps writing.
    pub fn split(self) -> (TcpSource, TcpSink) {
        let (read, write) = self.stream.into_split();
        (
            TcpSource {
                read,
                max_message_size: self.max_message_size,
            },
            TcpSink {
                write: Some(write),
                max_message_size: self.max_message_size,
            },
        )
    }
}

pub struct TcpSource {
    read: OwnedReadHalf,
    max_message_size: u32,
}

pub struct TcpSink {
    write: Option<OwnedWriteHalf>,
    max_message_size: u32,
}

/// Read one frame payload.
pub async fn read_frame<R>(reader: &mut R, max_message_size: u32) -> Result<Vec<u8>, LinkError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(LinkError::from_stream)?;

    let len = u32::from_be_bytes(len_buf);
    // Bounded before allocating.
    if len > max_message_size {
        return Err(CodecError::FrameTooLarge {
            size: len as usize,
            max: max_message_size as usize,
        }
        .into());
    }
    if len == 0 {
        return Err(CodecError::EmptyFrame.into());
    }

    let mut buf = vec![0u8; len as usize];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(LinkError::from_stream)?;
    Ok(buf)
}

/// Write one frame with a single `write_all`, so a frame is never interleaved
/// with another writer's bytes.
pub async fn write_frame<W>(
    writer: &mut W,
    payload: &[u8],
    max_message_size: u32,
) -> Result<(), LinkError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > max_message_size as usize {
        return Err(CodecError::FrameTooLarge {
            size: payload.len(),
            max: max_message_size as usize,
        }
        .into());
    }
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    writer
        .write_all(&frame)
        .await
        .map_err(LinkError::from_stream)?;
    writer.flush().await.map_err(LinkError::from_stream)
}

#[async_trait::async_trait]
impl MessageSource for TcpSource {
    async fn recv(&mut self) -> Result<Message, LinkError> {
        let payload = read_frame(&mut self.read, self.max_message_size).await?;
        Ok(protocol::decode(&payload)?)
    }
}

#[async_trait::async_trait]
impl MessageSink for TcpSink {
    async fn send(&mut self, msg: Message) -> Result<(), LinkError> {
        let write = self.write.as_mut().ok_or(LinkError::Closed)?;
        let payload = protocol::encode(&msg)?;
        write_frame(write, &payload, self.max_message_size).await
    }

    async fn close(&mut self) -> Result<(), LinkError> {
        match self.write.take() {
            Some(mut write) => write.shutdown().await.map_err(LinkError::from_stream),
            None => Ok(()),
        }
    }
}
