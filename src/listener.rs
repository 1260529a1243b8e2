#![cfg(feature = "std")]

//! Background read loop feeding decoded frames to a session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::LinkError;
use crate::protocol::Message;
use crate::transport::MessageSource;

/// What the read loop reports upstream.
#[derive(Debug)]
pub enum ListenerEvent {
    /// One decoded frame.
    Frame(Message),
    /// The loop ended on this error; nothing follows.
    Stopped(LinkError),
}

pub struct MessageListener {
    task: JoinHandle<()>,
    listening: Arc<AtomicBool>,
}

impl MessageListener {
    /// Start reading from `source`, forwarding every event into `events`.
    pub fn spawn<S, T>(mut source: S, events: mpsc::UnboundedSender<T>) -> Self
    where
        S: MessageSource + 'static,
        T: From<ListenerEvent> + Send + 'static,
    {
        let listening = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&listening);
        let task = tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(msg) => {
                        log::debug!("Received {}", msg.kind());
                        if events.send(ListenerEvent::Frame(msg).into()).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log::debug!("Listener stopping: {}", err);
                        let _ = events.send(ListenerEvent::Stopped(err).into());
                        break;
                    }
                }
            }
            flag.store(false, Ordering::SeqCst);
        });
        Self { task, listening }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Cancel the read loop, dropping its half of the stream.
    pub fn stop(&self) {
        self.task.abort();
        self.listening.store(false, Ordering::SeqCst);
    }
}

impl Drop for MessageListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
