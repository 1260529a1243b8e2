#![cfg(feature = "std")]

//! Hosting and joining a peer.
//!
//! A [`ConnectionManager`] allows one attempt at a time: while it is listening
//! or connecting, a second attempt fails fast with [`LinkError::Busy`] instead
//! of queueing behind the first.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};

use crate::config::NetConfig;
use crate::error::LinkError;
use crate::transport::tcp::TcpTransport;

/// Which end of the link this instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Listened and accepted; picks the first mover.
    Host,
    /// Connected to the host.
    Guest,
}

/// What the manager is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Listening,
    Connecting,
}

impl Activity {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Activity::Listening,
            2 => Activity::Connecting,
            _ => Activity::Idle,
        }
    }
}

/// An established link to the peer.
#[derive(Debug)]
pub struct Connection {
    role: Role,
    stream: TcpStream,
    peer_addr: SocketAddr,
    max_message_size: u32,
}

impl Connection {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Wrap the stream in the frame codec.
    pub fn into_transport(self) -> TcpTransport {
        TcpTransport::with_max_message_size(self.stream, self.max_message_size)
    }
}

/// Releases the activity slot when the attempt ends, however it ends.
struct ActivityGuard {
    activity: Arc<AtomicU8>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.activity.store(Activity::Idle as u8, Ordering::SeqCst);
    }
}

pub struct ConnectionManager {
    config: NetConfig,
    activity: Arc<AtomicU8>,
}

impl ConnectionManager {
    pub fn new(config: NetConfig) -> Self {
        Self {
            config,
            activity: Arc::new(AtomicU8::new(Activity::Idle as u8)),
        }
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    pub fn activity(&self) -> Activity {
        Activity::from_u8(self.activity.load(Ordering::SeqCst))
    }

    /// Whether a host endpoint is open and waiting for the peer.
    pub fn is_listening(&self) -> bool {
        self.activity() == Activity::Listening
    }

    fn begin(&self, next: Activity) -> Result<ActivityGuard, LinkError> {
        match self.activity.compare_exchange(
            Activity::Idle as u8,
            next as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => Ok(ActivityGuard {
                activity: Arc::clone(&self.activity),
            }),
            Err(current) => {
                log::warn!(
                    "Ignoring {:?} request while {:?}",
                    next,
                    Activity::from_u8(current)
                );
                Err(LinkError::Busy)
            }
        }
    }

    /// Open the host endpoint on the configured port.
    pub async fn listen(&self) -> Result<HostListener, LinkError> {
        let guard = self.begin(Activity::Listening)?;
        let addr = SocketAddr::new(self.config.bind_ip, self.config.port);
        let listener = TcpListener::bind(addr).await.map_err(|source| LinkError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        log::info!("Waiting for an opponent on {}", listener.local_addr()?);
        Ok(HostListener {
            listener,
            max_message_size: self.config.max_message_size,
            _guard: guard,
        })
    }

    /// Listen and wait for exactly one peer.
    pub async fn host(&self) -> Result<Connection, LinkError> {
        self.listen().await?.accept().await
    }

    /// Connect to a host at `host` on the configured port.
    pub async fn join(&self, host: &str) -> Result<Connection, LinkError> {
        let _guard = self.begin(Activity::Connecting)?;
        let port = self.config.port;
        log::info!("Connecting to {}:{}", host, port);
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| {
                log::warn!("Could not reach {}:{}: {}", host, port, source);
                LinkError::Connect {
                    addr: format!("{}:{}", host, port),
                    source,
                }
            })?;
        let peer_addr = stream.peer_addr()?;
        stream.set_nodelay(true)?;
        log::info!("Connected to host {}", peer_addr);
        Ok(Connection {
            role: Role::Guest,
            stream,
            peer_addr,
            max_message_size: self.config.max_message_size,
        })
    }
}

/// Open host endpoint; accepting consumes it, so only one peer ever gets in.
pub struct HostListener {
    listener: TcpListener,
    max_message_size: u32,
    _guard: ActivityGuard,
}

impl HostListener {
    pub fn local_addr(&self) -> Result<SocketAddr, LinkError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn accept(self) -> Result<Connection, LinkError> {
        let (stream, peer_addr) = self.listener.accept().await?;
        stream.set_nodelay(true)?;
        log::info!("Opponent connected from {}", peer_addr);
        // Dropping `self` closes the endpoint and frees the activity slot.
        Ok(Connection {
            role: Role::Host,
            stream,
            peer_addr,
            max_message_size: self.max_message_size,
        })
    }
}
