#![cfg(feature = "std")]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Well-known port both roles use.
pub const DEFAULT_PORT: u16 = 38977;

/// Maximum frame payload (64 KiB). Only chat text varies in size.
pub const MAX_MESSAGE_SIZE: u32 = 64 * 1024;

/// How long a finished game stays on screen before the session is torn down.
pub const DEFAULT_TEARDOWN_DELAY: Duration = Duration::from_secs(2);

/// Network settings for hosting or joining a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetConfig {
    /// Address the host binds on.
    pub bind_ip: IpAddr,
    /// Port the host listens on and the guest connects to.
    pub port: u16,
    /// Largest frame accepted or sent.
    pub max_message_size: u32,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl NetConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_bind_ip(mut self, bind_ip: IpAddr) -> Self {
        self.bind_ip = bind_ip;
        self
    }
}

/// Settings for one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay between reaching a terminal outcome and closing the connection.
    pub teardown_delay: Duration,
    /// Fixed RNG seed for the first-turn draw; random when `None`.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            teardown_delay: DEFAULT_TEARDOWN_DELAY,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_teardown_delay(mut self, delay: Duration) -> Self {
        self.teardown_delay = delay;
        self
    }
}
