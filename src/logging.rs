#![cfg(feature = "std")]

//! Minimal stderr logger behind the `log` facade.
//!
//! Stdout belongs to the terminal front-end (board and prompts), so log lines
//! go to stderr, prefixed with the time since logging started.

use std::env;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Metadata, Record};

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "CHECKERS_LOG";

struct StderrLogger {
    started: OnceLock<Instant>,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let elapsed = self.started.get_or_init(Instant::now).elapsed();
            let _ = writeln!(
                std::io::stderr().lock(),
                "{:>8.3}s [{}] {}: {}",
                elapsed.as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger {
    started: OnceLock::new(),
};

/// Parse a level name such as `debug`; unknown or missing names give `info`.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Initialize logging with a level taken from the `CHECKERS_LOG` environment variable.
/// Defaults to `info` if the variable is not set or invalid. Later calls are no-ops.
pub fn init_logging() {
    init_logging_with(parse_level(env::var(LOG_ENV).ok().as_deref()));
}

/// Initialize logging at a fixed level.
pub fn init_logging_with(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        LOGGER.started.get_or_init(Instant::now);
        log::set_max_level(level);
    }
}
