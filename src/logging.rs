//! Logging setup: compact `LEVEL message` lines on stderr.
//!
//! Level precedence: `MINICC_DEBUG=1`, then `-v` count, then the config file.

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

pub const DEBUG_ENV: &str = "MINICC_DEBUG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn debug_forced() -> bool {
    std::env::var(DEBUG_ENV).ok().as_deref() == Some("1")
}

/// Effective level for this run; each `-v` raises the configured level one step.
pub fn resolve_level(debug_env: bool, verbose: u8, configured: LogLevel) -> LogLevel {
    if debug_env {
        return LogLevel::Debug;
    }
    match verbose {
        0 => configured,
        1 => configured.max(LogLevel::Info),
        2 => configured.max(LogLevel::Debug),
        _ => LogLevel::Trace,
    }
}

pub fn init(verbose: u8, configured: LogLevel) {
    init_with_level(resolve_level(debug_forced(), verbose, configured));
}

pub fn init_with_level(level: LogLevel) {
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level.into());

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_filter(filter);

    // a second init (e.g. watch re-runs) keeps the first subscriber
    let _ = Registry::default().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_gate_wins() {
        assert_eq!(resolve_level(true, 0, LogLevel::Error), LogLevel::Debug);
    }

    #[test]
    fn verbosity_only_raises() {
        assert_eq!(resolve_level(false, 0, LogLevel::Warn), LogLevel::Warn);
        assert_eq!(resolve_level(false, 1, LogLevel::Warn), LogLevel::Info);
        assert_eq!(resolve_level(false, 1, LogLevel::Debug), LogLevel::Debug);
        assert_eq!(resolve_level(false, 5, LogLevel::Warn), LogLevel::Trace);
    }
}
