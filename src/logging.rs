//! Logging setup for the `modlit` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! applications. Events go to stderr so command output on stdout stays clean.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LoggingSettings, SettingsError, SettingsResult};

/// Build the filter: `RUST_LOG` when set, `level` otherwise.
pub fn build_env_filter(level: &str) -> SettingsResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    // Keep dependency chatter down unless asked for explicitly.
    let directives = format!("{},sqlparser=warn,rusqlite=warn", level);
    EnvFilter::try_new(&directives).map_err(|e| {
        SettingsError::InvalidConfig(format!("invalid log filter '{}': {}", directives, e))
    })
}

/// Install the global subscriber.
pub fn init(settings: &LoggingSettings) -> SettingsResult<()> {
    let filter = build_env_filter(&settings.level)?;
    let layer = if settings.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| SettingsError::InvalidConfig(format!("logging already initialized: {}", e)))?;
    Ok(())
}
