//! Tracing subscriber setup for hosts embedding the scheduling engine.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Installs a global `tracing` subscriber filtered by the configured level.
///
/// An invalid level falls back to `info` with a warning.
///
/// ## Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> CoreResult<()> {
    let (filter, rejected) = match EnvFilter::try_new(config.level.as_str()) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new("info"), true),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| CoreError::ConfigError(format!("failed to install subscriber: {e}")))?;

    if rejected {
        tracing::warn!(level = %config.level, "Invalid log level in config, using info");
    }
    Ok(())
}
