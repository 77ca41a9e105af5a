//! Logging setup
//!
//! All error reporting is diagnostic output on stderr; nothing is surfaced
//! through the menu bar UI. `RUST_LOG` overrides the CLI flags.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once, before anything logs.
pub fn init(verbose: bool, log_level: Option<&str>) -> Result<()> {
    let default_directive = match log_level {
        Some(level) => format!("sweepbar={}", level),
        None if verbose => "sweepbar=debug".to_string(),
        None => "sweepbar=info".to_string(),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(())
}
