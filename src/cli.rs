//! CLI module - command-line flags
//!
//! The menu bar app itself has no functional flags; everything here is
//! developer-facing diagnostics.

use clap::Parser;

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const UNSUPPORTED_PLATFORM: i32 = 2;
}

/// SweepBar - hide macOS menu bar icons behind an expanding spacer
///
/// Launches the menu bar app. Cmd-drag the icons you want to hide to the
/// left of the SweepBar marker, then click the marker to toggle them.
#[derive(Parser, Debug)]
#[command(name = "sweepbar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,
}
