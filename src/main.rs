//! SweepBar - macOS menu bar utility that hides other status icons
//!
//! Places two items in the system menu bar: a spacer and, to its right, the
//! clickable controller. Clicking the controller expands the spacer to an
//! enormous width so every icon on its left is pushed off-screen; clicking
//! again restores it.

use clap::Parser;
use sweepbar::cli::{exit_codes, Cli};
use sweepbar::logging;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    #[cfg(target_os = "macos")]
    {
        match sweepbar::app::run() {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                exit_codes::UNEXPECTED_FAILURE
            }
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        eprintln!("sweepbar drives the macOS status bar and only runs on macOS.");
        exit_codes::UNSUPPORTED_PLATFORM
    }
}
