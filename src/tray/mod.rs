//! Status bar module
//!
//! The hide/show toggle state machine and glyph rendering are platform
//! independent; the status item plumbing that realizes them is macOS only.

pub mod glyph;
pub mod toggle;

#[cfg(target_os = "macos")]
pub mod manager;
#[cfg(target_os = "macos")]
pub mod statusbar;

pub use toggle::{BarSurface, ControllerGlyph, HideToggle, SurfaceError, SPACER_WIDTH, SWEEP_WIDTH};

#[cfg(target_os = "macos")]
pub use manager::TrayManager;

/// Events relayed from status item and menu callbacks to the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Primary click on the controller: toggle hiding
    ControllerClicked,
    /// Secondary click on the controller: open the context menu
    MenuRequested,
    /// "Show All Icons" menu command
    ShowAll,
    /// Icon submenu selection, by catalog index
    SelectAsset(usize),
    /// "Quit" menu command
    Quit,
}
