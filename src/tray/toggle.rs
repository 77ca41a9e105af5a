//! Hide/show toggle state machine
//!
//! The one piece of this app with an invariant worth enforcing: the spacer's
//! width and glyph, and the controller's static glyph, are always a pure
//! function of `hiding_others`. Transitions are guarded so repeated hide or
//! show calls are no-ops, and a failed spacer resize aborts the transition
//! instead of letting state and visuals drift apart.

use thiserror::Error;
use tracing::{debug, warn};

/// Spacer width while neighboring icons are visible
pub const SPACER_WIDTH: f64 = 8.0;

/// Spacer width while hiding. AppKit offers no way to measure the combined
/// width of the items on our left, so the spacer simply grows far past any
/// plausible screen width. A macOS release that clamps status item lengths
/// would break the trick.
pub const SWEEP_WIDTH: f64 = 10_000.0;

/// Glyph shown in the controller slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerGlyph {
    /// Neighboring icons are visible
    Idle,
    /// Neighboring icons are swept off-screen
    Sweeping,
}

/// The two status bar slots, as the toggle sees them
pub trait BarSurface {
    /// Resize the spacer slot. AppKit reports failure only by ignoring the
    /// set, so implementations verify and surface it here.
    fn set_spacer_width(&mut self, width: f64) -> Result<(), SurfaceError>;

    /// Show or clear the spacer's marker dot
    fn set_spacer_dot(&mut self, visible: bool);

    /// Update the controller's rendered state
    fn set_controller_glyph(&mut self, glyph: ControllerGlyph);
}

/// Spacer resize failure
#[derive(Debug, Error)]
#[error("status item refused width {requested}")]
pub struct SurfaceError {
    pub requested: f64,
}

/// Owns `hiding_others` and keeps the two slots consistent with it
#[derive(Debug, Default)]
pub struct HideToggle {
    hiding_others: bool,
}

impl HideToggle {
    /// Starts in the visible state; the hidden state is never persisted
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hiding_others(&self) -> bool {
        self.hiding_others
    }

    /// Flip to the opposite state
    pub fn toggle(&mut self, surface: &mut dyn BarSurface) {
        if self.hiding_others {
            self.show_others(surface);
        } else {
            self.hide_others(surface);
        }
    }

    /// Expand the spacer so every icon on its left is pushed off-screen.
    /// No-op while already hiding.
    pub fn hide_others(&mut self, surface: &mut dyn BarSurface) {
        if self.hiding_others {
            return;
        }
        if let Err(e) = surface.set_spacer_width(SWEEP_WIDTH) {
            warn!("hide aborted: {}", e);
            return;
        }
        // With no icon, the expanded spacer reads as empty menu bar background
        surface.set_spacer_dot(false);
        surface.set_controller_glyph(ControllerGlyph::Sweeping);
        self.hiding_others = true;
        debug!("hiding neighboring icons");
    }

    /// Restore the spacer's normal width and marker dot. No-op while visible.
    pub fn show_others(&mut self, surface: &mut dyn BarSurface) {
        if !self.hiding_others {
            return;
        }
        if let Err(e) = surface.set_spacer_width(SPACER_WIDTH) {
            warn!("show aborted: {}", e);
            return;
        }
        surface.set_spacer_dot(true);
        surface.set_controller_glyph(ControllerGlyph::Idle);
        self.hiding_others = false;
        debug!("neighboring icons visible again");
    }

    /// Quit-path transition. The spacer must never stay expanded across a
    /// process exit: the icons it hides would be stranded with no control
    /// left to reveal them. Idempotent.
    pub fn restore_for_exit(&mut self, surface: &mut dyn BarSurface) {
        self.show_others(surface);
    }
}
