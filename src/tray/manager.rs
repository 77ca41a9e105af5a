//! Status bar manager
//!
//! The single owner of the two menu bar slots: creates them at launch, keeps
//! them consistent with the toggle state, plays the selected icon animation,
//! and applies menu commands. Constructed once and driven by the event loop;
//! no ambient UI globals.

use anyhow::Result;
use objc2::rc::Retained;
use objc2::MainThreadMarker;
use objc2_app_kit::{NSMenu, NSMenuItem};
use objc2_foundation::NSString;
use tracing::{info, warn};

use super::glyph;
use super::statusbar::{self, StatusSlot, TAG_ASSET_BASE, TAG_QUIT, TAG_SHOW_ALL};
use super::toggle::{BarSurface, ControllerGlyph, HideToggle, SurfaceError, SPACER_WIDTH};
use crate::animation::FrameSequence;
use crate::assets::{IconAsset, IconCatalog};
use crate::settings::Settings;

/// Width of the controller slot; wide enough for a 22 pt glyph plus padding
const CONTROLLER_WIDTH: f64 = 24.0;

const TOOLTIP_VISIBLE: &str = "SweepBar - click to hide the icons on the left";
const TOOLTIP_HIDING: &str = "SweepBar - click to reveal the hidden icons";

/// The two slots, as seen by the toggle state machine
struct TraySlots {
    spacer: StatusSlot,
    controller: StatusSlot,
}

impl BarSurface for TraySlots {
    fn set_spacer_width(&mut self, width: f64) -> Result<(), SurfaceError> {
        self.spacer
            .set_length(width)
            .map_err(|_| SurfaceError { requested: width })
    }

    fn set_spacer_dot(&mut self, visible: bool) {
        if visible {
            self.spacer.set_image(Some(&glyph::spacer_dot()), true);
        } else {
            self.spacer.set_image(None, true);
        }
    }

    fn set_controller_glyph(&mut self, glyph_kind: ControllerGlyph) {
        self.controller
            .set_image(Some(&glyph::controller_glyph(glyph_kind)), true);
    }
}

/// Owns the slots, the context menu and the animation player
pub struct TrayManager {
    slots: TraySlots,
    toggle: HideToggle,
    menu: Retained<NSMenu>,
    asset_items: Vec<Retained<NSMenuItem>>,
    catalog: IconCatalog,
    settings: Settings,
    selected: usize,
    animation: Option<FrameSequence>,
    frame_is_template: bool,
}

impl TrayManager {
    /// Acquire the two slots and build the context menu. The controller is
    /// created first so the spacer, created second, lands on its left; the
    /// controller must stay clickable while the spacer is expanded.
    pub fn new(mtm: MainThreadMarker) -> Result<Self> {
        let settings = Settings::load();
        let catalog = IconCatalog::scan_user_dir();
        let selected = catalog.resolve(settings.selected_icon_asset.as_deref());

        let controller = StatusSlot::new(mtm, CONTROLLER_WIDTH);
        controller.set_click_action();
        controller.set_tooltip(TOOLTIP_VISIBLE);

        let spacer = StatusSlot::new(mtm, SPACER_WIDTH);

        let mut slots = TraySlots { spacer, controller };
        slots.set_spacer_dot(true);
        slots.set_controller_glyph(ControllerGlyph::Idle);

        let (menu, asset_items) = build_menu(mtm, &catalog, selected);

        let asset = catalog.get(selected).cloned().unwrap_or(IconAsset::Builtin);
        let animation = load_animation(&asset);
        let frame_is_template = matches!(asset, IconAsset::Builtin);

        let mut manager = Self {
            slots,
            toggle: HideToggle::new(),
            menu,
            asset_items,
            catalog,
            settings,
            selected,
            animation,
            frame_is_template,
        };
        manager.redraw_controller();
        Ok(manager)
    }

    pub fn is_hiding_others(&self) -> bool {
        self.toggle.is_hiding_others()
    }

    /// Whether a frame timer should be running
    pub fn has_animation(&self) -> bool {
        self.animation.is_some()
    }

    /// Primary click: flip the toggle
    pub fn toggle(&mut self) {
        self.toggle.toggle(&mut self.slots);
        self.redraw_controller();
        self.update_tooltip();
    }

    /// "Show All Icons" menu command; no-op while already visible
    pub fn show_all(&mut self) {
        self.toggle.show_others(&mut self.slots);
        self.redraw_controller();
        self.update_tooltip();
    }

    /// Secondary click: run the context menu
    pub fn pop_menu(&self) {
        self.slots.controller.pop_menu(&self.menu);
    }

    /// Advance the animation one frame. The cursor moves even while hiding,
    /// but the frame is only drawn while the controller shows the idle state.
    pub fn advance_frame(&mut self) {
        let Some(seq) = self.animation.as_mut() else {
            return;
        };
        let frame = seq.advance();
        if !self.toggle.is_hiding_others() {
            self.slots
                .controller
                .set_image(Some(frame), self.frame_is_template);
        }
    }

    /// Icon submenu selection: persist it, reload the animation, move the
    /// checkmark.
    pub fn select_asset(&mut self, index: usize) {
        let Some(asset) = self.catalog.get(index).cloned() else {
            warn!("ignoring selection of unknown asset index {}", index);
            return;
        };
        info!("icon asset selected: {}", asset.display_name());

        self.settings.selected_icon_asset = asset.preference_value().map(String::from);
        if let Err(e) = self.settings.save() {
            warn!("could not save settings: {:#}", e);
        }

        self.selected = index;
        self.frame_is_template = matches!(asset, IconAsset::Builtin);
        self.animation = load_animation(&asset);
        for (i, item) in self.asset_items.iter().enumerate() {
            statusbar::set_checked(item, i == self.selected);
        }
        self.redraw_controller();
    }

    /// Quit path: force the show transition so the spacer never stays
    /// expanded across a process exit. Idempotent.
    pub fn prepare_quit(&mut self) {
        self.toggle.restore_for_exit(&mut self.slots);
        self.update_tooltip();
    }

    /// Controller glyph is a pure function of the toggle state; in animated
    /// mode the current frame stands in for the idle glyph.
    fn redraw_controller(&mut self) {
        if self.toggle.is_hiding_others() {
            self.slots.set_controller_glyph(ControllerGlyph::Sweeping);
            return;
        }
        match &self.animation {
            Some(seq) => self
                .slots
                .controller
                .set_image(Some(seq.current()), self.frame_is_template),
            None => self.slots.set_controller_glyph(ControllerGlyph::Idle),
        }
    }

    fn update_tooltip(&self) {
        let tooltip = if self.toggle.is_hiding_others() {
            TOOLTIP_HIDING
        } else {
            TOOLTIP_VISIBLE
        };
        self.slots.controller.set_tooltip(tooltip);
    }
}

/// Decode the selected asset, falling back to the static glyph on failure
fn load_animation(asset: &IconAsset) -> Option<FrameSequence> {
    match asset {
        IconAsset::Builtin => FrameSequence::new(glyph::builtin_frames()).ok(),
        IconAsset::File { name, path } => match FrameSequence::load_gif(path) {
            Ok(seq) => {
                info!("decoded {} ({} frames)", name, seq.frame_count());
                Some(seq)
            }
            Err(e) => {
                warn!("could not load icon animation {}: {}; using static glyph", name, e);
                None
            }
        },
    }
}

/// Context menu: Show All Icons, the icon selection submenu, Quit
fn build_menu(
    mtm: MainThreadMarker,
    catalog: &IconCatalog,
    selected: usize,
) -> (Retained<NSMenu>, Vec<Retained<NSMenuItem>>) {
    let menu = NSMenu::new(mtm);
    menu.setAutoenablesItems(false);

    let show_all = statusbar::action_item("Show All Icons", TAG_SHOW_ALL, mtm);
    menu.addItem(&show_all);

    menu.addItem(&NSMenuItem::separatorItem(mtm));

    let icon_item = NSMenuItem::new(mtm);
    unsafe {
        icon_item.setTitle(&NSString::from_str("Icon"));
    }
    let submenu = NSMenu::new(mtm);
    submenu.setAutoenablesItems(false);
    let mut asset_items = Vec::new();
    for (i, asset) in catalog.entries().iter().enumerate() {
        let item = statusbar::action_item(asset.display_name(), TAG_ASSET_BASE + i as isize, mtm);
        statusbar::set_checked(&item, i == selected);
        submenu.addItem(&item);
        asset_items.push(item);
    }
    unsafe {
        icon_item.setSubmenu(Some(&submenu));
    }
    menu.addItem(&icon_item);

    menu.addItem(&NSMenuItem::separatorItem(mtm));

    let quit = statusbar::action_item_with_key("Quit", TAG_QUIT, "q", mtm);
    menu.addItem(&quit);

    (menu, asset_items)
}
