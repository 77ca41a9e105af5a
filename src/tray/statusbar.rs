//! Status bar plumbing
//!
//! Wraps NSStatusBar items behind a small owned API and relays button and
//! menu actions into a channel the event loop drains. Everything here runs
//! on the main thread; AppKit delivers the callbacks there.

use std::cell::RefCell;
use std::io::Cursor;
use std::sync::Once;

use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use image::{ImageFormat, RgbaImage};
use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject, ClassBuilder, Sel};
use objc2::{class, msg_send, sel, AnyThread, MainThreadMarker};
use objc2_app_kit::{
    NSControlStateValueOff, NSControlStateValueOn, NSImage, NSMenu, NSMenuItem, NSStatusBar,
    NSStatusItem,
};
use objc2_foundation::{NSData, NSSize, NSString};

use super::TrayEvent;
use crate::animation::FRAME_SIZE;

/// Menu item tags decoded by the relay
pub const TAG_SHOW_ALL: isize = 1;
pub const TAG_QUIT: isize = 2;
pub const TAG_ASSET_BASE: isize = 100;

// NSEventMask bits for the mouse-up events the controller button reacts to
const LEFT_MOUSE_UP_MASK: u64 = 1 << 2;
const RIGHT_MOUSE_UP_MASK: u64 = 1 << 4;
// NSEventModifierFlagControl
const CONTROL_KEY_MASK: usize = 1 << 18;

thread_local! {
    static RELAY: RefCell<Option<Sender<TrayEvent>>> = const { RefCell::new(None) };
}

/// Register the channel the status item callbacks feed. Main thread only.
pub fn install_relay(sender: Sender<TrayEvent>) {
    RELAY.with(|r| *r.borrow_mut() = Some(sender));
}

fn relay(event: TrayEvent) {
    RELAY.with(|r| {
        if let Some(sender) = r.borrow().as_ref() {
            let _ = sender.send(event);
        }
    });
}

unsafe extern "C" fn status_item_clicked(
    _this: *const AnyObject,
    _sel: Sel,
    _sender: *const AnyObject,
) {
    // One action serves both mouse buttons; the current event tells them
    // apart. Ctrl-click counts as secondary, as everywhere else on macOS.
    let app: *mut AnyObject = msg_send![class!(NSApplication), sharedApplication];
    let event: *mut AnyObject = msg_send![app, currentEvent];
    let mut secondary = false;
    if !event.is_null() {
        let button: isize = msg_send![event, buttonNumber];
        let flags: usize = msg_send![event, modifierFlags];
        secondary = button != 0 || flags & CONTROL_KEY_MASK != 0;
    }
    relay(if secondary {
        TrayEvent::MenuRequested
    } else {
        TrayEvent::ControllerClicked
    });
}

unsafe extern "C" fn menu_action_triggered(
    _this: *const AnyObject,
    _sel: Sel,
    sender: *const AnyObject,
) {
    if sender.is_null() {
        return;
    }
    let tag: isize = msg_send![sender, tag];
    let event = match tag {
        TAG_SHOW_ALL => Some(TrayEvent::ShowAll),
        TAG_QUIT => Some(TrayEvent::Quit),
        t if t >= TAG_ASSET_BASE => Some(TrayEvent::SelectAsset((t - TAG_ASSET_BASE) as usize)),
        _ => None,
    };
    if let Some(event) = event {
        relay(event);
    }
}

static REGISTER_RELAY: Once = Once::new();
static mut RELAY_TARGET: *const AnyObject = std::ptr::null();

/// Objective-C object that forwards button and menu actions into the channel
fn relay_target() -> *const AnyObject {
    REGISTER_RELAY.call_once(|| unsafe {
        let superclass = AnyClass::get(c"NSObject").unwrap();
        let mut builder = ClassBuilder::new(c"SweepBarRelay", superclass).unwrap();
        builder.add_method(
            sel!(statusItemClicked:),
            status_item_clicked as unsafe extern "C" fn(*const AnyObject, Sel, *const AnyObject),
        );
        builder.add_method(
            sel!(menuActionTriggered:),
            menu_action_triggered as unsafe extern "C" fn(*const AnyObject, Sel, *const AnyObject),
        );
        let cls = builder.register();
        let instance: *const AnyObject = msg_send![cls, new];
        RELAY_TARGET = instance;
    });
    unsafe { RELAY_TARGET }
}

/// One owned menu bar slot. Dropping the slot removes it from the bar.
pub struct StatusSlot {
    item: Retained<NSStatusItem>,
    mtm: MainThreadMarker,
}

impl StatusSlot {
    /// Acquire a new slot with a fixed length. AppKit inserts each new item
    /// to the left of the ones the process already owns.
    pub fn new(mtm: MainThreadMarker, length: f64) -> Self {
        let status_bar = NSStatusBar::systemStatusBar();
        let item = status_bar.statusItemWithLength(length);
        Self { item, mtm }
    }

    /// Resize the slot. AppKit reports failure only by ignoring the set, so
    /// the new length is read back and compared.
    pub fn set_length(&self, length: f64) -> Result<()> {
        unsafe {
            let _: () = msg_send![&self.item, setLength: length];
            let applied: f64 = msg_send![&self.item, length];
            if (applied - length).abs() > 0.5 {
                return Err(anyhow!(
                    "status item refused length {} (still {})",
                    length,
                    applied
                ));
            }
        }
        Ok(())
    }

    /// Set or clear the slot's icon
    pub fn set_image(&self, image: Option<&RgbaImage>, template: bool) {
        let Some(button) = self.item.button(self.mtm) else {
            return;
        };
        match image.and_then(|img| ns_image(img, template)) {
            Some(ns) => unsafe {
                let _: () = msg_send![&button, setImage: Some(&*ns)];
            },
            None => unsafe {
                let _: () = msg_send![&button, setImage: Option::<&NSImage>::None];
            },
        }
    }

    pub fn set_tooltip(&self, text: &str) {
        let Some(button) = self.item.button(self.mtm) else {
            return;
        };
        let text = NSString::from_str(text);
        unsafe {
            let _: () = msg_send![&button, setToolTip: Some(&*text)];
        }
    }

    /// Wire the slot's button to the relay, for both mouse buttons
    pub fn set_click_action(&self) {
        let Some(button) = self.item.button(self.mtm) else {
            return;
        };
        unsafe {
            let target = relay_target();
            let _: () = msg_send![&button, setTarget: target];
            let _: () = msg_send![&button, setAction: sel!(statusItemClicked:)];
            let _: isize = msg_send![&button, sendActionOn: LEFT_MOUSE_UP_MASK | RIGHT_MOUSE_UP_MASK];
        }
    }

    /// Attach the menu just long enough to run its tracking loop. A
    /// permanently attached menu would swallow the primary click that the
    /// toggle depends on.
    pub fn pop_menu(&self, menu: &NSMenu) {
        unsafe {
            let _: () = msg_send![&self.item, setMenu: Some(menu)];
            if let Some(button) = self.item.button(self.mtm) {
                let _: () = msg_send![&button, performClick: Option::<&AnyObject>::None];
            }
            let _: () = msg_send![&self.item, setMenu: Option::<&NSMenu>::None];
        }
    }
}

impl Drop for StatusSlot {
    fn drop(&mut self) {
        let status_bar = NSStatusBar::systemStatusBar();
        unsafe {
            let _: () = msg_send![&status_bar, removeStatusItem: &*self.item];
        }
    }
}

/// Menu item wired to the relay target
pub fn action_item(title: &str, tag: isize, mtm: MainThreadMarker) -> Retained<NSMenuItem> {
    unsafe {
        let item = NSMenuItem::new(mtm);
        item.setTitle(&NSString::from_str(title));
        item.setEnabled(true);
        item.setTag(tag);
        item.setAction(Some(sel!(menuActionTriggered:)));
        let target = relay_target();
        let _: () = msg_send![&item, setTarget: target];
        item
    }
}

/// Same, with a key equivalent
pub fn action_item_with_key(
    title: &str,
    tag: isize,
    key: &str,
    mtm: MainThreadMarker,
) -> Retained<NSMenuItem> {
    let item = action_item(title, tag, mtm);
    unsafe {
        let _: () = msg_send![&item, setKeyEquivalent: &*NSString::from_str(key)];
    }
    item
}

/// Set or clear a menu item checkmark
pub fn set_checked(item: &NSMenuItem, checked: bool) {
    item.setState(if checked {
        NSControlStateValueOn
    } else {
        NSControlStateValueOff
    });
}

/// Convert an RGBA bitmap to an NSImage via an in-memory PNG
fn ns_image(img: &RgbaImage, template: bool) -> Option<Retained<NSImage>> {
    let mut png = Vec::new();
    if let Err(e) = img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png) {
        tracing::warn!("could not encode status icon: {}", e);
        return None;
    }
    let data = NSData::with_bytes(&png);
    let image: Option<Retained<NSImage>> =
        unsafe { msg_send![NSImage::alloc(), initWithData: &*data] };
    let image = image?;
    unsafe {
        let size = NSSize::new(FRAME_SIZE as f64, FRAME_SIZE as f64);
        let _: () = msg_send![&image, setSize: size];
        let _: () = msg_send![&image, setTemplate: template];
    }
    Some(image)
}
