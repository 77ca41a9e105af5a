//! Application event loop
//!
//! Runs a windowless winit loop. Status item and menu callbacks enqueue
//! `TrayEvent`s on a channel; the loop drains them between platform events
//! and schedules the animation tick with `ControlFlow::WaitUntil`. Every
//! state mutation happens on this one thread.

use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use objc2::MainThreadMarker;
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
use winit::window::WindowId;

use crate::animation::FRAME_INTERVAL;
use crate::tray::{statusbar, TrayEvent, TrayManager};

struct SweepBarApp {
    events: Receiver<TrayEvent>,
    tray: Option<TrayManager>,
    startup_error: Option<anyhow::Error>,
    next_frame: Instant,
    quitting: bool,
}

impl SweepBarApp {
    fn new(events: Receiver<TrayEvent>) -> Self {
        Self {
            events,
            tray: None,
            startup_error: None,
            next_frame: Instant::now() + FRAME_INTERVAL,
            quitting: false,
        }
    }

    fn drain_events(&mut self, event_loop: &ActiveEventLoop) {
        while let Ok(event) = self.events.try_recv() {
            debug!("tray event: {:?}", event);
            if event == TrayEvent::Quit {
                // Never exit while icons are hidden, and stop the frame
                // timer before terminating
                self.quitting = true;
                if let Some(tray) = self.tray.as_mut() {
                    tray.prepare_quit();
                }
                event_loop.exit();
                return;
            }
            let Some(tray) = self.tray.as_mut() else {
                continue;
            };
            match event {
                TrayEvent::ControllerClicked => tray.toggle(),
                TrayEvent::MenuRequested => tray.pop_menu(),
                TrayEvent::ShowAll => tray.show_all(),
                TrayEvent::SelectAsset(index) => tray.select_asset(index),
                TrayEvent::Quit => {}
            }
        }
    }

    fn tick_animation(&mut self) {
        if self.quitting {
            return;
        }
        let now = Instant::now();
        if now < self.next_frame {
            return;
        }
        if let Some(tray) = self.tray.as_mut() {
            tray.advance_frame();
        }
        self.next_frame = now + FRAME_INTERVAL;
    }
}

impl ApplicationHandler for SweepBarApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.tray.is_some() {
            return;
        }
        let mtm = MainThreadMarker::new().expect("event loop runs on the main thread");
        match TrayManager::new(mtm) {
            Ok(tray) => {
                info!("status bar slots acquired");
                self.tray = Some(tray);
            }
            Err(e) => {
                // Startup precondition: without the two slots there is no UI
                error!("could not acquire status bar slots: {:#}", e);
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {
        // No windows; the whole UI is two status items and a menu
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.drain_events(event_loop);
        if event_loop.exiting() {
            return;
        }
        self.tick_animation();

        let animating = self.tray.as_ref().is_some_and(|t| t.has_animation());
        if animating && !self.quitting {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }

    fn exiting(&mut self, _: &ActiveEventLoop) {
        // Second safety net on top of the quit path: the spacer must never
        // stay expanded past process exit
        if let Some(tray) = self.tray.as_mut() {
            tray.prepare_quit();
        }
    }
}

/// Launch the menu bar app and block until Quit
pub fn run() -> Result<()> {
    let (sender, receiver) = unbounded();
    statusbar::install_relay(sender);

    let event_loop = EventLoop::builder()
        .with_activation_policy(ActivationPolicy::Accessory)
        .build()
        .context("could not create event loop")?;

    let mut app = SweepBarApp::new(receiver);
    event_loop
        .run_app(&mut app)
        .context("event loop failed")?;

    if let Some(e) = app.startup_error.take() {
        return Err(e);
    }
    info!("sweepbar exiting");
    Ok(())
}
