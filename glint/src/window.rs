//! winit window surface
//!
//! Implements the core [`Surface`] trait over a pumped winit event loop:
//! the scheduler keeps ownership of the application loop and drains
//! pending OS events once per iteration instead of handing control to
//! `run_app`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use glint_core::config::Config;
use glint_core::surface::{Surface, SurfaceEvent};

/// Refresh rate assumed when the platform cannot report one.
const FALLBACK_REFRESH_HZ: u32 = 60;

/// Event sink and window holder driven by the pumped event loop.
struct WindowHandler {
    title: String,
    initial_size: (u32, u32),
    window: Option<Arc<Window>>,
    events: Vec<SurfaceEvent>,
    occluded: bool,
}

impl ApplicationHandler for WindowHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.initial_size;
        let window_attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        match event_loop.create_window(window_attributes) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                self.events.push(SurfaceEvent::CloseRequested);
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                self.events.push(SurfaceEvent::Resized {
                    width: new_size.width,
                    height: new_size.height,
                });
            }
            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
            }
            _ => {}
        }
    }
}

/// Presentation surface over a real window.
///
/// Owns the event loop in pump mode; [`Surface::poll`] drains whatever the
/// OS has queued and returns immediately. Present itself happens on the
/// graphics backend.
pub struct WinitSurface {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
    window: Arc<Window>,
}

impl WinitSurface {
    /// Create the event loop and window for the given configuration.
    ///
    /// Fatal on event-loop or window creation failure; there is nothing to
    /// present to without them.
    pub fn open(config: &Config) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("Failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut handler = WindowHandler {
            title: config.title.clone(),
            initial_size: (config.width.max(1), config.height.max(1)),
            window: None,
            events: Vec::new(),
            occluded: false,
        };

        // The first pump delivers `resumed`, which creates the window.
        for _ in 0..8 {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut handler)
            {
                bail!("event loop exited during startup (code {})", code);
            }
            if handler.window.is_some() {
                break;
            }
        }
        let Some(window) = handler.window.clone() else {
            bail!("window was not created by the platform");
        };

        Ok(Self {
            event_loop,
            handler,
            window,
        })
    }

    /// Window handle for graphics initialization.
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl Surface for WinitSurface {
    fn poll(&mut self, events: &mut Vec<SurfaceEvent>) {
        let _ = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);
        events.append(&mut self.handler.events);
    }

    fn is_visible(&self) -> bool {
        // Minimized windows report a zero drawable size on some platforms
        // and an occlusion event on others.
        let size = self.window.inner_size();
        !self.handler.occluded && size.width > 0 && size.height > 0
    }

    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn refresh_rate(&self) -> u32 {
        self.window
            .current_monitor()
            .and_then(|monitor| monitor.refresh_rate_millihertz())
            .map(|millihertz| (millihertz + 500) / 1000)
            .unwrap_or(FALLBACK_REFRESH_HZ)
    }
}
