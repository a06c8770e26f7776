//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the runtime's core thread.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  FrameScheduler      │
//  │   ↓                      │    │   ↓                  │
//  │  InputProcessor          │    │  EventCollector      │
//  │   ├─ Converts Winit      │    │   ↓                  │
//  │   └─ Tracks modifiers    │    │  Runtime::tick()     │
//  │   ↓                      │    │   ├─ scenes          │
//  │  InputBuffer             │    │   ├─ tweens          │
//  │   ├─ discrete: Vec<>     │    │   └─ objects         │
//  │   └─ continuous: latest  │    │                      │
//  │   ↓                      │    └──────────────────────┘
//  │  RedrawRequested (flush) │         ↑            │
//  │   ↓                      │         │            │
//  │  crossbeam channel ──────┼─────────┘            │
//  │                          │   PlatformEvent      │
//  │  user_event(Exit) ←──────┼──────────────────────┘
//  └──────────────────────────┘   EventLoopProxy<PlatformCommand>
//
//  Frame Boundary: RedrawRequested
//    → All buffered input sent atomically
//    → Core ticks at fixed TPS (independent of refresh rate)
//    → Empty buffers NOT sent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: batches input atomically
// - **Resizes are forwarded** so the core can letterbox the logical surface
// - **Core-driven exit**: when the runtime latches a close, the core
//   thread shuts down first and then asks the loop to exit via the proxy
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use glam::Vec2;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformCommand, PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::{InputProcessor, Routed};

//=== Platform ============================================================

/// Window manager and input event aggregator.
///
/// Runs on the main thread and sends batched events to the core thread.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(sender, title, size)`
/// 2. **Execution**: `platform.run(event_loop)` blocks until exit
/// 3. **Shutdown**: window close → `WindowClosed` sent → loop exits, or
///    core sends `PlatformCommand::Exit` → loop exits
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Buffers discrete/continuous input until frame boundary.
    buffer: InputBuffer,

    /// Channel to the core thread.
    event_sender: Sender<PlatformEvent>,

    /// Converts Winit events to runtime InputEvents.
    input_processor: InputProcessor,

    title: String,
    logical_size: Vec2,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub(crate) fn new(event_sender: Sender<PlatformEvent>, title: impl Into<String>, logical_size: Vec2) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
            title: title.into(),
            logical_size,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or the core asks to
    /// exit.
    ///
    /// # Errors
    ///
    /// [`PlatformError::EventLoopExecution`] if Winit fails mid-run.
    pub(crate) fn run(mut self, event_loop: EventLoop<PlatformCommand>) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered input as one [`PlatformEvent::Inputs`]. Empty
    /// buffers are not sent; a disconnected core only logs.
    fn flush_input_buffer(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };
        let (discrete_count, continuous_count) = (discrete.len(), continuous.len());

        trace!(
            target: "platform",
            "Flushing {} discrete + {} continuous events",
            discrete_count,
            continuous_count
        );

        if self.event_sender.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
            warn!(
                target: "platform",
                "Channel disconnected, dropping {} discrete + {} continuous events",
                discrete_count,
                continuous_count
            );
        }
    }

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            debug!(target: "platform", "Core thread gone, event dropped");
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler<PlatformCommand> for Platform {
    /// Creates the window on first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.logical_size.x, self.logical_size.y));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.send(PlatformEvent::Resized { width: size.width, height: size.height });
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Commands from the core thread.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, command: PlatformCommand) {
        match command {
            PlatformCommand::Exit => {
                info!(target: "platform", "Runtime finished, closing window");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.send(PlatformEvent::Resized { width: size.width, height: size.height });
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => match self.input_processor.process_window_event(&event) {
                Some(Routed::Discrete(input)) => self.buffer.push_discrete(input),
                Some(Routed::Continuous(input)) => self.buffer.push_continuous(input),
                None => {}
            },
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
