//=========================================================================
// Cadence Engine
//
// Main entry point: configuration, thread wiring and lifecycle.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(build_runtime)──>  [blocks]
//         │                          │
//         ├─ with_tps()              ├─ spawns core thread (Runtime)
//         ├─ with_logical_size()     ├─ runs platform event loop
//         └─ with_transition()       └─ joins core thread
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec2;
use log::{error, info, warn};
use winit::event_loop::EventLoop;

//=== Internal Dependencies ===============================================

use crate::core::config::{RuntimeConfig, TransitionTimings};
use crate::core::geometry::Rgba;
use crate::core::platform_bridge::{PlatformCommand, PlatformError, PlatformEvent};
use crate::core::runtime::Runtime;
use crate::core::FrameScheduler;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (runtime ticks per second)
/// - **Channel capacity**: 128 events
/// - **Window title**: "Cadence"
/// - **Runtime**: [`RuntimeConfig::default()`]
///
/// # Examples
///
/// ```no_run
/// use cadence_runtime::prelude::*;
///
/// struct Menu;
///
/// impl Scene for Menu {
///     fn name(&self) -> &str {
///         "menu"
///     }
///
///     fn render(&mut self, _ctx: &mut SceneContext) {}
/// }
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_logical_size(1920.0, 1080.0)
///     .build()
///     .run(|config| Runtime::new(config, HostServices::headless(), SceneFactory::new(|| Menu)))
///     .expect("platform failure");
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    window_title: String,
    config: RuntimeConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            window_title: String::from("Cadence"),
            config: RuntimeConfig::default(),
        }
    }

    /// Sets the target ticks per second of the core thread.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Sets the logical render surface; the window opens at this size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn with_logical_size(mut self, width: f32, height: f32) -> Self {
        assert!(width > 0.0 && height > 0.0, "Logical size must be positive, got {}x{}", width, height);
        self.config.logical_size = Vec2::new(width, height);
        self
    }

    /// # Panics
    ///
    /// Panics if any phase duration is negative.
    pub fn with_transition(mut self, timings: TransitionTimings) -> Self {
        assert!(
            [timings.fade_in, timings.pre_hold, timings.post_hold, timings.fade_out]
                .iter()
                .all(|d| *d >= 0.0),
            "Transition durations must not be negative"
        );
        self.config.transition = timings;
        self
    }

    pub fn with_overlay_color(mut self, color: Rgba) -> Self {
        self.config.overlay_color = color;
        self
    }

    /// Consumes the builder and produces a configured [`Engine`].
    pub fn build(self) -> Engine {
        info!(target: "runtime", "Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        Engine {
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window_title: self.window_title,
            config: self.config,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Windowed host for a [`Runtime`].
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► FrameScheduler (Core Thread @ TPS)
///   │     └─► Runtime: scenes, transition, objects, tweens
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling
///
/// Communication: crossbeam channel (PlatformEvent),
///                event loop proxy (PlatformCommand)
/// ```
pub struct Engine {
    tps: f64,
    channel_capacity: usize,
    window_title: String,
    config: RuntimeConfig,
}

impl Engine {
    //--- Execution --------------------------------------------------------

    /// Runs the application and blocks until it exits.
    ///
    /// `build_runtime` runs on the core thread, so the runtime and its
    /// scenes never cross threads.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded channel for platform → core events
    /// 2. Creates the event loop and its proxy for core → platform commands
    /// 3. Spawns the core thread running at the configured TPS
    /// 4. Runs the platform event loop (blocks here)
    /// 5. Joins the core thread
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the event loop cannot be created or fails, or
    /// if the core thread panicked.
    pub fn run<F>(self, build_runtime: F) -> Result<(), PlatformError>
    where
        F: FnOnce(RuntimeConfig) -> Runtime + Send + 'static,
    {
        info!(target: "runtime", "Starting engine (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Event loop + proxy ---------------------------------------
        let event_loop = EventLoop::<PlatformCommand>::with_user_event()
            .build()
            .map_err(PlatformError::EventLoopCreation)?;
        let proxy = event_loop.create_proxy();

        //--- 3. Spawn the core thread -------------------------------------
        let on_exit = move || {
            if proxy.send_event(PlatformCommand::Exit).is_err() {
                warn!(target: "runtime", "Event loop already closed");
            }
        };
        let core_handle =
            FrameScheduler::new(rx, self.tps).spawn_core_thread(build_runtime, self.config, on_exit);
        info!(target: "runtime", "Core thread spawned");

        //--- 4. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.window_title, self.config.logical_size);
        let platform_result = platform.run(event_loop);
        if let Err(e) = &platform_result {
            error!(target: "platform", "Platform error: {}", e);
        }
        info!(target: "platform", "Platform event loop exited");

        //--- 5. Wait for the core thread ---------------------------------
        let join_result = core_handle.join();
        platform_result?;
        match join_result {
            Ok(()) => {
                info!(target: "runtime", "Engine shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(target: "runtime", "Core thread panicked: {:?}", e);
                Err(PlatformError::CoreThreadPanicked)
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
