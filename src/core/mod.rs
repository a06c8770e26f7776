//=========================================================================
// Core Runtime
//
// Scene/object/tween runtime and the frame scheduler that drives it on
// the logic (non-platform) thread.
//
// Responsibilities:
// - Own the runtime state (scenes, objects, tweens, input, viewport)
// - Receive platform events through the crossbeam channel
// - Tick the runtime at a fixed rate (TPS)
// - Shut down in order on window close or a latched close request
//
// Notes:
// The runtime is built on the core thread itself, so nothing it owns has
// to cross threads. Communication with the platform happens only through
// message passing: events in over the channel, an exit command back
// through the event loop proxy.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::info;

//=== Module Declarations =================================================

pub mod config;
pub mod error;
pub mod geometry;
pub mod globals;
pub mod input;
pub mod objects;
pub mod platform_bridge;
pub mod runtime;
pub mod scene;
pub mod tween;

#[cfg(test)]
pub(crate) mod test_support;

//=== Internal Dependencies ===============================================

use config::RuntimeConfig;
use platform_bridge::{EventCollector, PlatformEvent};
use runtime::Runtime;

//=== TickControl =========================================================

/// Control flow signal of one tick: keep going or shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== FrameScheduler ======================================================

/// Fixed-rate loop ticking a [`Runtime`] with collected platform events.
pub(crate) struct FrameScheduler {
    collector: EventCollector,
    tps: f64,
}

impl FrameScheduler {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(receiver: Receiver<PlatformEvent>, tps: f64) -> Self {
        Self {
            collector: EventCollector::new(receiver),
            tps,
        }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread. `build` runs on that thread and produces
    // the runtime; `on_exit` runs after shutdown so the platform can close
    // the window.
    //
    pub(crate) fn spawn_core_thread<F, E>(
        self,
        build: F,
        config: RuntimeConfig,
        on_exit: E,
    ) -> thread::JoinHandle<()>
    where
        F: FnOnce(RuntimeConfig) -> Runtime + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        thread::spawn(move || {
            let mut scheduler = self;
            let mut runtime = build(config);
            scheduler.run(&mut runtime);
            on_exit();
        })
    }

    //--- run() ------------------------------------------------------------
    //
    // Each tick:
    //  1. Collects platform events (exit on close or disconnect)
    //  2. Applies the latest window size
    //  3. Ticks the runtime with the measured delta (exit on close latch)
    //  4. Sleeps to maintain fixed pacing
    //
    pub(crate) fn run(&mut self, runtime: &mut Runtime) {
        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);
        runtime.start();
        let mut last_tick = Instant::now();

        loop {
            let frame_start = Instant::now();

            //--- Step 1: Gather platform events ----------------------------
            if self.collector.collect_frame() == TickControl::Exit {
                info!(target: "runtime", "Window closed, core thread exiting");
                break;
            }

            //--- Step 2: Viewport -----------------------------------------
            if let Some(size) = self.collector.take_resize() {
                runtime.resize(size);
            }

            //--- Step 3: Tick ---------------------------------------------
            let dt = frame_start.duration_since(last_tick).as_secs_f64();
            last_tick = frame_start;
            let batches = self.collector.take_batches();
            if runtime.tick(dt, &batches) == TickControl::Exit {
                info!(target: "runtime", "Close requested, core thread exiting");
                break;
            }

            //--- Step 4: Maintain pacing ----------------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        runtime.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crossbeam_channel::unbounded;

    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crate::core::platform_bridge::HostServices;
    use crate::core::scene::{Capabilities, SceneFactory};
    use crate::core::test_support::{Log, ProbeScene};

    fn runtime(log: &Log) -> Runtime {
        let main_log = Rc::clone(log);
        Runtime::new(
            RuntimeConfig::default(),
            HostServices::headless(),
            SceneFactory::new(move || ProbeScene::new("Main", &main_log).with_caps(Capabilities::ALL)),
        )
    }

    #[test]
    fn window_close_shuts_runtime_down() {
        let log = Log::default();
        let mut rt = runtime(&log);
        let (tx, rx) = unbounded();
        let key = KeyCode::Space;
        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::KeyDown { key, modifiers: Modifiers::NONE }],
            continuous: Vec::new(),
        })
        .unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        FrameScheduler::new(rx, 1000.0).run(&mut rt);

        assert_eq!(*log.borrow(), vec!["Main:destroy"]);
        assert_eq!(rt.tick(0.0, &[]), TickControl::Exit);
    }

    #[test]
    fn close_latch_stops_loop() {
        let log = Log::default();
        let mut rt = runtime(&log);
        let (tx, rx) = unbounded();
        tx.send(PlatformEvent::Resized { width: 2560, height: 1440 }).unwrap();
        rt.context_mut().request_close();

        FrameScheduler::new(rx, 1000.0).run(&mut rt);

        assert_eq!(*log.borrow(), vec!["Main:destroy"]);
        assert_eq!(rt.context().viewport.window_size(), glam::Vec2::new(2560.0, 1440.0));
        drop(tx);
    }

    #[test]
    fn disconnected_channel_exits() {
        let log = Log::default();
        let mut rt = runtime(&log);
        let (tx, rx) = unbounded::<PlatformEvent>();
        drop(tx);

        FrameScheduler::new(rx, 1000.0).run(&mut rt);

        assert!(rt.active_scene_name().is_none());
    }
}
