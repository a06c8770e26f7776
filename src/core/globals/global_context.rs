//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for scenes, objects and the runtime.
//
// Contains the long-lived state every hook can reach:
// - objects: the z-ordered object registry
// - tweens: the named tween scheduler
// - viewport / input / clock: per-frame environment
// - host: canvas, audio and profile collaborators
// - navigator: queue for scene switch requests
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::config::RuntimeConfig;
use crate::core::geometry::Viewport;
use crate::core::input::InputState;
use crate::core::objects::{FrameInfo, ObjectRegistry};
use crate::core::platform_bridge::HostServices;
use crate::core::scene::Navigator;
use crate::core::tween::TweenScheduler;

//=== FrameClock ==========================================================

/// Simulated time as advanced by the frame scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the runtime started.
    pub now: f64,
    /// Delta of the current tick.
    pub dt: f64,
    /// Ticks run so far.
    pub frame: u64,
}

impl FrameClock {
    pub(crate) fn advance(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        self.dt = dt;
        self.now += dt;
        self.frame += 1;
    }
}

//=== GlobalContext =======================================================

/// Shared context accessible to scenes during their hooks.
///
/// Scenes receive it through [`SceneContext`](crate::core::scene::SceneContext),
/// which derefs here.
pub struct GlobalContext {
    pub objects: ObjectRegistry,
    pub tweens: TweenScheduler,
    pub viewport: Viewport,
    pub input: InputState,
    pub clock: FrameClock,
    pub host: HostServices,

    navigator: Navigator,

    /// A menu or dialog swallows input. Cleared on full reset.
    pub(crate) modal: bool,

    /// Latched by `request_close`; the frame scheduler exits after the
    /// current tick.
    closing: bool,
}

impl GlobalContext {
    pub(crate) fn new(config: &RuntimeConfig, host: HostServices, navigator: Navigator) -> Self {
        Self {
            objects: ObjectRegistry::new(),
            tweens: TweenScheduler::new(),
            viewport: Viewport::new(config.logical_size),
            input: InputState::new(),
            clock: FrameClock::default(),
            host,
            navigator,
            modal: false,
            closing: false,
        }
    }

    //--- Navigation -------------------------------------------------------

    /// Handle for requesting scene switches; clone it into callbacks.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    //--- Flags ------------------------------------------------------------

    /// Asks the runtime to shut down once the current tick completes.
    pub fn request_close(&mut self) {
        self.closing = true;
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Marks a modal overlay as open; scenes and objects get no input
    /// while set.
    pub fn set_modal_blocking(&mut self, blocking: bool) {
        self.modal = blocking;
    }

    pub fn is_modal_blocking(&self) -> bool {
        self.modal
    }

    //--- Frame ------------------------------------------------------------

    /// Snapshot handed to the object passes.
    pub fn frame_info(&self) -> FrameInfo {
        FrameInfo {
            now: self.clock.now,
            dt: self.clock.dt,
            cursor: self.input.cursor(),
            viewport: self.viewport,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> GlobalContext {
        let (navigator, _requests) = Navigator::channel();
        GlobalContext::new(&RuntimeConfig::default(), HostServices::headless(), navigator)
    }

    #[test]
    fn clock_accumulates_and_counts_frames() {
        let mut clock = FrameClock::default();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.now, 0.75);
        assert_eq!(clock.dt, 0.25);
        assert_eq!(clock.frame, 2);
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut clock = FrameClock::default();
        clock.advance(1.0);
        clock.advance(-0.5);
        assert_eq!(clock.now, 1.0);
    }

    #[test]
    fn close_latch_stays_set() {
        let mut ctx = context();
        assert!(!ctx.is_closing());
        ctx.request_close();
        ctx.request_close();
        assert!(ctx.is_closing());
    }

    #[test]
    fn viewport_starts_at_logical_size() {
        let ctx = context();
        assert_eq!(ctx.viewport.logical_size(), RuntimeConfig::default().logical_size);
        assert_eq!(ctx.frame_info().now, 0.0);
    }
}
