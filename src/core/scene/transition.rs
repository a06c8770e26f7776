//=========================================================================
// Scene Transition
//=========================================================================
//
// Singleton phased state machine that fades an overlay in, swaps the
// active scene behind it, and fades it out again.
//
// Phases (strictly sequential, one advance per update at most):
// ```text
//   Complete ──start()──> FadeIn ──0.35s──> PreHold ──0.1s──> Switching
//                                                               │
//      ┌───────────── swap-complete event (no timer) ───────────┘
//      ↓
//   PostHold ──0.1s──> FadeOut ──0.35s──> Complete (overlay destroyed)
// ```
//
// Entering `Switching` hands the swap to the scene manager, which posts
// on `swap_notifier()` once the new scene's init/resume has resolved.
// The event is consumed on the following update.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::SceneSlot;
use crate::core::config::TransitionTimings;
use crate::core::geometry::Rgba;
use crate::core::objects::{ObjectBuilder, ObjectId, ObjectRegistry, Owner};

//=== Types ===============================================================

/// Phase of the transition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    FadeIn,
    PreHold,
    Switching,
    PostHold,
    FadeOut,
    /// Idle. No transition in flight.
    Complete,
}

/// How the scene swap behind the overlay is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwapMode {
    /// Navigate to a new scene; stack the current one if `pause_current`.
    Forward { pause_current: bool },
    /// Return to a previously stacked scene.
    Resume,
}

/// What the manager has to do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransitionStep {
    Idle,
    Running,
    /// `Switching` was just entered: perform the swap.
    BeginSwap,
    /// The overlay is gone and the machine is idle again.
    Finished,
}

/// Phase timing shared with the overlay's callbacks.
#[derive(Debug, Clone, Copy)]
struct PhaseClock {
    phase: TransitionPhase,
    started: f64,
    timings: TransitionTimings,
}

impl PhaseClock {
    fn alpha_at(&self, now: f64) -> f32 {
        let elapsed = now - self.started;
        match self.phase {
            TransitionPhase::FadeIn => ramp(elapsed, self.timings.fade_in),
            TransitionPhase::PreHold | TransitionPhase::Switching | TransitionPhase::PostHold => 1.0,
            TransitionPhase::FadeOut => 1.0 - ramp(elapsed, self.timings.fade_out),
            TransitionPhase::Complete => 0.0,
        }
    }
}

fn ramp(elapsed: f64, duration: f64) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0) as f32
}

//=== Transition ==========================================================

/// The scene transition state machine.
pub struct Transition {
    timings: TransitionTimings,
    color: Rgba,
    clock: Rc<Cell<PhaseClock>>,
    alpha: Rc<Cell<f32>>,
    now: f64,
    target: Option<(SceneSlot, SwapMode)>,
    overlay: Option<ObjectId>,
    swap_tx: Sender<()>,
    swap_rx: Receiver<()>,
}

impl Transition {
    pub(crate) fn new(timings: TransitionTimings, color: Rgba) -> Self {
        let (swap_tx, swap_rx) = unbounded();
        Self {
            timings,
            color,
            clock: Rc::new(Cell::new(PhaseClock {
                phase: TransitionPhase::Complete,
                started: 0.0,
                timings,
            })),
            alpha: Rc::new(Cell::new(0.0)),
            now: 0.0,
            target: None,
            overlay: None,
            swap_tx,
            swap_rx,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn phase(&self) -> TransitionPhase {
        self.clock.get().phase
    }

    pub fn is_active(&self) -> bool {
        self.phase() != TransitionPhase::Complete
    }

    /// Overlay alpha as last computed by the overlay's update callback.
    pub fn alpha(&self) -> f32 {
        self.alpha.get()
    }

    /// Fraction of the whole sequence done, 0 → 1, non-decreasing.
    ///
    /// Weighted by the timed phases; `Switching` counts as an instant
    /// boundary between `PreHold` and `PostHold`. Idle reads as 1.
    pub fn progress(&self) -> f32 {
        let t = self.timings;
        let total = t.total();
        let clock = self.clock.get();
        if clock.phase == TransitionPhase::Complete || total <= 0.0 {
            return 1.0;
        }
        let elapsed = (self.now - clock.started).max(0.0);
        let done = match clock.phase {
            TransitionPhase::FadeIn => elapsed.min(t.fade_in),
            TransitionPhase::PreHold => t.fade_in + elapsed.min(t.pre_hold),
            TransitionPhase::Switching => t.fade_in + t.pre_hold,
            TransitionPhase::PostHold => t.fade_in + t.pre_hold + elapsed.min(t.post_hold),
            TransitionPhase::FadeOut => {
                t.fade_in + t.pre_hold + t.post_hold + elapsed.min(t.fade_out)
            }
            TransitionPhase::Complete => total,
        };
        (done / total).clamp(0.0, 1.0) as f32
    }

    //--- Control ----------------------------------------------------------

    /// Starts a transition towards `target`.
    ///
    /// Only honored while idle; otherwise the target is handed back
    /// untouched.
    pub(crate) fn start(
        &mut self,
        target: SceneSlot,
        mode: SwapMode,
        now: f64,
        objects: &mut ObjectRegistry,
    ) -> Result<(), SceneSlot> {
        if self.is_active() {
            warn!(
                target: "transition",
                "Transition already in flight ({:?}), ignoring request for '{}'",
                self.phase(),
                target.scene.name()
            );
            return Err(target);
        }

        debug!(target: "transition", "Starting transition to '{}' ({:?})", target.scene.name(), mode);

        while self.swap_rx.try_recv().is_ok() {}
        self.now = now;
        self.target = Some((target, mode));
        self.enter(TransitionPhase::FadeIn);
        self.alpha.set(0.0);
        self.overlay = Some(self.spawn_overlay(objects));
        Ok(())
    }

    /// Advances the machine. At most one phase change per call.
    pub(crate) fn update(&mut self, now: f64, objects: &mut ObjectRegistry) -> TransitionStep {
        self.now = now;
        let clock = self.clock.get();
        let elapsed = now - clock.started;
        let t = self.timings;

        match clock.phase {
            TransitionPhase::Complete => TransitionStep::Idle,
            TransitionPhase::FadeIn => {
                if elapsed >= t.fade_in {
                    self.enter(TransitionPhase::PreHold);
                }
                TransitionStep::Running
            }
            TransitionPhase::PreHold => {
                if elapsed >= t.pre_hold {
                    self.enter(TransitionPhase::Switching);
                    return TransitionStep::BeginSwap;
                }
                TransitionStep::Running
            }
            TransitionPhase::Switching => {
                if self.swap_rx.try_recv().is_ok() {
                    self.enter(TransitionPhase::PostHold);
                }
                TransitionStep::Running
            }
            TransitionPhase::PostHold => {
                if elapsed >= t.post_hold {
                    self.enter(TransitionPhase::FadeOut);
                }
                TransitionStep::Running
            }
            TransitionPhase::FadeOut => {
                if elapsed >= t.fade_out {
                    self.finish(objects);
                    return TransitionStep::Finished;
                }
                TransitionStep::Running
            }
        }
    }

    /// Hands the pending target to the manager for the swap.
    pub(crate) fn take_target(&mut self) -> Option<(SceneSlot, SwapMode)> {
        self.target.take()
    }

    /// Channel the manager posts on once the swap has resolved.
    pub(crate) fn swap_notifier(&self) -> Sender<()> {
        self.swap_tx.clone()
    }

    /// Drops the in-flight transition (full reset only).
    ///
    /// Returns the target and its swap mode if the swap had not started
    /// yet. A `Resume` target is a stacked scene and still needs retiring.
    pub(crate) fn abort(&mut self, objects: &mut ObjectRegistry) -> Option<(SceneSlot, SwapMode)> {
        if !self.is_active() {
            return None;
        }
        warn!(target: "transition", "Aborting transition in {:?}", self.phase());
        let target = self.target.take();
        self.finish(objects);
        target
    }

    //--- Internal Helpers -------------------------------------------------

    fn enter(&mut self, phase: TransitionPhase) {
        trace!(target: "transition", "{:?} -> {:?} at {:.3}s", self.phase(), phase, self.now);
        self.clock.set(PhaseClock {
            phase,
            started: self.now,
            timings: self.timings,
        });
    }

    fn finish(&mut self, objects: &mut ObjectRegistry) {
        self.enter(TransitionPhase::Complete);
        self.target = None;
        self.alpha.set(0.0);
        while self.swap_rx.try_recv().is_ok() {}
        if let Some(overlay) = self.overlay.take() {
            objects.destroy(overlay);
        }
        debug!(target: "transition", "Transition complete");
    }

    fn spawn_overlay(&self, objects: &mut ObjectRegistry) -> ObjectId {
        let (update_clock, update_alpha) = (Rc::clone(&self.clock), Rc::clone(&self.alpha));
        let draw_alpha = Rc::clone(&self.alpha);
        let color = self.color;

        objects.spawn(
            ObjectBuilder::new(i32::MAX)
                .owner(Owner::System)
                .on_update(move |_, frame, _| update_alpha.set(update_clock.get().alpha_at(frame.now)))
                .on_draw(move |_, frame, canvas| {
                    let alpha = draw_alpha.get();
                    if alpha > 0.0 {
                        canvas.fill_rect(frame.viewport.display_bounds(), color.with_alpha(color.a * alpha));
                    }
                }),
        )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::core::geometry::{Rect, Viewport};
    use crate::core::objects::FrameInfo;
    use crate::core::scene::SceneId;
    use crate::core::test_support::{ProbeScene, RecordingCanvas};

    const DT: f64 = 0.05;

    fn slot() -> SceneSlot {
        SceneSlot::new(SceneId::new(1), Box::new(ProbeScene::new("next", &Default::default())))
    }

    fn frame(now: f64, viewport: Viewport) -> FrameInfo {
        FrameInfo { now, dt: DT, cursor: Vec2::ZERO, viewport }
    }

    #[test]
    fn phases_run_in_order_and_progress_never_decreases() {
        let mut transition = Transition::new(TransitionTimings::default(), Rgba::BLACK);
        let mut objects = ObjectRegistry::new();
        let mut now = 0.0;

        assert!(transition.start(slot(), SwapMode::Resume, now, &mut objects).is_ok());

        let mut phases = vec![transition.phase()];
        let mut last_progress = transition.progress();
        for _ in 0..200 {
            now += DT;
            let step = transition.update(now, &mut objects);
            if step == TransitionStep::BeginSwap {
                assert!(transition.take_target().is_some());
                transition.swap_notifier().send(()).unwrap();
            }
            if phases.last() != Some(&transition.phase()) {
                phases.push(transition.phase());
            }
            assert!(transition.progress() >= last_progress);
            last_progress = transition.progress();
            if step == TransitionStep::Finished {
                break;
            }
        }

        assert_eq!(
            phases,
            vec![
                TransitionPhase::FadeIn,
                TransitionPhase::PreHold,
                TransitionPhase::Switching,
                TransitionPhase::PostHold,
                TransitionPhase::FadeOut,
                TransitionPhase::Complete,
            ]
        );
        assert_eq!(transition.progress(), 1.0);
        assert_eq!(objects.count(), 0, "overlay is torn down");
    }

    #[test]
    fn switching_waits_for_swap_event() {
        let timings = TransitionTimings { fade_in: 0.1, pre_hold: 0.1, post_hold: 0.1, fade_out: 0.1 };
        let mut transition = Transition::new(timings, Rgba::BLACK);
        let mut objects = ObjectRegistry::new();
        transition.start(slot(), SwapMode::Forward { pause_current: false }, 0.0, &mut objects).ok();

        transition.update(0.1, &mut objects);
        assert_eq!(transition.update(0.2, &mut objects), TransitionStep::BeginSwap);

        for step in 1..=50 {
            transition.update(0.2 + step as f64, &mut objects);
            assert_eq!(transition.phase(), TransitionPhase::Switching);
        }

        transition.swap_notifier().send(()).unwrap();
        transition.update(60.0, &mut objects);
        assert_eq!(transition.phase(), TransitionPhase::PostHold);
    }

    #[test]
    fn second_start_is_rejected_while_active() {
        let mut transition = Transition::new(TransitionTimings::default(), Rgba::BLACK);
        let mut objects = ObjectRegistry::new();

        assert!(transition.start(slot(), SwapMode::Resume, 0.0, &mut objects).is_ok());
        let rejected = transition.start(slot(), SwapMode::Resume, 0.0, &mut objects);

        assert!(rejected.is_err());
        assert_eq!(objects.count(), 1, "only one overlay");
    }

    #[test]
    fn overlay_covers_display_bounds_at_current_alpha() {
        let mut viewport = Viewport::new(Vec2::new(800.0, 600.0));
        viewport.set_window_size(Vec2::new(1920.0, 1200.0));

        let mut transition = Transition::new(TransitionTimings::default(), Rgba::BLACK);
        let mut objects = ObjectRegistry::new();
        transition.start(slot(), SwapMode::Resume, 0.0, &mut objects).ok();

        let now = 0.175;
        transition.update(now, &mut objects);
        objects.update_all(&frame(now, viewport), &[], None);
        let mut canvas = RecordingCanvas::default();
        objects.draw_all(&frame(now, viewport), &mut canvas);

        assert!((transition.alpha() - 0.5).abs() < 1e-4);
        let fills = canvas.fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].0, Rect::new(-80.0, 0.0, 960.0, 600.0));
        assert!((fills[0].1.a - 0.5).abs() < 1e-4);
    }

    #[test]
    fn abort_returns_unswapped_target_and_idles() {
        let mut transition = Transition::new(TransitionTimings::default(), Rgba::BLACK);
        let mut objects = ObjectRegistry::new();
        transition.start(slot(), SwapMode::Resume, 0.0, &mut objects).ok();

        let target = transition.abort(&mut objects);

        assert!(matches!(target, Some((_, SwapMode::Resume))));
        assert!(!transition.is_active());
        assert_eq!(objects.count(), 0);
        assert!(transition.abort(&mut objects).is_none());
    }
}
