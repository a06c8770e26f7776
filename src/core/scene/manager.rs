//=========================================================================
// Scene Manager
//=========================================================================
//
// Owns the active scene, the stack of paused scenes and the transition
// machine.
//
// Swaps (instant or behind the transition overlay):
//   forward  : current → paused onto the stack | retired; new → init()
//   resume   : current → retired; stack top → objects unpaused, resume()
//
// Retiring a scene always runs its destroy hook (if declared) and then
// purges every object tagged with its id, so nothing outlives its scene.
//
// init()/resume() are polled once per tick until ready. While one is
// pending the scene is not rendered and input is blocked. When the swap
// ran inside a transition, readiness is posted back on the transition's
// swap channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::task::Poll;

use crossbeam_channel::{Receiver, Sender};
use glam::Vec2;
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::factory::SceneFactory;
use super::navigator::SceneRequest;
use super::transition::{SwapMode, Transition, TransitionStep};
use super::{Capabilities, Scene, SceneId, SceneSlot};
use crate::core::config::RuntimeConfig;
use crate::core::globals::GlobalContext;
use crate::core::input::KeyCode;

//=== Activation ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivationKind {
    Init,
    Resume,
}

/// A hook of the active scene that has not resolved yet.
struct Activation {
    kind: ActivationKind,
    /// Posted once the hook resolves (transition swaps only).
    notify: Option<Sender<()>>,
}

//=== SceneManager ========================================================

/// Scene stack with pause/resume semantics and phased transitions.
pub struct SceneManager {
    active: Option<SceneSlot>,
    stack: Vec<SceneSlot>,
    transition: Transition,
    activation: Option<Activation>,
    factory: SceneFactory,
    requests: Receiver<SceneRequest>,
    next_scene_id: u64,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        config: &RuntimeConfig,
        factory: SceneFactory,
        requests: Receiver<SceneRequest>,
    ) -> Self {
        Self {
            active: None,
            stack: Vec::new(),
            transition: Transition::new(config.transition, config.overlay_color),
            activation: None,
            factory,
            requests,
            next_scene_id: 1,
        }
    }

    /// Enters the initial scene (onboarding or main) without a transition.
    pub(crate) fn start(&mut self, ctx: &mut GlobalContext) {
        let initial = self.factory.initial(ctx.host.profile.as_ref());
        info!(target: "scene", "Starting in scene '{}'", initial.name());
        self.go_to_scene(initial, false, false, ctx);
    }

    //--- Navigation -------------------------------------------------------

    /// Switches to `scene`, through the transition overlay or on the spot.
    ///
    /// With `pause_current` the outgoing scene is stacked instead of
    /// destroyed. Dropped (with a warning) while a transition is in
    /// flight.
    pub fn go_to_scene(
        &mut self,
        scene: Box<dyn Scene>,
        with_transition: bool,
        pause_current: bool,
        ctx: &mut GlobalContext,
    ) {
        let slot = self.adopt(scene);

        if with_transition {
            let mode = SwapMode::Forward { pause_current };
            if let Err(dropped) = self.transition.start(slot, mode, ctx.clock.now, &mut ctx.objects) {
                debug!(target: "scene", "Dropped scene '{}'", dropped.name());
            }
        } else if self.transition.is_active() {
            warn!(
                target: "scene",
                "Transition in flight, ignoring instant switch to '{}'",
                slot.name()
            );
        } else {
            self.swap_forward(slot, pause_current, None, ctx);
        }
    }

    /// Returns to the most recently paused scene.
    ///
    /// No-op while a transition is in flight or when nothing is paused.
    pub fn go_to_previous_scene(&mut self, with_transition: bool, ctx: &mut GlobalContext) {
        if self.transition.is_active() {
            debug!(target: "scene", "Transition in flight, ignoring back navigation");
            return;
        }
        let Some(slot) = self.stack.pop() else {
            debug!(target: "scene", "No paused scene to return to");
            return;
        };

        if with_transition {
            if let Err(slot) = self.transition.start(slot, SwapMode::Resume, ctx.clock.now, &mut ctx.objects) {
                self.stack.push(slot);
            }
        } else {
            self.swap_resume(slot, None, ctx);
        }
    }

    /// Soft-resets the runtime and re-enters the initial scene.
    ///
    /// Every step logs its failure and carries on.
    pub fn restart_app_in_place(&mut self, ctx: &mut GlobalContext) {
        info!(target: "scene", "Restarting in place");

        if let Err(e) = ctx.host.audio.stop_all() {
            error!(target: "scene", "Failed to stop audio during reset: {}", e);
        }

        self.abort_transition(ctx);
        self.retire_all(ctx);
        ctx.objects.destroy_all();
        ctx.tweens.reset_all();

        ctx.modal = false;
        ctx.input.reset();
        let discarded = self.requests.try_iter().count();
        if discarded > 0 {
            debug!(target: "scene", "Discarded {} queued navigation requests", discarded);
        }

        let initial = self.factory.initial(ctx.host.profile.as_ref());
        self.go_to_scene(initial, false, false, ctx);
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick: queued requests, transition, pending hook, render.
    pub(crate) fn update(&mut self, ctx: &mut GlobalContext) {
        self.process_requests(ctx);

        match self.transition.update(ctx.clock.now, &mut ctx.objects) {
            TransitionStep::BeginSwap => self.begin_swap(ctx),
            TransitionStep::Finished => {
                debug!(target: "scene", "Transition finished on '{}'", self.active_scene_name().unwrap_or("<none>"));
            }
            TransitionStep::Idle | TransitionStep::Running => {}
        }

        self.poll_activation(ctx);

        if self.activation.is_none() {
            if let Some(slot) = self.active.as_mut() {
                slot.with_context(ctx, |scene, sctx| scene.render(sctx));
            }
        }
    }

    /// Retires every scene, active and paused (shutdown).
    pub(crate) fn teardown(&mut self, ctx: &mut GlobalContext) {
        self.abort_transition(ctx);
        self.retire_all(ctx);
    }

    //--- Input Dispatch ---------------------------------------------------

    /// Forwards a key press to the active scene. Returns `true` if handled.
    pub(crate) fn dispatch_key(&mut self, key: KeyCode, ctx: &mut GlobalContext) -> bool {
        if self.is_input_blocked(ctx) {
            return false;
        }
        match self.active.as_mut() {
            Some(slot) if slot.has(Capabilities::KEYS) => {
                slot.with_context(ctx, |scene, sctx| scene.handle_key_press(key, sctx))
            }
            _ => false,
        }
    }

    pub(crate) fn dispatch_mouse_move(&mut self, position: Vec2, ctx: &mut GlobalContext) {
        if self.is_input_blocked(ctx) {
            return;
        }
        if let Some(slot) = self.active.as_mut().filter(|slot| slot.has(Capabilities::MOUSE)) {
            slot.with_context(ctx, |scene, sctx| scene.handle_mouse_move(position, sctx));
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Whether a transition, a pending scene hook or a modal overlay
    /// currently swallows input.
    pub fn is_input_blocked(&self, ctx: &GlobalContext) -> bool {
        self.transition.is_active() || self.activation.is_some() || ctx.is_modal_blocking()
    }

    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.as_ref().map(SceneSlot::name)
    }

    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.active.as_ref().map(|slot| slot.id)
    }

    /// Number of paused scenes on the stack.
    pub fn paused_len(&self) -> usize {
        self.stack.len()
    }

    /// Paused scene names, bottom of the stack first.
    pub fn paused_scene_names(&self) -> impl Iterator<Item = &str> {
        self.stack.iter().map(SceneSlot::name)
    }

    /// Whether the active scene's init/resume is still pending.
    pub fn is_activating(&self) -> bool {
        self.activation.is_some()
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    //--- Internal Helpers -------------------------------------------------

    fn adopt(&mut self, scene: Box<dyn Scene>) -> SceneSlot {
        let id = SceneId::new(self.next_scene_id);
        self.next_scene_id += 1;
        SceneSlot::new(id, scene)
    }

    /// Stops an in-flight transition. A never-entered forward target is
    /// dropped without hooks; a popped resume target goes back on the
    /// stack so it is retired with the rest.
    fn abort_transition(&mut self, ctx: &mut GlobalContext) {
        match self.transition.abort(&mut ctx.objects) {
            Some((slot, SwapMode::Resume)) => {
                debug!(target: "scene", "Restacking scene '{}' from aborted transition", slot.name());
                self.stack.push(slot);
            }
            Some((slot, SwapMode::Forward { .. })) => {
                debug!(target: "scene", "Discarding unentered scene '{}'", slot.name());
            }
            None => {}
        }
    }

    fn process_requests(&mut self, ctx: &mut GlobalContext) {
        while let Ok(request) = self.requests.try_recv() {
            debug!(target: "scene", "Applying {:?}", request);
            match request {
                SceneRequest::GoTo { scene, options } => {
                    self.go_to_scene(scene, options.with_transition, options.pause_current, ctx)
                }
                SceneRequest::Back { with_transition } => self.go_to_previous_scene(with_transition, ctx),
                SceneRequest::Restart => self.restart_app_in_place(ctx),
            }
        }
    }

    fn begin_swap(&mut self, ctx: &mut GlobalContext) {
        let notify = self.transition.swap_notifier();
        match self.transition.take_target() {
            Some((slot, SwapMode::Forward { pause_current })) => {
                self.swap_forward(slot, pause_current, Some(notify), ctx)
            }
            Some((slot, SwapMode::Resume)) => self.swap_resume(slot, Some(notify), ctx),
            None => {
                warn!(target: "scene", "Transition reached switching without a target");
                if notify.send(()).is_err() {
                    warn!(target: "scene", "Transition gone, swap notification dropped");
                }
            }
        }
    }

    fn swap_forward(
        &mut self,
        slot: SceneSlot,
        pause_current: bool,
        notify: Option<Sender<()>>,
        ctx: &mut GlobalContext,
    ) {
        if let Some(current) = self.active.take() {
            if pause_current {
                self.suspend(current, ctx);
            } else {
                self.retire(current, ctx);
            }
        }

        info!(target: "scene", "Entering scene '{}' ({:?})", slot.name(), slot.id);
        self.active = Some(slot);
        self.activation = Some(Activation { kind: ActivationKind::Init, notify });
    }

    fn swap_resume(&mut self, mut slot: SceneSlot, notify: Option<Sender<()>>, ctx: &mut GlobalContext) {
        if let Some(current) = self.active.take() {
            self.retire(current, ctx);
        }

        info!(target: "scene", "Resuming scene '{}' ({:?})", slot.name(), slot.id);
        ctx.objects.resume_by_scene(slot.id);
        slot.paused = false;
        self.active = Some(slot);
        self.activation = Some(Activation { kind: ActivationKind::Resume, notify });
    }

    /// Polls the pending init/resume hook of the active scene once.
    fn poll_activation(&mut self, ctx: &mut GlobalContext) {
        let Some(kind) = self.activation.as_ref().map(|a| a.kind) else {
            return;
        };
        let Some(slot) = self.active.as_mut() else {
            self.activation = None;
            return;
        };

        let poll = match kind {
            ActivationKind::Init => slot.with_context(ctx, |scene, sctx| scene.init(sctx)),
            ActivationKind::Resume if slot.has(Capabilities::RESUME) => {
                slot.with_context(ctx, |scene, sctx| scene.resume(sctx))
            }
            ActivationKind::Resume => Poll::Ready(Ok(())),
        };

        let Poll::Ready(result) = poll else {
            return;
        };
        match result {
            Ok(()) => debug!(target: "scene", "Scene '{}' ready ({:?})", slot.name(), kind),
            Err(e) => error!(target: "scene", "Scene '{}' {:?} hook failed: {}", slot.name(), kind, e),
        }

        if let Some(notify) = self.activation.take().and_then(|a| a.notify) {
            if notify.send(()).is_err() {
                warn!(target: "scene", "Transition gone, swap notification dropped");
            }
        }
    }

    /// Stacks a scene: objects paused, pause hook, pushed.
    fn suspend(&mut self, mut slot: SceneSlot, ctx: &mut GlobalContext) {
        ctx.objects.pause_by_scene(slot.id);
        slot.paused = true;
        if slot.has(Capabilities::PAUSE) {
            if let Err(e) = slot.with_context(ctx, |scene, sctx| scene.pause(sctx)) {
                error!(target: "scene", "Scene '{}' pause hook failed: {}", slot.name(), e);
            }
        }
        debug!(target: "scene", "Paused scene '{}' (stack depth {})", slot.name(), self.stack.len() + 1);
        self.stack.push(slot);
    }

    /// Retires a scene for good: destroy hook, then object purge.
    fn retire(&mut self, mut slot: SceneSlot, ctx: &mut GlobalContext) {
        if slot.has(Capabilities::DESTROY) {
            if let Err(e) = slot.with_context(ctx, |scene, sctx| scene.destroy(sctx)) {
                error!(target: "scene", "Scene '{}' destroy hook failed: {}", slot.name(), e);
            }
        }
        ctx.objects.destroy_all_by_scene(slot.id);
        debug!(target: "scene", "Retired scene '{}'", slot.name());
    }

    /// Active scene first, then the stack from the top down.
    fn retire_all(&mut self, ctx: &mut GlobalContext) {
        self.activation = None;
        if let Some(active) = self.active.take() {
            self.retire(active, ctx);
        }
        while let Some(slot) = self.stack.pop() {
            self.retire(slot, ctx);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
