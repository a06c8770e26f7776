//=========================================================================
// Runtime
//=========================================================================
//
// Facade over the context/systems pair that the frame scheduler ticks.
//
// Lifecycle:
// ```text
//   new() ──start()──> [tick(dt, input)]* ──shutdown()──> done
//                        │
//                        └─ Exit once request_close() latched
// ```
//
// Everything lives on one logical thread. `Engine::run` builds the
// runtime on the core thread through a factory closure, so scenes and
// callbacks do not need to be `Send`.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::core::config::RuntimeConfig;
use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::input::InputEvent;
use crate::core::platform_bridge::HostServices;
use crate::core::scene::{Navigator, Scene, SceneFactory, SceneId, SceneManager, TransitionPhase};
use crate::core::TickControl;

//=== Runtime =============================================================

/// The frame-driven scene/object/tween runtime.
pub struct Runtime {
    context: GlobalContext,
    systems: GlobalSystems,
    started: bool,
    shut_down: bool,
}

impl Runtime {
    //--- Construction -----------------------------------------------------

    pub fn new(config: RuntimeConfig, host: HostServices, factory: SceneFactory) -> Self {
        let (navigator, requests) = Navigator::channel();
        let context = GlobalContext::new(&config, host, navigator);
        let scene_manager = SceneManager::new(&config, factory, requests);

        debug!(
            target: "runtime",
            "Runtime created (logical {}x{})",
            config.logical_size.x, config.logical_size.y
        );

        Self {
            context,
            systems: GlobalSystems::new(scene_manager),
            started: false,
            shut_down: false,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Enters the initial scene. Later calls are ignored.
    pub fn start(&mut self) {
        if self.started {
            debug!(target: "runtime", "Runtime already started");
            return;
        }
        self.started = true;
        info!(target: "runtime", "Runtime starting");
        self.systems.scene_manager.start(&mut self.context);
    }

    /// Advances the runtime by `dt` seconds with this frame's input.
    ///
    /// Returns [`TickControl::Exit`] once a close has been requested.
    pub fn tick(&mut self, dt: f64, batches: &[Vec<InputEvent>]) -> TickControl {
        if self.shut_down {
            return TickControl::Exit;
        }
        self.systems.update(&mut self.context, dt, batches)
    }

    /// Applies a new physical window size.
    pub fn resize(&mut self, window_size: Vec2) {
        debug!(target: "runtime", "Window resized to {}x{}", window_size.x, window_size.y);
        self.context.viewport.set_window_size(window_size);
        self.context.input.refresh_cursor(&self.context.viewport);
    }

    /// Retires every scene, purges objects and tweens, stops audio.
    ///
    /// Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        info!(target: "runtime", "Runtime shutting down");

        self.systems.scene_manager.teardown(&mut self.context);
        self.context.objects.destroy_all();
        self.context.tweens.reset_all();
        if let Err(e) = self.context.host.audio.stop_all() {
            error!(target: "runtime", "Failed to stop audio on shutdown: {}", e);
        }
    }

    //--- Navigation -------------------------------------------------------

    pub fn go_to_scene(&mut self, scene: impl Scene + 'static, with_transition: bool, pause_current: bool) {
        self.systems
            .scene_manager
            .go_to_scene(Box::new(scene), with_transition, pause_current, &mut self.context);
    }

    pub fn go_to_previous_scene(&mut self, with_transition: bool) {
        self.systems.scene_manager.go_to_previous_scene(with_transition, &mut self.context);
    }

    pub fn restart_app_in_place(&mut self) {
        self.systems.scene_manager.restart_app_in_place(&mut self.context);
    }

    //--- Queries ----------------------------------------------------------

    pub fn active_scene_name(&self) -> Option<&str> {
        self.systems.scene_manager.active_scene_name()
    }

    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.systems.scene_manager.active_scene_id()
    }

    pub fn paused_scene_count(&self) -> usize {
        self.systems.scene_manager.paused_len()
    }

    /// Whether a transition, a pending scene hook or a modal overlay
    /// currently swallows input.
    pub fn is_input_blocked(&self) -> bool {
        self.systems.scene_manager.is_input_blocked(&self.context)
    }

    pub fn transition_phase(&self) -> TransitionPhase {
        self.systems.scene_manager.transition().phase()
    }

    pub fn transition_progress(&self) -> f32 {
        self.systems.scene_manager.transition().progress()
    }

    pub fn is_closing(&self) -> bool {
        self.context.is_closing()
    }

    pub fn navigator(&self) -> Navigator {
        self.context.navigator().clone()
    }

    pub fn context(&self) -> &GlobalContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut GlobalContext {
        &mut self.context
    }

    pub fn scene_manager(&self) -> &SceneManager {
        &self.systems.scene_manager
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::geometry::Rect;
    use crate::core::input::{KeyCode, Modifiers, MouseButton};
    use crate::core::objects::{ObjectBuilder, Owner};
    use crate::core::platform_bridge::{NullCanvas, StaticProfile};
    use crate::core::scene::Capabilities;
    use crate::core::test_support::{Log, ProbeScene, RecordingAudio, RecordingCanvas};
    use crate::core::tween::TweenBuilder;

    const DT: f64 = 1.0 / 60.0;

    fn runtime(log: &Log) -> Runtime {
        let main_log = Rc::clone(log);
        Runtime::new(
            RuntimeConfig::default(),
            HostServices::headless(),
            SceneFactory::new(move || ProbeScene::new("Main", &main_log)),
        )
    }

    fn probe(name: &str, log: &Log) -> ProbeScene {
        ProbeScene::new(name, log).with_caps(Capabilities::ALL)
    }

    fn run(rt: &mut Runtime, ticks: usize) {
        for _ in 0..ticks {
            rt.tick(DT, &[]);
        }
    }

    /// Ticks until no transition or hook is pending (bounded).
    fn settle(rt: &mut Runtime) {
        for _ in 0..600 {
            rt.tick(DT, &[]);
            if !rt.is_input_blocked() {
                return;
            }
        }
        panic!("runtime did not settle");
    }

    #[test]
    fn fresh_boot_enters_scene_once() {
        let log = Log::default();
        let mut rt = runtime(&log);

        rt.go_to_scene(probe("A", &log), false, false);
        run(&mut rt, 5);

        assert_eq!(*log.borrow(), vec!["A:init"]);
        assert_eq!(rt.active_scene_name(), Some("A"));
        assert_eq!(rt.paused_scene_count(), 0);
    }

    #[test]
    fn start_enters_initial_scene_once() {
        let log = Log::default();
        let mut rt = runtime(&log);

        rt.start();
        rt.start();
        run(&mut rt, 2);

        assert_eq!(*log.borrow(), vec!["Main:init"]);
    }

    #[test]
    fn first_run_enters_onboarding() {
        let log = Log::default();
        let (main_log, tutorial_log) = (Rc::clone(&log), Rc::clone(&log));
        let host = HostServices::new(
            Box::new(NullCanvas),
            Box::new(RecordingAudio::default()),
            Box::new(StaticProfile { first_run_complete: false }),
        );
        let factory = SceneFactory::new(move || ProbeScene::new("Main", &main_log))
            .with_onboarding(move || ProbeScene::new("Tutorial", &tutorial_log));
        let mut rt = Runtime::new(RuntimeConfig::default(), host, factory);

        rt.start();
        rt.tick(DT, &[]);

        assert_eq!(rt.active_scene_name(), Some("Tutorial"));
    }

    #[test]
    fn no_object_leak_across_scene_switches() {
        let log = Log::default();
        let mut rt = runtime(&log);

        rt.go_to_scene(probe("A", &log).spawning(4), false, false);
        rt.tick(DT, &[]);
        let a = rt.active_scene_id().unwrap();
        assert_eq!(rt.context().objects.count_by_scene(a), 4);

        rt.go_to_scene(probe("B", &log).spawning(2), true, false);
        settle(&mut rt);

        assert_eq!(rt.active_scene_name(), Some("B"));
        assert_eq!(rt.context().objects.count_by_scene(a), 0);
        assert_eq!(rt.context().objects.count(), 2, "only B's objects, overlay gone");
    }

    #[test]
    fn transition_phases_are_ordered_and_progress_monotonic() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);

        rt.go_to_scene(probe("B", &log).pending_init(10), true, false);

        let mut phases = vec![rt.transition_phase()];
        let mut progress = rt.transition_progress();
        for _ in 0..600 {
            rt.tick(DT, &[]);
            assert!(rt.transition_progress() >= progress);
            progress = rt.transition_progress();
            if phases.last() != Some(&rt.transition_phase()) {
                phases.push(rt.transition_phase());
            }
            if rt.transition_phase() == TransitionPhase::Complete {
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
        assert_eq!(*log.borrow(), vec!["A:init", "A:destroy", "B:init"]);
    }

    #[test]
    fn second_transition_request_is_dropped() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);

        rt.go_to_scene(probe("B", &log), true, false);
        rt.go_to_scene(probe("C", &log), true, false);
        settle(&mut rt);

        assert_eq!(rt.active_scene_name(), Some("B"));
        assert!(!log.borrow().iter().any(|e| e.starts_with("C:")));
    }

    #[test]
    fn pause_resume_round_trip() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log).spawning(3), false, false);
        rt.tick(DT, &[]);
        let a = rt.active_scene_id().unwrap();

        rt.go_to_scene(probe("B", &log), true, true);
        settle(&mut rt);
        assert_eq!(rt.paused_scene_count(), 1);
        assert_eq!(rt.context().objects.count_by_scene(a), 3, "paused, not destroyed");

        rt.go_to_previous_scene(true);
        settle(&mut rt);

        let entries = log.borrow().clone();
        assert_eq!(entries, vec!["A:init", "A:pause", "B:init", "B:destroy", "A:resume"]);
        assert_eq!(rt.active_scene_id(), Some(a));
        assert_eq!(rt.paused_scene_count(), 0);

        let objects = &rt.context().objects;
        assert_eq!(objects.count_by_scene(a), 3);
        assert_eq!(objects.count(), 3);
    }

    #[test]
    fn resumed_scene_objects_are_unpaused() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);

        let updates = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&updates);
        let a = rt.active_scene_id().unwrap();
        let id = rt.context_mut().objects.spawn(
            ObjectBuilder::new(0)
                .owner(crate::core::objects::Owner::Scene(a))
                .on_update(move |_, _, _| *counter.borrow_mut() += 1),
        );

        rt.go_to_scene(probe("B", &log), false, true);
        rt.tick(DT, &[]);
        assert!(rt.context().objects.lookup(id).unwrap().is_paused());
        let frozen = *updates.borrow();
        run(&mut rt, 5);
        assert_eq!(*updates.borrow(), frozen);

        rt.go_to_previous_scene(false);
        rt.tick(DT, &[]);
        assert!(!rt.context().objects.lookup(id).unwrap().is_paused());
        assert!(*updates.borrow() > frozen);
    }

    #[test]
    fn pending_resume_is_polled_until_ready() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log).pending_resume(3), false, false);
        rt.tick(DT, &[]);
        rt.go_to_scene(probe("B", &log), false, true);
        rt.tick(DT, &[]);

        rt.go_to_previous_scene(false);
        rt.tick(DT, &[]);
        assert!(rt.is_input_blocked());
        settle(&mut rt);

        let resumes = log.borrow().iter().filter(|e| *e == "A:resume").count();
        assert_eq!(resumes, 1);
    }

    #[test]
    fn failed_init_still_completes_transition() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);

        rt.go_to_scene(probe("B", &log).failing_init(), true, false);
        settle(&mut rt);

        assert_eq!(rt.transition_phase(), TransitionPhase::Complete);
        assert_eq!(rt.active_scene_name(), Some("B"));
    }

    #[test]
    fn draw_order_follows_z_and_click_goes_topmost() {
        let log = Log::default();
        let canvas = RecordingCanvas::default();
        let host = HostServices::new(
            Box::new(canvas.clone()),
            Box::new(RecordingAudio::default()),
            Box::new(StaticProfile { first_run_complete: true }),
        );
        let main_log = Rc::clone(&log);
        let mut rt = Runtime::new(
            RuntimeConfig::default(),
            host,
            SceneFactory::new(move || ProbeScene::new("Main", &main_log)),
        );
        rt.start();
        rt.tick(DT, &[]);

        let clicks: Log = Default::default();
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        for z in [5, 1, 1000] {
            let clicks = Rc::clone(&clicks);
            let color = crate::core::geometry::Rgba::new(z as f32, 0.0, 0.0, 1.0);
            rt.context_mut().objects.spawn(
                ObjectBuilder::new(z)
                    .hit_rect(area)
                    .on_draw(move |_, _, canvas| canvas.fill_rect(area, color))
                    .on_click(move |_, _, _| {
                        clicks.borrow_mut().push(format!("click {z}"));
                        true
                    }),
            );
        }
        canvas.clear();

        let input = vec![vec![
            InputEvent::MouseMoved { x: 50.0, y: 50.0 },
            InputEvent::MouseButtonDown { button: MouseButton::Left, modifiers: Modifiers::NONE },
        ]];
        rt.tick(DT, &input);

        let drawn: Vec<f32> = canvas.fills().iter().map(|(_, color)| color.r).collect();
        assert_eq!(drawn, vec![1.0, 5.0, 1000.0]);
        assert_eq!(*clicks.borrow(), vec!["click 1000"]);
    }

    #[test]
    fn named_tween_restart_only_applies_second_trajectory() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.start();

        let seen = Rc::new(RefCell::new(Vec::<f32>::new()));
        let ended = Rc::new(RefCell::new(Vec::<&str>::new()));
        for (label, from, to) in [("first", 0.0_f32, 1.0_f32), ("second", 10.0, 20.0)] {
            let (seen, ended) = (Rc::clone(&seen), Rc::clone(&ended));
            rt.context_mut().tweens.start(
                TweenBuilder::new(from, to, 0.1)
                    .named("fade")
                    .on_update(move |v| seen.borrow_mut().push(v))
                    .on_end(move |_| ended.borrow_mut().push(label)),
            );
        }
        run(&mut rt, 12);

        assert!(seen.borrow().iter().all(|v| (10.0..=20.0).contains(v)));
        assert_eq!(seen.borrow().last().copied(), Some(20.0));
        assert_eq!(*ended.borrow(), vec!["second"]);
        assert!(rt.context().tweens.is_empty());
    }

    #[test]
    fn full_reset_mid_tween_leaves_clean_state() {
        let log = Log::default();
        let audio = RecordingAudio::default();
        let host = HostServices::new(
            Box::new(NullCanvas),
            Box::new(audio.clone()),
            Box::new(StaticProfile { first_run_complete: true }),
        );
        let main_log = Rc::clone(&log);
        let mut rt = Runtime::new(
            RuntimeConfig::default(),
            host,
            SceneFactory::new(move || ProbeScene::new("Main", &main_log)),
        );
        rt.start();
        rt.tick(DT, &[]);

        rt.go_to_scene(probe("A", &log).spawning(2), false, true);
        rt.tick(DT, &[]);
        rt.go_to_scene(probe("B", &log).spawning(2), true, true);
        run(&mut rt, 10);
        rt.context_mut().tweens.start(TweenBuilder::new(0.0_f32, 1.0, 5.0).named("music"));
        rt.context_mut().objects.create(3, None, None);
        run(&mut rt, 2);

        rt.restart_app_in_place();
        rt.tick(DT, &[]);

        assert_eq!(rt.context().tweens.len(), 0);
        assert_eq!(rt.paused_scene_count(), 0);
        assert_eq!(rt.context().objects.count(), 0);
        assert_eq!(rt.active_scene_name(), Some("Main"));
        assert_eq!(rt.transition_phase(), TransitionPhase::Complete);
        assert_eq!(audio.stops(), 1);
        assert_eq!(log.borrow().iter().filter(|e| *e == "Main:init").count(), 2);
    }

    #[test]
    fn reset_survives_audio_failure() {
        let log = Log::default();
        let main_log = Rc::clone(&log);
        let host = HostServices::new(
            Box::new(NullCanvas),
            Box::new(RecordingAudio::failing()),
            Box::new(StaticProfile { first_run_complete: true }),
        );
        let mut rt = Runtime::new(
            RuntimeConfig::default(),
            host,
            SceneFactory::new(move || ProbeScene::new("Main", &main_log)),
        );
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);

        rt.restart_app_in_place();
        rt.tick(DT, &[]);

        assert_eq!(rt.active_scene_name(), Some("Main"));
    }

    #[test]
    fn restart_request_from_navigator() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);

        rt.navigator().restart();
        rt.tick(DT, &[]);

        assert_eq!(rt.active_scene_name(), Some("Main"));
        assert_eq!(*log.borrow(), vec!["A:init", "A:destroy", "Main:init"]);
    }

    #[test]
    fn keys_reach_scene_only_when_unblocked() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);

        let press = |key| {
            vec![vec![
                InputEvent::KeyDown { key, modifiers: Modifiers::NONE },
                InputEvent::KeyUp { key, modifiers: Modifiers::NONE },
            ]]
        };

        rt.tick(DT, &press(KeyCode::Space));
        rt.context_mut().set_modal_blocking(true);
        rt.tick(DT, &press(KeyCode::Enter));
        rt.context_mut().set_modal_blocking(false);
        rt.go_to_scene(probe("B", &log), true, false);
        rt.tick(DT, &press(KeyCode::Escape));

        let keys: Vec<String> = log.borrow().iter().filter(|e| e.contains("key")).cloned().collect();
        assert_eq!(keys, vec!["A:key Space"]);
    }

    #[test]
    fn close_request_exits_after_current_tick() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.start();
        assert_eq!(rt.tick(DT, &[]), TickControl::Continue);

        rt.context_mut().request_close();
        assert_eq!(rt.tick(DT, &[]), TickControl::Exit);
        assert!(rt.is_closing());
    }

    #[test]
    fn shutdown_retires_all_scenes_once() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log).spawning(1), false, false);
        rt.tick(DT, &[]);
        rt.go_to_scene(probe("B", &log), false, true);
        rt.tick(DT, &[]);

        rt.shutdown();
        rt.shutdown();

        assert_eq!(
            *log.borrow(),
            vec!["A:init", "A:pause", "B:init", "B:destroy", "A:destroy"]
        );
        assert_eq!(rt.context().objects.count(), 0);
        assert_eq!(rt.tick(DT, &[]), TickControl::Exit);
    }

    fn spawn_hover_counter(rt: &mut Runtime, owner: SceneId) -> Rc<RefCell<usize>> {
        let hovers = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hovers);
        rt.context_mut().objects.spawn(
            ObjectBuilder::new(0)
                .owner(Owner::Scene(owner))
                .hit_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
                .on_hover_start(move |_, _| *counter.borrow_mut() += 1),
        );
        hovers
    }

    fn cursor_at(x: f32, y: f32) -> Vec<Vec<InputEvent>> {
        vec![vec![InputEvent::MouseMoved { x, y }]]
    }

    #[test]
    fn no_hover_under_transition_overlay() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &cursor_at(500.0, 500.0));
        let a = rt.active_scene_id().unwrap();
        let hovers = spawn_hover_counter(&mut rt, a);

        rt.go_to_scene(probe("B", &log), true, false);
        run(&mut rt, 22);
        assert!(rt.is_input_blocked());
        assert_eq!(rt.transition_phase(), TransitionPhase::PreHold);

        rt.tick(DT, &cursor_at(50.0, 50.0));

        assert_eq!(*hovers.borrow(), 0);
    }

    #[test]
    fn hover_waits_for_modal_to_clear() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &cursor_at(500.0, 500.0));
        let a = rt.active_scene_id().unwrap();
        let hovers = spawn_hover_counter(&mut rt, a);

        rt.context_mut().set_modal_blocking(true);
        rt.tick(DT, &cursor_at(50.0, 50.0));
        assert_eq!(*hovers.borrow(), 0);

        rt.context_mut().set_modal_blocking(false);
        rt.tick(DT, &[]);
        assert_eq!(*hovers.borrow(), 1);
    }

    #[test]
    fn shutdown_during_back_transition_destroys_stacked_scene() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log).spawning(1), false, false);
        rt.tick(DT, &[]);
        rt.go_to_scene(probe("B", &log), false, true);
        rt.tick(DT, &[]);
        rt.go_to_previous_scene(true);
        rt.tick(DT, &[]);

        rt.shutdown();

        assert_eq!(
            *log.borrow(),
            vec!["A:init", "A:pause", "B:init", "B:destroy", "A:destroy"]
        );
        assert_eq!(rt.context().objects.count(), 0);
    }

    #[test]
    fn restart_during_back_transition_destroys_stacked_scene() {
        let log = Log::default();
        let mut rt = runtime(&log);
        rt.go_to_scene(probe("A", &log), false, false);
        rt.tick(DT, &[]);
        rt.go_to_scene(probe("B", &log), false, true);
        rt.tick(DT, &[]);
        rt.go_to_previous_scene(true);
        rt.tick(DT, &[]);

        rt.restart_app_in_place();
        settle(&mut rt);

        assert_eq!(
            *log.borrow(),
            vec!["A:init", "A:pause", "B:init", "B:destroy", "A:destroy", "Main:init"]
        );
        assert_eq!(rt.active_scene_name(), Some("Main"));
        assert_eq!(rt.paused_scene_count(), 0);
    }
}
