//=========================================================================
// Test Support
//=========================================================================
//
// Shared doubles for unit tests: a canvas that records fills, an audio
// backend that counts stops and a scene that logs its hook calls.
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::task::Poll;

use glam::Vec2;

use crate::core::error::{HostError, SceneError};
use crate::core::geometry::{Rect, Rgba};
use crate::core::input::KeyCode;
use crate::core::objects::ObjectBuilder;
use crate::core::platform_bridge::{AudioOutput, Canvas};
use crate::core::scene::{Capabilities, HookPoll, Scene, SceneContext};

/// Ordered log of hook calls, shared between probes.
pub(crate) type Log = Rc<RefCell<Vec<String>>>;

//=== RecordingCanvas =====================================================

/// Canvas whose clones share one list of fills.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingCanvas {
    fills: Rc<RefCell<Vec<(Rect, Rgba)>>>,
}

impl RecordingCanvas {
    pub(crate) fn fills(&self) -> Vec<(Rect, Rgba)> {
        self.fills.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.fills.borrow_mut().clear();
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.fills.borrow_mut().push((rect, color));
    }
}

//=== RecordingAudio ======================================================

/// Audio backend counting `stop_all` calls; optionally failing them.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingAudio {
    stops: Rc<Cell<usize>>,
    failing: bool,
}

impl RecordingAudio {
    pub(crate) fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub(crate) fn stops(&self) -> usize {
        self.stops.get()
    }
}

impl AudioOutput for RecordingAudio {
    fn stop_all(&mut self) -> Result<(), HostError> {
        self.stops.set(self.stops.get() + 1);
        if self.failing {
            return Err(HostError::Audio("device lost".into()));
        }
        Ok(())
    }
}

//=== ProbeScene ==========================================================

/// Scene that appends `"<name>:<hook>"` to a shared log.
///
/// `init` and `resume` are logged on their first poll only, so a hook
/// held pending still shows up once.
pub(crate) struct ProbeScene {
    name: String,
    log: Log,
    caps: Capabilities,
    init_pending: usize,
    resume_pending: usize,
    init_polls: usize,
    resume_polls: usize,
    spawn_count: usize,
    fail_init: bool,
    log_render: bool,
}

impl ProbeScene {
    pub(crate) fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_owned(),
            log: Rc::clone(log),
            caps: Capabilities::NONE,
            init_pending: 0,
            resume_pending: 0,
            init_polls: 0,
            resume_polls: 0,
            spawn_count: 0,
            fail_init: false,
            log_render: false,
        }
    }

    pub(crate) fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    /// `init` reports `Pending` for the first `polls` polls.
    pub(crate) fn pending_init(mut self, polls: usize) -> Self {
        self.init_pending = polls;
        self
    }

    pub(crate) fn pending_resume(mut self, polls: usize) -> Self {
        self.resume_pending = polls;
        self
    }

    /// Spawns `count` scene objects on the first `init` poll.
    pub(crate) fn spawning(mut self, count: usize) -> Self {
        self.spawn_count = count;
        self
    }

    pub(crate) fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Also log every `render` call.
    pub(crate) fn rendering(mut self) -> Self {
        self.log_render = true;
        self
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, hook));
    }
}

impl Scene for ProbeScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn init(&mut self, ctx: &mut SceneContext) -> HookPoll {
        self.init_polls += 1;
        if self.init_polls == 1 {
            self.record("init");
            for z in 0..self.spawn_count {
                ctx.spawn(ObjectBuilder::new(z as i32));
            }
        }
        if self.init_polls <= self.init_pending {
            return Poll::Pending;
        }
        if self.fail_init {
            return Poll::Ready(Err(SceneError::resource("missing skin")));
        }
        Poll::Ready(Ok(()))
    }

    fn render(&mut self, _ctx: &mut SceneContext) {
        if self.log_render {
            self.record("render");
        }
    }

    fn pause(&mut self, _ctx: &mut SceneContext) -> Result<(), SceneError> {
        self.record("pause");
        Ok(())
    }

    fn resume(&mut self, _ctx: &mut SceneContext) -> HookPoll {
        self.resume_polls += 1;
        if self.resume_polls == 1 {
            self.record("resume");
        }
        if self.resume_polls <= self.resume_pending {
            return Poll::Pending;
        }
        self.resume_polls = 0;
        Poll::Ready(Ok(()))
    }

    fn destroy(&mut self, _ctx: &mut SceneContext) -> Result<(), SceneError> {
        self.record("destroy");
        Ok(())
    }

    fn handle_key_press(&mut self, key: KeyCode, _ctx: &mut SceneContext) -> bool {
        self.record(&format!("key {:?}", key));
        true
    }

    fn handle_mouse_move(&mut self, _position: Vec2, _ctx: &mut SceneContext) {
        self.record("mouse");
    }
}
