//=========================================================================
// Scene System
//=========================================================================
//
// Scene contract, scene stack and the phased transition between scenes.
//
// Architecture:
//   SceneManager
//     ├─ active: Option<SceneSlot>
//     ├─ stack: Vec<SceneSlot>        (paused scenes, top = last)
//     ├─ transition: Transition       (fadeIn → … → complete)
//     └─ requests: Receiver<SceneRequest>  (fed by Navigator handles)
//
// Flow (per tick):
//   drain navigator requests → step transition (swap on `switching`)
//     → poll pending init/resume → Scene::render()
//
// Async hooks are poll-style: `init` and `resume` return `Poll` and are
// polled once per tick until they report `Ready`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::{BitOr, Deref, DerefMut};
use std::task::Poll;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::GlobalContext;
use crate::core::input::KeyCode;
use crate::core::objects::{ObjectBuilder, ObjectId, Owner};
use crate::core::platform_bridge::Canvas;

//=== Module Declarations =================================================

mod factory;
mod manager;
mod navigator;
mod transition;

//=== Public API ==========================================================

pub use factory::SceneFactory;
pub use manager::SceneManager;
pub use navigator::{NavigateOptions, Navigator, SceneRequest};
pub use transition::{Transition, TransitionPhase};

//=== SceneId =============================================================

/// Identity token of one scene instance, assigned when the manager
/// adopts it. Used to tag the objects the scene owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

//=== Capabilities ========================================================

/// Optional hooks a scene implements.
///
/// The manager checks these bits before calling the matching hook;
/// `init` and `render` are always called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const PAUSE: Self = Self(1 << 0);
    pub const RESUME: Self = Self(1 << 1);
    pub const DESTROY: Self = Self(1 << 2);
    pub const KEYS: Self = Self(1 << 3);
    pub const MOUSE: Self = Self(1 << 4);
    pub const ALL: Self = Self(0b1_1111);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

//=== Scene Trait =========================================================

/// Result of polling an asynchronous scene hook.
pub type HookPoll = Poll<Result<(), SceneError>>;

/// One screen of the application (menu, tutorial, gameplay...).
///
/// Only `name` and `render` are required:
///
/// ```ignore
/// struct Title;
///
/// impl Scene for Title {
///     fn name(&self) -> &str {
///         "title"
///     }
///
///     fn render(&mut self, ctx: &mut SceneContext) {
///         ctx.canvas().fill_rect(ctx.viewport.render_bounds(), Rgba::WHITE);
///     }
/// }
/// ```
pub trait Scene {
    /// Display name, used in logs.
    fn name(&self) -> &str;

    /// Optional hooks this scene implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// Prepares the scene. Polled once per tick until `Ready`.
    ///
    /// Runs when the scene becomes active without a paused predecessor to
    /// resume into. Not called again on resume.
    fn init(&mut self, _ctx: &mut SceneContext) -> HookPoll {
        Poll::Ready(Ok(()))
    }

    /// Called every tick while the scene is active and ready.
    fn render(&mut self, ctx: &mut SceneContext);

    /// The scene is being stacked. Its objects are already paused.
    fn pause(&mut self, _ctx: &mut SceneContext) -> Result<(), SceneError> {
        Ok(())
    }

    /// The scene is back on top. Polled once per tick until `Ready`.
    fn resume(&mut self, _ctx: &mut SceneContext) -> HookPoll {
        Poll::Ready(Ok(()))
    }

    /// The scene is retired for good. Its objects are purged right after.
    fn destroy(&mut self, _ctx: &mut SceneContext) -> Result<(), SceneError> {
        Ok(())
    }

    /// Returns `true` if the key was handled.
    fn handle_key_press(&mut self, _key: KeyCode, _ctx: &mut SceneContext) -> bool {
        false
    }

    /// Cursor moved, in logical coordinates.
    fn handle_mouse_move(&mut self, _position: Vec2, _ctx: &mut SceneContext) {}
}

//=== SceneContext ========================================================

/// What a scene sees during a hook: the shared context plus its own id.
///
/// Derefs to [`GlobalContext`].
pub struct SceneContext<'a> {
    scene: SceneId,
    global: &'a mut GlobalContext,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(scene: SceneId, global: &'a mut GlobalContext) -> Self {
        Self { scene, global }
    }

    pub fn scene_id(&self) -> SceneId {
        self.scene
    }

    /// Spawns an object owned by this scene unless the builder names
    /// another owner.
    pub fn spawn(&mut self, builder: ObjectBuilder) -> ObjectId {
        self.global.objects.spawn(builder.or_owner(Owner::Scene(self.scene)))
    }

    /// Host draw surface.
    pub fn canvas(&mut self) -> &mut dyn Canvas {
        self.global.host.canvas.as_mut()
    }
}

impl Deref for SceneContext<'_> {
    type Target = GlobalContext;

    fn deref(&self) -> &GlobalContext {
        self.global
    }
}

impl DerefMut for SceneContext<'_> {
    fn deref_mut(&mut self) -> &mut GlobalContext {
        self.global
    }
}

//=== SceneSlot ===========================================================

/// A scene adopted by the manager.
pub(crate) struct SceneSlot {
    pub(crate) id: SceneId,
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) paused: bool,
}

impl SceneSlot {
    pub(crate) fn new(id: SceneId, scene: Box<dyn Scene>) -> Self {
        Self { id, scene, paused: false }
    }

    pub(crate) fn has(&self, capability: Capabilities) -> bool {
        self.scene.capabilities().contains(capability)
    }

    /// Runs `f` on the scene with a context bound to this slot's id.
    pub(crate) fn with_context<R>(
        &mut self,
        global: &mut GlobalContext,
        f: impl FnOnce(&mut dyn Scene, &mut SceneContext<'_>) -> R,
    ) -> R {
        let mut ctx = SceneContext::new(self.id, global);
        f(self.scene.as_mut(), &mut ctx)
    }

    pub(crate) fn name(&self) -> &str {
        self.scene.name()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
