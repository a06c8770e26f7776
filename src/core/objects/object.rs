//=========================================================================
// Interactive Objects
//=========================================================================
//
// Per-object data, callbacks and the command buffer callbacks use to
// touch the registry while a pass is running.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Rect, Viewport};
use crate::core::input::MouseButton;
use crate::core::platform_bridge::Canvas;
use crate::core::scene::SceneId;

//=== Identity ============================================================

/// Monotonically increasing object identity. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Lifecycle owner of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Torn down together with the scene.
    Scene(SceneId),

    /// Outside scene lifecycle (e.g. the transition overlay).
    System,
}

//=== Frame Data ==========================================================

/// Per-tick data handed to object callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Runtime clock in seconds.
    pub now: f64,
    /// Seconds since the previous tick.
    pub dt: f64,
    /// Cursor in logical coordinates.
    pub cursor: Vec2,
    pub viewport: Viewport,
}

/// A pointer press routed to the registry's hit-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Press position in logical coordinates.
    pub position: Vec2,
    pub button: MouseButton,
}

//=== ObjectState =========================================================

/// Registry-owned state of one object, visible to its callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectState {
    id: ObjectId,
    owner: Owner,
    pub(crate) paused: bool,
    pub(crate) hovered: bool,

    /// Draw/update order. Higher values draw on top.
    pub z: i32,

    /// Click/hover area; `None` makes the object non-interactive.
    pub hit_rect: Option<Rect>,
}

impl ObjectState {
    pub(crate) fn new(id: ObjectId, owner: Owner, z: i32, hit_rect: Option<Rect>) -> Self {
        Self {
            id,
            owner,
            paused: false,
            hovered: false,
            z,
            hit_rect,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub(crate) fn hit(&self, point: Vec2) -> bool {
        self.hit_rect.is_some_and(|rect| rect.contains(point))
    }
}

//=== Callbacks ===========================================================

pub type UpdateFn = Box<dyn FnMut(&mut ObjectState, &FrameInfo, &mut ObjectCommands)>;
pub type DrawFn = Box<dyn FnMut(&ObjectState, &FrameInfo, &mut dyn Canvas)>;
pub type ClickFn = Box<dyn FnMut(&mut ObjectState, &PointerEvent, &mut ObjectCommands) -> bool>;
pub type HoverFn = Box<dyn FnMut(&mut ObjectState, &mut ObjectCommands)>;

#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) update: Option<UpdateFn>,
    pub(crate) draw: Option<DrawFn>,
    pub(crate) click: Option<ClickFn>,
    pub(crate) hover_start: Option<HoverFn>,
    pub(crate) hover_end: Option<HoverFn>,
}

//=== ObjectBuilder =======================================================

/// Describes an object before it enters the registry.
///
/// Without an explicit owner the object belongs to whoever spawns it:
/// the scene (via `SceneContext::spawn`), the spawning object (via
/// `ObjectCommands::spawn`), or the system (direct registry spawn).
pub struct ObjectBuilder {
    pub(crate) z: i32,
    pub(crate) owner: Option<Owner>,
    pub(crate) hit_rect: Option<Rect>,
    pub(crate) callbacks: Callbacks,
}

impl ObjectBuilder {
    pub fn new(z: i32) -> Self {
        Self {
            z,
            owner: None,
            hit_rect: None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn hit_rect(mut self, rect: Rect) -> Self {
        self.hit_rect = Some(rect);
        self
    }

    pub fn on_update(
        mut self,
        f: impl FnMut(&mut ObjectState, &FrameInfo, &mut ObjectCommands) + 'static,
    ) -> Self {
        self.callbacks.update = Some(Box::new(f));
        self
    }

    pub fn on_draw(mut self, f: impl FnMut(&ObjectState, &FrameInfo, &mut dyn Canvas) + 'static) -> Self {
        self.callbacks.draw = Some(Box::new(f));
        self
    }

    /// Click handler; return `true` to consume the click.
    pub fn on_click(
        mut self,
        f: impl FnMut(&mut ObjectState, &PointerEvent, &mut ObjectCommands) -> bool + 'static,
    ) -> Self {
        self.callbacks.click = Some(Box::new(f));
        self
    }

    pub fn on_hover_start(mut self, f: impl FnMut(&mut ObjectState, &mut ObjectCommands) + 'static) -> Self {
        self.callbacks.hover_start = Some(Box::new(f));
        self
    }

    pub fn on_hover_end(mut self, f: impl FnMut(&mut ObjectState, &mut ObjectCommands) + 'static) -> Self {
        self.callbacks.hover_end = Some(Box::new(f));
        self
    }

    pub(crate) fn or_owner(mut self, owner: Owner) -> Self {
        self.owner.get_or_insert(owner);
        self
    }
}

//=== ObjectCommands ======================================================

/// Deferred registry mutations requested from inside a pass.
///
/// Destroys are applied as soon as the current callback returns; spawned
/// objects join the registry on the next tick.
pub struct ObjectCommands {
    next_id: u64,
    current: Option<ObjectId>,
    owner: Owner,
    pub(crate) spawns: Vec<(ObjectId, ObjectBuilder)>,
    pub(crate) destroys: Vec<ObjectId>,
}

impl ObjectCommands {
    pub(crate) fn new(next_id: u64) -> Self {
        Self {
            next_id,
            current: None,
            owner: Owner::System,
            spawns: Vec::new(),
            destroys: Vec::new(),
        }
    }

    pub(crate) fn bind(&mut self, state: &ObjectState) {
        self.current = Some(state.id());
        self.owner = state.owner();
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Queues an object for the next tick. Inherits the calling object's
    /// owner unless the builder sets one.
    pub fn spawn(&mut self, builder: ObjectBuilder) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.spawns.push((id, builder.or_owner(self.owner)));
        id
    }

    pub fn destroy(&mut self, id: ObjectId) {
        self.destroys.push(id);
    }

    /// Destroys the object whose callback is running.
    pub fn destroy_self(&mut self) {
        if let Some(id) = self.current {
            self.destroys.push(id);
        }
    }
}
