//=========================================================================
// Object Registry
//=========================================================================
//
// Owns every drawable/clickable object and runs the per-tick passes.
//
// Flow (update_all):
//   merge pending spawns
//     → clicks, topmost first (first handler returning true wins)
//     → hover + update, ascending (z, id)
//     → sweep destroyed
//
// Flow (draw_all):
//   draw, ascending (z, id)   (painter's algorithm)
//
// Objects never see the collection itself: callbacks go through
// `ObjectCommands`. A destroy issued mid-pass marks the target at once so
// it leaves the rest of the pass; a spawn joins on the next tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::object::{
    Callbacks, FrameInfo, ObjectBuilder, ObjectCommands, ObjectId, ObjectState, Owner,
    PointerEvent,
};
use crate::core::geometry::Rect;
use crate::core::platform_bridge::Canvas;
use crate::core::scene::SceneId;

//=== ObjectEntry =========================================================

struct ObjectEntry {
    state: ObjectState,
    destroyed: bool,
    callbacks: Callbacks,
}

impl ObjectEntry {
    fn from_builder(id: ObjectId, builder: ObjectBuilder) -> Self {
        let owner = builder.owner.unwrap_or(Owner::System);
        Self {
            state: ObjectState::new(id, owner, builder.z, builder.hit_rect),
            destroyed: false,
            callbacks: builder.callbacks,
        }
    }

    fn is_live(&self) -> bool {
        !self.destroyed && !self.state.paused
    }

    fn owned_by(&self, scene: SceneId) -> bool {
        self.state.owner() == Owner::Scene(scene)
    }
}

//=== ObjectRegistry ======================================================

/// Z-ordered store of interactive objects.
pub struct ObjectRegistry {
    next_id: u64,
    objects: Vec<ObjectEntry>,
    /// Spawned during a pass, merged at the start of the next update.
    pending: Vec<ObjectEntry>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            objects: Vec::new(),
            pending: Vec::new(),
        }
    }

    //--- Creation ---------------------------------------------------------

    /// Creates a bare object with no callbacks.
    ///
    /// `owner == None` places it outside scene lifecycle.
    pub fn create(&mut self, z: i32, owner: Option<SceneId>, hit_rect: Option<Rect>) -> ObjectId {
        let mut builder = ObjectBuilder::new(z);
        builder.hit_rect = hit_rect;
        builder.owner = Some(owner.map_or(Owner::System, Owner::Scene));
        self.spawn(builder)
    }

    /// Adds an object. Without an explicit owner it is a system object.
    pub fn spawn(&mut self, builder: ObjectBuilder) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let entry = ObjectEntry::from_builder(id, builder);
        trace!(target: "objects", "Spawned {:?} (z {}, {:?})", id, entry.state.z, entry.state.owner());
        self.objects.push(entry);
        id
    }

    //--- Removal ----------------------------------------------------------

    /// Removes one object. Unknown or already-destroyed ids are ignored.
    pub fn destroy(&mut self, id: ObjectId) {
        self.objects.retain(|e| e.state.id() != id);
        self.pending.retain(|e| e.state.id() != id);
    }

    /// Removes every object owned by `scene`; returns how many went.
    pub fn destroy_all_by_scene(&mut self, scene: SceneId) -> usize {
        let before = self.count();
        self.objects.retain(|e| !e.owned_by(scene));
        self.pending.retain(|e| !e.owned_by(scene));
        let removed = before - self.count();
        if removed > 0 {
            debug!(target: "objects", "Destroyed {} objects of {:?}", removed, scene);
        }
        removed
    }

    /// Removes every object, system objects included.
    pub fn destroy_all(&mut self) {
        debug!(target: "objects", "Destroying all {} objects", self.count());
        self.objects.clear();
        self.pending.clear();
    }

    //--- Scene Suspension -------------------------------------------------

    /// Marks every object of `scene` paused (skipped by both passes).
    pub fn pause_by_scene(&mut self, scene: SceneId) {
        self.set_scene_paused(scene, true);
    }

    pub fn resume_by_scene(&mut self, scene: SceneId) {
        self.set_scene_paused(scene, false);
    }

    fn set_scene_paused(&mut self, scene: SceneId, paused: bool) {
        for entry in self.objects.iter_mut().chain(self.pending.iter_mut()) {
            if entry.owned_by(scene) {
                entry.state.paused = paused;
            }
        }
    }

    //--- Lookup -----------------------------------------------------------

    pub fn lookup(&self, id: ObjectId) -> Option<&ObjectState> {
        self.objects
            .iter()
            .chain(self.pending.iter())
            .find(|e| e.state.id() == id && !e.destroyed)
            .map(|e| &e.state)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut ObjectState> {
        self.objects
            .iter_mut()
            .chain(self.pending.iter_mut())
            .find(|e| e.state.id() == id && !e.destroyed)
            .map(|e| &mut e.state)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.lookup(id).is_some()
    }

    /// Live objects, pending spawns included.
    pub fn count(&self) -> usize {
        self.objects.iter().chain(self.pending.iter()).filter(|e| !e.destroyed).count()
    }

    pub fn count_by_scene(&self, scene: SceneId) -> usize {
        self.objects
            .iter()
            .chain(self.pending.iter())
            .filter(|e| !e.destroyed && e.owned_by(scene))
            .count()
    }

    //--- Passes -----------------------------------------------------------

    /// Runs the update pass.
    ///
    /// `clicks` are the pointer presses of this tick and `pointer` the
    /// cursor used for hover. Pass an empty slice and `None` while input is
    /// blocked; hovered objects then receive their hover end.
    ///
    /// Only the topmost live object under the pointer is hovered.
    pub fn update_all(&mut self, frame: &FrameInfo, clicks: &[PointerEvent], pointer: Option<Vec2>) {
        self.objects.append(&mut self.pending);

        let order = self.draw_order();
        let mut commands = ObjectCommands::new(self.next_id);

        for click in clicks {
            for &index in order.iter().rev() {
                let entry = &mut self.objects[index];
                if !entry.is_live() || !entry.state.hit(click.position) {
                    continue;
                }
                let Some(on_click) = entry.callbacks.click.as_mut() else {
                    continue;
                };
                commands.bind(&entry.state);
                let consumed = on_click(&mut entry.state, click, &mut commands);
                self.apply_destroys(&mut commands);
                if consumed {
                    trace!(target: "objects", "Click at {:?} consumed by {:?}", click.position, self.objects[index].state.id());
                    break;
                }
            }
        }

        let hovered = pointer.and_then(|point| {
            order
                .iter()
                .rev()
                .copied()
                .find(|&i| self.objects[i].is_live() && self.objects[i].state.hit(point))
        });

        for &index in &order {
            let entry = &mut self.objects[index];
            if !entry.is_live() {
                continue;
            }
            commands.bind(&entry.state);

            let inside = hovered == Some(index);
            if inside != entry.state.hovered {
                entry.state.hovered = inside;
                let hook = if inside {
                    entry.callbacks.hover_start.as_mut()
                } else {
                    entry.callbacks.hover_end.as_mut()
                };
                if let Some(hook) = hook {
                    hook(&mut entry.state, &mut commands);
                }
            }

            if !entry.destroyed && !commands.destroys.contains(&entry.state.id()) {
                if let Some(update) = entry.callbacks.update.as_mut() {
                    update(&mut entry.state, frame, &mut commands);
                }
            }
            self.apply_destroys(&mut commands);
        }

        self.next_id = commands.next_id();
        for (id, builder) in commands.spawns.drain(..) {
            self.pending.push(ObjectEntry::from_builder(id, builder));
        }
        self.objects.retain(|e| !e.destroyed);
    }

    /// Runs the draw pass over live objects in ascending `(z, id)`.
    pub fn draw_all(&mut self, frame: &FrameInfo, canvas: &mut dyn Canvas) {
        for index in self.draw_order() {
            let entry = &mut self.objects[index];
            if !entry.is_live() {
                continue;
            }
            if let Some(draw) = entry.callbacks.draw.as_mut() {
                draw(&entry.state, frame, &mut *canvas);
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Indices of `objects`, ascending by `(z, id)`.
    fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.objects.len()).collect();
        order.sort_by_key(|&i| (self.objects[i].state.z, self.objects[i].state.id()));
        order
    }

    fn apply_destroys(&mut self, commands: &mut ObjectCommands) {
        for id in commands.destroys.drain(..) {
            if let Some(entry) = self.objects.iter_mut().find(|e| e.state.id() == id) {
                entry.destroyed = true;
            }
            self.pending.retain(|e| e.state.id() != id);
            commands.spawns.retain(|(spawned, _)| *spawned != id);
        }
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
