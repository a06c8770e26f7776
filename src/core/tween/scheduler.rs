//=========================================================================
// Tween Scheduler
//=========================================================================
//
// Runs timed interpolation tasks, one step per frame tick.
//
// Architecture:
//   TweenScheduler
//     ├─ tasks: Vec<TweenTask>     (creation order)
//     ├─ names: HashMap<String, id>
//     └─ finishing: ids completed this tick, callbacks not yet run
//
// Flow per tick:
//   now += dt → step every running task → sink(value)
//     → retire completed tasks → fire their on_end callbacks
//
// A completed task whose callbacks have not run yet can still be
// cancelled by an earlier task's on_end; its callbacks are then skipped.
//
// on_end callbacks receive the scheduler itself, so they can chain new
// tweens. Those start counting from the current clock and get their
// first step on the following tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::easing::Easing;
use super::value::{TweenValue, Tweenable};

//=== Types ===============================================================

/// Receives the interpolated value every tick.
type ValueSink = Box<dyn FnMut(TweenValue)>;

/// Runs once when a tween completes (never on cancel).
pub type TweenCallback = Box<dyn FnOnce(&mut TweenScheduler)>;

/// Identity of a started tween, anonymous or named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenHandle(u64);

//=== TweenBuilder ========================================================

/// Describes a tween before it is handed to [`TweenScheduler::start`].
///
/// ```ignore
/// scheduler.start(
///     TweenBuilder::new(0.0_f32, 1.0, 0.35)
///         .named("menu.fade")
///         .easing(Easing::OutCubic)
///         .on_update(move |alpha| *panel_alpha.borrow_mut() = alpha),
/// );
/// ```
pub struct TweenBuilder<V: Tweenable> {
    name: Option<String>,
    from: V,
    to: V,
    duration: f64,
    easing: Easing,
    sink: Option<Box<dyn FnMut(V)>>,
    on_end: Vec<TweenCallback>,
}

impl<V: Tweenable> TweenBuilder<V> {
    /// Creates an anonymous, linear tween from `from` to `to` over
    /// `duration` seconds.
    pub fn new(from: V, to: V, duration: f64) -> Self {
        Self {
            name: None,
            from,
            to,
            duration,
            easing: Easing::Linear,
            sink: None,
            on_end: Vec::new(),
        }
    }

    /// Registers the tween under `name`, replacing any active one.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the value sink invoked every tick with the interpolated value.
    pub fn on_update(mut self, sink: impl FnMut(V) + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Adds a completion callback. May be called several times.
    pub fn on_end(mut self, callback: impl FnOnce(&mut TweenScheduler) + 'static) -> Self {
        self.on_end.push(Box::new(callback));
        self
    }
}

//=== TweenTask ===========================================================

struct TweenTask {
    id: u64,
    name: Option<String>,
    from: TweenValue,
    to: TweenValue,
    duration: f64,
    easing: Easing,
    started_at: f64,
    /// Elapsed time captured at pause, `None` while running.
    paused_elapsed: Option<f64>,
    current: TweenValue,
    completed: bool,
    sink: ValueSink,
    on_end: Vec<TweenCallback>,
}

impl TweenTask {
    fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0) as f32
    }

    /// Applies one step; returns `true` once the end value was reached.
    fn step(&mut self, now: f64) -> bool {
        let progress = self.progress(now);
        self.current = self.from.lerp(self.to, self.easing.apply(progress));
        (self.sink)(self.current);
        progress >= 1.0
    }
}

//=== TweenScheduler ======================================================

/// Registry of active tweens driven by the frame tick.
pub struct TweenScheduler {
    now: f64,
    next_id: u64,
    tasks: Vec<TweenTask>,
    names: HashMap<String, u64>,
    finishing: Vec<u64>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            tasks: Vec::new(),
            names: HashMap::new(),
            finishing: Vec::new(),
        }
    }

    //--- Creation ---------------------------------------------------------

    /// Starts a tween.
    ///
    /// A named tween first cancels any active tween with the same name
    /// (its `on_end` callbacks do not fire). A duration `<= 0` completes
    /// on the spot: the sink receives the end value and `on_end` fires
    /// before this returns.
    pub fn start<V: Tweenable>(&mut self, builder: TweenBuilder<V>) -> TweenHandle {
        let TweenBuilder { name, from, to, duration, easing, sink, on_end } = builder;

        if let Some(name) = &name {
            if self.cancel(name) {
                debug!(target: "tween", "Restarting tween '{}'", name);
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        let mut typed_sink = sink;
        let sink: ValueSink = Box::new(move |value: TweenValue| {
            if let (Some(sink), Some(value)) = (typed_sink.as_mut(), V::from_value(value)) {
                sink(value);
            }
        });

        let mut task = TweenTask {
            id,
            name,
            from: from.into(),
            to: to.into(),
            duration,
            easing,
            started_at: self.now,
            paused_elapsed: None,
            current: from.into(),
            completed: false,
            sink,
            on_end,
        };

        if duration <= 0.0 {
            trace!(target: "tween", "Tween {} has no duration, completing now", id);
            task.step(self.now);
            for callback in std::mem::take(&mut task.on_end) {
                callback(self);
            }
            return TweenHandle(id);
        }

        if let Some(name) = &task.name {
            self.names.insert(name.clone(), id);
        }
        self.tasks.push(task);
        TweenHandle(id)
    }

    /// Convenience form of [`start`](Self::start) mirroring the classic
    /// `create(id?, from, to, duration, sink, easing?)` call.
    pub fn create<V: Tweenable>(
        &mut self,
        name: Option<&str>,
        from: V,
        to: V,
        duration: f64,
        sink: impl FnMut(V) + 'static,
        easing: Option<Easing>,
    ) -> TweenHandle {
        let mut builder = TweenBuilder::new(from, to, duration)
            .easing(easing.unwrap_or_default())
            .on_update(sink);
        if let Some(name) = name {
            builder = builder.named(name);
        }
        self.start(builder)
    }

    //--- Control ----------------------------------------------------------

    /// Removes a named tween without firing its completion callbacks.
    ///
    /// Returns `false` if no active tween has that name.
    pub fn cancel(&mut self, name: &str) -> bool {
        match self.names.remove(name) {
            Some(id) => self.remove_task(id),
            None => false,
        }
    }

    /// Removes a tween by handle without firing its completion callbacks.
    pub fn cancel_handle(&mut self, handle: TweenHandle) -> bool {
        self.names.retain(|_, id| *id != handle.0);
        self.remove_task(handle.0)
    }

    /// Freezes a named tween's elapsed time. No-op if already paused.
    pub fn pause(&mut self, name: &str) -> bool {
        let now = self.now;
        match self.task_mut(name) {
            Some(task) => {
                if task.paused_elapsed.is_none() {
                    task.paused_elapsed = Some(now - task.started_at);
                }
                true
            }
            None => false,
        }
    }

    /// Continues a paused tween by re-basing its start time.
    pub fn resume(&mut self, name: &str) -> bool {
        let now = self.now;
        match self.task_mut(name) {
            Some(task) => {
                if let Some(elapsed) = task.paused_elapsed.take() {
                    task.started_at = now - elapsed;
                }
                true
            }
            None => false,
        }
    }

    /// Cancels every tween. Completion callbacks do not fire.
    pub fn reset_all(&mut self) {
        if !self.tasks.is_empty() {
            debug!(target: "tween", "Cancelling {} active tweens", self.tasks.len());
        }
        self.tasks.clear();
        self.names.clear();
        self.finishing.clear();
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_active(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn is_paused(&self, name: &str) -> bool {
        self.task(name).is_some_and(|t| t.paused_elapsed.is_some())
    }

    /// Last value applied by a named tween.
    pub fn current_value(&self, name: &str) -> Option<TweenValue> {
        self.task(name).map(|t| t.current)
    }

    /// Typed variant of [`current_value`](Self::current_value).
    pub fn current<V: Tweenable>(&self, name: &str) -> Option<V> {
        self.current_value(name).and_then(V::from_value)
    }

    /// Number of active tweens, anonymous ones included.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Scheduler clock in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    //--- Tick -------------------------------------------------------------

    /// Advances the clock by `dt` seconds and steps every running tween.
    pub fn tick(&mut self, dt: f64) {
        self.now += dt;
        let now = self.now;

        for task in self.tasks.iter_mut() {
            if task.paused_elapsed.is_none() && task.step(now) {
                task.completed = true;
            }
        }

        if !self.tasks.iter().any(|t| t.completed) {
            return;
        }

        let mut finished = Vec::new();
        let mut index = 0;
        while index < self.tasks.len() {
            if !self.tasks[index].completed {
                index += 1;
                continue;
            }
            let task = self.tasks.remove(index);
            self.finishing.push(task.id);
            finished.push((task.id, task.name, task.on_end));
        }

        for (id, name, on_end) in finished {
            let Some(position) = self.finishing.iter().position(|&f| f == id) else {
                trace!(target: "tween", "Tween {} cancelled before its completion callbacks", id);
                continue;
            };
            self.finishing.swap_remove(position);
            if let Some(name) = &name {
                if self.names.get(name) == Some(&id) {
                    self.names.remove(name);
                }
            }
            trace!(target: "tween", "Tween {} completed", id);
            for callback in on_end {
                callback(self);
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn task(&self, name: &str) -> Option<&TweenTask> {
        let id = *self.names.get(name)?;
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, name: &str) -> Option<&mut TweenTask> {
        let id = *self.names.get(name)?;
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn remove_task(&mut self, id: u64) -> bool {
        if let Some(position) = self.finishing.iter().position(|&f| f == id) {
            self.finishing.swap_remove(position);
            return true;
        }
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
