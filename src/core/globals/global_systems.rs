//=========================================================================
// Global Systems
//=========================================================================
//
// Container for runtime-level systems with logic.
//
// Holds the scene manager and runs the per-tick pipeline over the shared
// GlobalContext.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::input::InputEvent;
use crate::core::scene::SceneManager;
use crate::core::TickControl;

//=== GlobalSystems =======================================================

/// Container for runtime logic systems.
pub struct GlobalSystems {
    /// Scene stack, transitions and navigation.
    pub scene_manager: SceneManager,
}

impl GlobalSystems {
    pub(crate) fn new(scene_manager: SceneManager) -> Self {
        Self { scene_manager }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick of the runtime.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Close check**: a latched close skips the tick entirely
    /// 2. **Clock + input**: advance time, digest the frame's input batches
    /// 3. **Dispatch**: key presses and cursor moves to the active scene
    /// 4. **Scenes**: navigation requests, transition, pending hooks, render
    /// 5. **Tweens**: step every running tween
    /// 6. **Objects**: update pass (with clicks), then draw pass
    pub(crate) fn update(
        &mut self,
        ctx: &mut GlobalContext,
        dt: f64,
        batches: &[Vec<InputEvent>],
    ) -> TickControl {
        if ctx.is_closing() {
            return TickControl::Exit;
        }

        // 1. Time and input
        ctx.clock.advance(dt);
        ctx.input.digest_frame(batches, &ctx.viewport);

        // 2. Dispatch to the active scene
        if !self.scene_manager.is_input_blocked(ctx) {
            let keys = ctx.input.keys_pressed().to_vec();
            for key in keys {
                self.scene_manager.dispatch_key(key, ctx);
            }
            if ctx.input.cursor_moved() {
                let cursor = ctx.input.cursor();
                self.scene_manager.dispatch_mouse_move(cursor, ctx);
            }
        }

        // 3. Scenes
        self.scene_manager.update(ctx);

        // 4. Tweens
        ctx.tweens.tick(ctx.clock.dt);

        // 5. Objects (clicks and hover only reach them while nothing blocks input)
        let frame = ctx.frame_info();
        let (clicks, pointer) = if self.scene_manager.is_input_blocked(ctx) {
            (Vec::new(), None)
        } else {
            (ctx.input.clicks().to_vec(), Some(frame.cursor))
        };
        ctx.objects.update_all(&frame, &clicks, pointer);
        ctx.objects.draw_all(&frame, ctx.host.canvas.as_mut());

        if ctx.is_closing() {
            TickControl::Exit
        } else {
            TickControl::Continue
        }
    }
}
