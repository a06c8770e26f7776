//=========================================================================
// Input State
//=========================================================================
//
// Per-frame digest of the platform's input batches.
//
// Tracks persistent state (held keys/buttons, cursor) plus the edges of
// the current frame (keys pressed, pointer presses). Edges are cleared at
// the start of every digest.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};
use crate::core::geometry::Viewport;
use crate::core::objects::PointerEvent;

//=== InputState ==========================================================

/// Keyboard and pointer state as seen by the runtime.
#[derive(Debug, Default)]
pub struct InputState {
    held_keys: HashSet<KeyCode>,
    held_buttons: HashSet<MouseButton>,
    modifiers: Modifiers,

    /// Last reported cursor in window pixels.
    cursor_physical: Vec2,
    /// `cursor_physical` mapped into logical space.
    cursor: Vec2,
    cursor_moved: bool,

    keys_pressed: Vec<KeyCode>,
    buttons_pressed: Vec<MouseButton>,
    clicks: Vec<PointerEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Digest -----------------------------------------------------

    /// Consumes one frame's batches.
    ///
    /// Pointer presses become [`PointerEvent`]s at the frame's final
    /// logical cursor position.
    pub fn digest_frame(&mut self, batches: &[Vec<InputEvent>], viewport: &Viewport) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
        self.clicks.clear();
        self.cursor_moved = false;

        for event in batches.iter().flatten() {
            self.apply(event);
        }

        self.refresh_cursor(viewport);
        let cursor = self.cursor;
        self.clicks.extend(
            self.buttons_pressed
                .iter()
                .map(|&button| PointerEvent { position: cursor, button }),
        );
    }

    /// Re-maps the stored cursor (e.g. after the viewport changed).
    pub fn refresh_cursor(&mut self, viewport: &Viewport) {
        self.cursor = viewport.to_logical(self.cursor_physical);
    }

    fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                if self.held_keys.insert(key) {
                    self.keys_pressed.push(key);
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                self.held_keys.remove(&key);
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = modifiers;
                if self.held_buttons.insert(button) {
                    self.buttons_pressed.push(button);
                }
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = modifiers;
                self.held_buttons.remove(&button);
            }
            InputEvent::MouseMoved { x, y } => {
                self.cursor_physical = Vec2::new(x, y);
                self.cursor_moved = true;
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held_keys.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.held_buttons.contains(&button)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Cursor in logical coordinates.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Whether the cursor moved during the last digested frame.
    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    /// Keys that went down during the last digested frame, in order.
    pub fn keys_pressed(&self) -> &[KeyCode] {
        &self.keys_pressed
    }

    /// Pointer presses of the last digested frame.
    pub fn clicks(&self) -> &[PointerEvent] {
        &self.clicks
    }

    /// Forgets everything, including held keys.
    pub fn reset(&mut self) {
        let cursor_physical = self.cursor_physical;
        let cursor = self.cursor;
        *self = Self::default();
        self.cursor_physical = cursor_physical;
        self.cursor = cursor;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
