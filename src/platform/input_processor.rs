//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit window events into runtime InputEvents and routes them
// to the discrete or continuous side of the input buffer.
//
// Architecture:
//   WindowEvent → InputProcessor → Routed::{Discrete, Continuous} → InputBuffer
//
// Stateful modifier tracking: caches modifier state from ModifiersChanged
// and stamps it on every key/button event. OS key repeats are dropped;
// held keys are tracked by the runtime's InputState. Unmapped keys
// (F13-F24, media keys) are filtered.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Routed ==============================================================

/// An input event tagged with the buffer side it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Routed {
    /// Key or button transition; order matters.
    Discrete(InputEvent),
    /// Cursor position; only the latest per frame matters.
    Continuous(InputEvent),
}

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Converts one window event. `None` for events that carry no input
    /// (or only update modifier state).
    pub(crate) fn process_window_event(&mut self, event: &WindowEvent) -> Option<Routed> {
        match event {
            WindowEvent::ModifiersChanged(state) => {
                self.update_modifiers(state.state());
                None
            }
            WindowEvent::CursorMoved { position, .. } => Some(Routed::Continuous(InputEvent::MouseMoved {
                x: position.x as f32,
                y: position.y as f32,
            })),
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let PhysicalKey::Code(code) = key_event.physical_key else {
                    return None;
                };
                self.key_transition(KeyCode::from(code), key_event.state, key_event.repeat)
                    .map(Routed::Discrete)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                Some(Routed::Discrete(self.button_transition(MouseButton::from(*button), *state)))
            }
            _ => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_transition(&self, key: KeyCode, state: ElementState, repeat: bool) -> Option<InputEvent> {
        if repeat || key == KeyCode::Unidentified {
            return None;
        }
        let modifiers = self.current_modifiers;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }

    fn button_transition(&self, button: MouseButton, state: ElementState) -> InputEvent {
        let modifiers = self.current_modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Maps A-Z, 0-9, arrows and the keys menus use. Anything else becomes
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Back/Forward/Other collapse into `MouseButton::Other`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        if shift { state.insert(ModifiersState::SHIFT); }
        if ctrl { state.insert(ModifiersState::CONTROL); }
        if alt { state.insert(ModifiersState::ALT); }
        state
    }

    #[test]
    fn starts_with_no_modifiers() {
        let processor = InputProcessor::new();
        assert_eq!(processor.current_modifiers(), Modifiers::NONE);
    }

    #[test]
    fn key_transitions_carry_cached_modifiers() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, true, false));

        let down = processor.key_transition(KeyCode::KeyS, ElementState::Pressed, false);
        let up = processor.key_transition(KeyCode::KeyS, ElementState::Released, false);

        let modifiers = Modifiers { shift: true, ctrl: true, alt: false };
        assert_eq!(down, Some(InputEvent::KeyDown { key: KeyCode::KeyS, modifiers }));
        assert_eq!(up, Some(InputEvent::KeyUp { key: KeyCode::KeyS, modifiers }));
    }

    #[test]
    fn key_repeats_are_dropped() {
        let processor = InputProcessor::new();
        assert!(processor.key_transition(KeyCode::KeyD, ElementState::Pressed, true).is_none());
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        let processor = InputProcessor::new();
        let key = KeyCode::from(WinitKeyCode::F13);
        assert_eq!(key, KeyCode::Unidentified);
        assert!(processor.key_transition(key, ElementState::Pressed, false).is_none());
    }

    #[test]
    fn button_transition_has_modifiers() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(false, false, true));

        let event = processor.button_transition(MouseButton::Left, ElementState::Pressed);

        assert_eq!(
            event,
            InputEvent::MouseButtonDown { button: MouseButton::Left, modifiers: Modifiers::ALT }
        );
    }

    #[test]
    fn keycode_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::Digit7), KeyCode::Digit7);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
