//=========================================================================
// Input System
//=========================================================================
//
// Platform-neutral input events and the per-frame input digest.
//
// Architecture:
//   Platform → Vec<Vec<InputEvent>> → InputState::digest_frame()
//                                        ├─ held keys / buttons
//                                        ├─ keys pressed this frame
//                                        └─ clicks at logical cursor
//
// The runtime decides what reaches scenes and objects: while a
// transition, a pending scene activation or a modal flag blocks input,
// the digest still runs but nothing is dispatched.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod input_state;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use input_state::InputState;
