//=========================================================================
// Global Runtime State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: SceneManager + tick pipeline (owned by the runtime)
//   GlobalContext: objects, tweens, input, viewport, host (passed to scenes)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::{FrameClock, GlobalContext};
pub use global_systems::GlobalSystems;
