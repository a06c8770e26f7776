//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cadence_runtime::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine and runtime
pub use crate::core::runtime::Runtime;
pub use crate::core::TickControl;
pub use crate::engine::{Engine, EngineBuilder};

// Configuration and errors
pub use crate::core::config::{RuntimeConfig, TransitionTimings};
pub use crate::core::error::{HostError, SceneError};
pub use crate::core::platform_bridge::PlatformError;

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Geometry
pub use crate::core::geometry::{Rect, Rgba, Viewport};

// Host services
pub use crate::core::platform_bridge::{AudioOutput, Canvas, HostServices, ProfileFlags};

// Input
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

// Scene system
pub use crate::core::scene::{
    Capabilities, HookPoll, NavigateOptions, Navigator, Scene, SceneContext, SceneFactory,
    SceneId, TransitionPhase,
};

// Objects
pub use crate::core::objects::{FrameInfo, ObjectBuilder, ObjectCommands, ObjectId, ObjectState, Owner};

// Math
pub use glam::Vec2;

// Tweens
pub use crate::core::tween::{Easing, TweenBuilder, TweenHandle, Tweenable};
