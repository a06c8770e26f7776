//=========================================================================
// Tween System
//=========================================================================
//
// Named and anonymous interpolation tasks stepped once per frame.
//
// Architecture:
//   TweenBuilder<V> ──start()──> TweenScheduler ──tick(dt)──> sink(V)
//                                      │
//                                      └─ names: cancel-old-then-insert
//
// Supported value kinds: scalars (f32), 2D vectors (glam::Vec2) and RGBA
// colors. Curves come from the fixed `Easing` table.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod easing;
mod scheduler;
mod value;

//=== Public API ==========================================================

pub use easing::Easing;
pub use scheduler::{TweenBuilder, TweenCallback, TweenHandle, TweenScheduler};
pub use value::{TweenValue, Tweenable};
