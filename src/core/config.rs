//=========================================================================
// Runtime Configuration
//=========================================================================
//
// Code-level configuration handed to the runtime at construction time.
// `EngineBuilder` fills this in; tests build it directly.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::geometry::Rgba;

//=== TransitionTimings ===================================================

/// Durations (seconds) of the timed transition phases.
///
/// The `switching` phase has no duration: it lasts exactly as long as the
/// scene swap takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTimings {
    pub fade_in: f64,
    pub pre_hold: f64,
    pub post_hold: f64,
    pub fade_out: f64,
}

impl TransitionTimings {
    /// Sum of all timed phases.
    pub fn total(&self) -> f64 {
        self.fade_in + self.pre_hold + self.post_hold + self.fade_out
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            fade_in: 0.35,
            pre_hold: 0.1,
            post_hold: 0.1,
            fade_out: 0.35,
        }
    }
}

//=== RuntimeConfig =======================================================

/// Configuration for a [`Runtime`](crate::core::runtime::Runtime).
///
/// # Default Values
///
/// - **Logical size**: 1280x720
/// - **Transition**: 0.35s fade in, 0.1s holds, 0.35s fade out
/// - **Overlay color**: opaque black
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeConfig {
    /// Size of the logical render surface everything is laid out in.
    pub logical_size: Vec2,

    /// Phase durations of scene transitions.
    pub transition: TransitionTimings,

    /// Color painted by the transition overlay (alpha is driven).
    pub overlay_color: Rgba,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logical_size: Vec2::new(1280.0, 720.0),
            transition: TransitionTimings::default(),
            overlay_color: Rgba::BLACK,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
