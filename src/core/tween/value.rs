//=========================================================================
// Tween Values
//=========================================================================
//
// Value kinds a tween can interpolate and the per-kind lerp rule.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::geometry::Rgba;

//=== TweenValue ==========================================================

/// A tweened value, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    Vec2(Vec2),
    Color(Rgba),
}

impl TweenValue {
    /// Interpolates towards `to` by `t`.
    ///
    /// Scalars lerp linearly, vectors and colors component-wise (alpha
    /// included). Kinds always match for tasks built through
    /// [`TweenBuilder`](super::TweenBuilder); a mismatch keeps `self`.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        match (self, to) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Vec2(a), Self::Vec2(b)) => Self::Vec2(a.lerp(b, t)),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(b, t)),
            (a, _) => a,
        }
    }
}

//=== Tweenable ===========================================================

/// Types a [`TweenBuilder`](super::TweenBuilder) can be parameterized with.
pub trait Tweenable: Copy + Into<TweenValue> + 'static {
    /// Recovers the typed value, `None` if the kind does not match.
    fn from_value(value: TweenValue) -> Option<Self>;
}

impl From<f32> for TweenValue {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec2> for TweenValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Rgba> for TweenValue {
    fn from(v: Rgba) -> Self {
        Self::Color(v)
    }
}

impl Tweenable for f32 {
    fn from_value(value: TweenValue) -> Option<Self> {
        match value {
            TweenValue::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

impl Tweenable for Vec2 {
    fn from_value(value: TweenValue) -> Option<Self> {
        match value {
            TweenValue::Vec2(v) => Some(v),
            _ => None,
        }
    }
}

impl Tweenable for Rgba {
    fn from_value(value: TweenValue) -> Option<Self> {
        match value {
            TweenValue::Color(v) => Some(v),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
