//=========================================================================
// Geometry
//=========================================================================
//
// Small value types shared by the registry, the transition overlay and
// the host canvas.
//
// Coordinate spaces:
// ```text
//   Window (physical pixels)          Logical surface
//   ┌──────────────────────────┐      ┌──────────────┐
//   │ bar │   surface    │ bar │  ←→  │ 0,0 .. w,h   │
//   └──────────────────────────┘      └──────────────┘
//         offset + logical * scale
// ```
//
// Everything inside the core works in logical coordinates. The viewport
// converts cursor positions in and reports the full display rectangle
// (surface plus letterbox bars) for overlays that must cover the window.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Rect ================================================================

/// Axis-aligned rectangle in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds a rectangle from a top-left position and a size.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns `true` if `point` lies inside the rectangle.
    ///
    /// Left/top edges are inclusive, right/bottom edges exclusive, so two
    /// rectangles sharing an edge never both claim the same point.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

//=== Rgba ================================================================

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with its alpha replaced.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise linear interpolation, alpha included.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

//=== Viewport ============================================================

/// Output viewport geometry with letterboxing.
///
/// The logical render surface keeps its aspect ratio inside the window;
/// the leftover space becomes bars on two sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    logical_size: Vec2,
    window_size: Vec2,
}

impl Viewport {
    /// Creates a viewport whose window exactly matches the logical surface.
    pub fn new(logical_size: Vec2) -> Self {
        Self {
            logical_size,
            window_size: logical_size,
        }
    }

    /// Updates the physical window size (e.g. after a resize event).
    pub fn set_window_size(&mut self, window_size: Vec2) {
        self.window_size = window_size;
    }

    pub fn logical_size(&self) -> Vec2 {
        self.logical_size
    }

    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    /// Uniform logical → physical scale factor.
    pub fn scale(&self) -> f32 {
        if self.logical_size.x <= 0.0 || self.logical_size.y <= 0.0 {
            return 1.0;
        }
        let scale = (self.window_size.x / self.logical_size.x)
            .min(self.window_size.y / self.logical_size.y);
        if scale > 0.0 { scale } else { 1.0 }
    }

    /// Physical offset of the logical surface's top-left corner.
    pub fn offset(&self) -> Vec2 {
        (self.window_size - self.logical_size * self.scale()) * 0.5
    }

    /// The logical render surface, `(0, 0)` to `logical_size`.
    pub fn render_bounds(&self) -> Rect {
        Rect::from_origin_size(Vec2::ZERO, self.logical_size)
    }

    /// The entire window expressed in logical coordinates.
    ///
    /// Extends past the render surface into the letterbox bars.
    pub fn display_bounds(&self) -> Rect {
        let scale = self.scale();
        Rect::from_origin_size(-self.offset() / scale, self.window_size / scale)
    }

    /// Maps a physical window position to logical coordinates.
    pub fn to_logical(&self, physical: Vec2) -> Vec2 {
        (physical - self.offset()) / self.scale()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
