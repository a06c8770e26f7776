//=========================================================================
// Host Services
//=========================================================================
//
// Narrow traits for the collaborators the runtime consumes but does not
// implement: the draw surface, the audio backend and persisted profile
// flags.
//
// The runtime only needs:
// - `Canvas::fill_rect` (overlay and object drawing)
// - `AudioOutput::stop_all` (full reset and shutdown)
// - `ProfileFlags::first_run_complete` (onboarding vs main scene)
//
// `HostServices::headless()` plugs null implementations for tests and
// windowless runs.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::error::HostError;
use crate::core::geometry::{Rect, Rgba};

//=== Canvas ==============================================================

/// Draw surface in logical coordinates.
///
/// Backends map logical units to pixels through the viewport; rectangles
/// may extend into the letterbox bars (negative or oversized coordinates).
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
}

//=== AudioOutput =========================================================

pub trait AudioOutput {
    /// Stops every playing sound.
    fn stop_all(&mut self) -> Result<(), HostError>;
}

//=== ProfileFlags ========================================================

/// Persisted per-user flags.
pub trait ProfileFlags {
    /// Whether the first-run onboarding has been completed.
    fn first_run_complete(&self) -> bool;
}

//=== Null Implementations ================================================

/// Canvas that discards every draw call.
#[derive(Debug, Default)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn fill_rect(&mut self, _rect: Rect, _color: Rgba) {}
}

/// Audio backend with nothing to stop.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioOutput for NullAudio {
    fn stop_all(&mut self) -> Result<(), HostError> {
        Ok(())
    }
}

/// Profile with a fixed first-run flag.
#[derive(Debug, Clone, Copy)]
pub struct StaticProfile {
    pub first_run_complete: bool,
}

impl ProfileFlags for StaticProfile {
    fn first_run_complete(&self) -> bool {
        self.first_run_complete
    }
}

//=== HostServices ========================================================

/// Bundle of host collaborators handed to the runtime.
pub struct HostServices {
    pub canvas: Box<dyn Canvas>,
    pub audio: Box<dyn AudioOutput>,
    pub profile: Box<dyn ProfileFlags>,
}

impl HostServices {
    pub fn new(
        canvas: Box<dyn Canvas>,
        audio: Box<dyn AudioOutput>,
        profile: Box<dyn ProfileFlags>,
    ) -> Self {
        Self { canvas, audio, profile }
    }

    /// Null canvas and audio; first run treated as completed.
    pub fn headless() -> Self {
        Self::new(
            Box::new(NullCanvas),
            Box::new(NullAudio),
            Box::new(StaticProfile { first_run_complete: true }),
        )
    }
}
