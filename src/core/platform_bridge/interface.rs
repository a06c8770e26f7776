//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events, commands and errors).
//
// Defines the contract for communication between platform and core
// threads:
//   platform ──PlatformEvent (crossbeam)──> core
//   core ──PlatformCommand (event loop proxy)──> platform
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform to core.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Batched input events for a frame.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window inner size changed (physical pixels).
    Resized { width: u32, height: u32 },

    /// Window close requested.
    WindowClosed,
}

//=== PlatformCommand =====================================================

/// Requests sent from core back to the platform event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlatformCommand {
    /// The runtime has shut down; close the window and leave the loop.
    Exit,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop the engine cannot run.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),

    /// The core thread panicked.
    #[error("core thread panicked")]
    CoreThreadPanicked,
}
