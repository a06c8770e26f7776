//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit) and host backends with the core.
//
// This module defines the contract between platform implementations and
// core logic, so backends can be swapped without touching the runtime.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and buffering
// - `host`: Draw, audio and profile services the runtime consumes
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub mod host;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use host::{AudioOutput, Canvas, HostServices, NullAudio, NullCanvas, ProfileFlags, StaticProfile};
pub use interface::PlatformError;

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
pub(crate) use interface::{PlatformCommand, PlatformEvent};
