//=========================================================================
// Cadence Runtime: Library Root
//
// Frame-driven scene, transition, interactive-object and tween runtime
// for rhythm-game clients.
//
// Responsibilities:
// - Expose the runtime (`Runtime`) and the windowed host (`Engine`)
// - Keep the Winit integration (`platform`) hidden from end users
// - Separate the single-threaded runtime from OS integration
//
// Typical usage:
// ```no_run
// use cadence_runtime::prelude::*;
//
// fn main() -> Result<(), PlatformError> {
//     EngineBuilder::new().build().run(|config| {
//         Runtime::new(config, HostServices::headless(), SceneFactory::new(|| Menu))
//     })
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the runtime itself: scenes, transition, objects, tweens,
// input digest and host traits. It is fully usable without a window.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the Winit window and event loop; `engine` wires it to
// the core thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::runtime::Runtime;
pub use engine::{Engine, EngineBuilder};
