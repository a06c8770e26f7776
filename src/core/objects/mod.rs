//=========================================================================
// Interactive Objects
//=========================================================================
//
// Z-ordered registry of everything drawable or clickable on screen.
//
// Architecture:
//   ObjectRegistry
//     ├─ objects: Vec<ObjectEntry>   (state + callbacks + destroyed flag)
//     └─ pending: Vec<ObjectEntry>   (spawned mid-pass)
//
// Ownership:
//   Owner::Scene(id) objects are purged with their scene and paused with
//   it. Owner::System objects (the transition overlay) live until
//   destroyed explicitly or by a full reset.
//
//=========================================================================

//=== Module Declarations =================================================

mod object;
mod registry;

//=== Public API ==========================================================

pub use object::{
    ClickFn, DrawFn, FrameInfo, HoverFn, ObjectBuilder, ObjectCommands, ObjectId, ObjectState,
    Owner, PointerEvent, UpdateFn,
};
pub use registry::ObjectRegistry;
