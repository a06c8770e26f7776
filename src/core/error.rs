//=========================================================================
// Error Types
//=========================================================================
//
// Errors raised by scene hooks and host collaborators.
//
// None of these escape the runtime: the scene manager and the reset path
// catch them at the call site, log them, and keep going. Only
// `PlatformError` (see `platform_bridge`) can end `Engine::run`.
//
//=========================================================================

//=== SceneError ==========================================================

/// Failure reported by a scene lifecycle hook.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// A hook could not complete (bad state, missing data, etc.).
    #[error("scene hook failed: {0}")]
    Hook(String),

    /// A resource the scene depends on could not be obtained.
    #[error("resource unavailable: {0}")]
    Resource(String),

    /// A host collaborator failed while the scene was using it.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl SceneError {
    /// Build a [`SceneError::Hook`] value.
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// Build a [`SceneError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

//=== HostError ===========================================================

/// Failure reported by an external collaborator (audio, canvas, profile).
#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error("audio backend error: {0}")]
    Audio(String),

    #[error("render backend error: {0}")]
    Render(String),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_error_display_includes_message() {
        let err = SceneError::hook("profile not loaded");
        assert_eq!(err.to_string(), "scene hook failed: profile not loaded");
    }

    #[test]
    fn host_error_converts_transparently() {
        let err: SceneError = HostError::Audio("device lost".into()).into();
        assert_eq!(err.to_string(), "audio backend error: device lost");
    }
}
