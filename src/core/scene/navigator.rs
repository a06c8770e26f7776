//=========================================================================
// Navigator
//=========================================================================
//
// Queue for scene navigation requests.
//
// Scenes, object callbacks and tween completions hold a cloned
// `Navigator` and push requests here. The scene manager drains the queue
// at the start of every tick and applies the requests in order.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::warn;

//=== Internal Dependencies ===============================================

use super::Scene;

//=== NavigateOptions =====================================================

/// How to switch to a new scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Fade through the overlay instead of swapping on the spot.
    pub with_transition: bool,

    /// Stack the current scene (pause) instead of destroying it.
    pub pause_current: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            with_transition: true,
            pause_current: false,
        }
    }
}

//=== SceneRequest ========================================================

/// A queued navigation request.
pub enum SceneRequest {
    GoTo {
        scene: Box<dyn Scene>,
        options: NavigateOptions,
    },
    Back {
        with_transition: bool,
    },
    Restart,
}

impl std::fmt::Debug for SceneRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoTo { scene, options } => f
                .debug_struct("GoTo")
                .field("scene", &scene.name())
                .field("options", options)
                .finish(),
            Self::Back { with_transition } => {
                f.debug_struct("Back").field("with_transition", with_transition).finish()
            }
            Self::Restart => f.write_str("Restart"),
        }
    }
}

//=== Navigator ===========================================================

/// Cloneable handle for requesting scene changes.
#[derive(Clone)]
pub struct Navigator {
    sender: Sender<SceneRequest>,
}

impl Navigator {
    /// Creates a navigator and the receiving end the manager drains.
    pub(crate) fn channel() -> (Self, Receiver<SceneRequest>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    /// Goes to `scene` with a transition, destroying the current scene.
    pub fn go_to(&self, scene: impl Scene + 'static) {
        self.go_to_with(scene, NavigateOptions::default());
    }

    pub fn go_to_with(&self, scene: impl Scene + 'static, options: NavigateOptions) {
        self.send(SceneRequest::GoTo { scene: Box::new(scene), options });
    }

    /// Returns to the most recently paused scene, with a transition.
    pub fn back(&self) {
        self.send(SceneRequest::Back { with_transition: true });
    }

    pub fn back_with(&self, with_transition: bool) {
        self.send(SceneRequest::Back { with_transition });
    }

    /// Soft-resets the whole runtime to its initial scene.
    pub fn restart(&self) {
        self.send(SceneRequest::Restart);
    }

    fn send(&self, request: SceneRequest) {
        if let Err(e) = self.sender.send(request) {
            warn!(target: "scene", "Scene manager gone, dropping {:?}", e.into_inner());
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator").field("queued", &self.sender.len()).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
