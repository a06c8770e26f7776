//=========================================================================
// Scene Factory
//=========================================================================
//
// Builds fresh instances of the initial scene for startup and for soft
// resets.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::platform_bridge::ProfileFlags;

//=== SceneFactory ========================================================

type SceneConstructor = Box<dyn Fn() -> Box<dyn Scene>>;

/// Constructors for the main scene and the optional first-run onboarding.
pub struct SceneFactory {
    main: SceneConstructor,
    onboarding: Option<SceneConstructor>,
}

impl SceneFactory {
    pub fn new<S: Scene + 'static>(main: impl Fn() -> S + 'static) -> Self {
        Self {
            main: Box::new(move || -> Box<dyn Scene> { Box::new(main()) }),
            onboarding: None,
        }
    }

    /// Scene entered instead of the main one until the profile reports
    /// first-run setup as complete.
    pub fn with_onboarding<S: Scene + 'static>(mut self, onboarding: impl Fn() -> S + 'static) -> Self {
        self.onboarding = Some(Box::new(move || -> Box<dyn Scene> { Box::new(onboarding()) }));
        self
    }

    /// A fresh main scene.
    pub fn main(&self) -> Box<dyn Scene> {
        (self.main)()
    }

    /// A fresh instance of the scene the runtime should start in.
    pub fn initial(&self, profile: &dyn ProfileFlags) -> Box<dyn Scene> {
        match &self.onboarding {
            Some(onboarding) if !profile.first_run_complete() => {
                debug!(target: "scene", "First run not completed, entering onboarding");
                onboarding()
            }
            _ => self.main(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
