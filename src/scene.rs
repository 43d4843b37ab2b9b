//! Hook into the presentation layer.
//!
//! Starting a level hands a scene name to the launcher and returns right away;
//! the catalog never waits on or cancels the transition.

pub trait SceneLauncher {
    fn launch(&self, scene: &str);
}

impl<F> SceneLauncher for F
where
    F: Fn(&str),
{
    fn launch(&self, scene: &str) {
        self(scene)
    }
}

/// Launcher for headless hosts; logs the request and does nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLauncher;

impl SceneLauncher for NoopLauncher {
    fn launch(&self, scene: &str) {
        tracing::debug!(scene, "scene transition requested (headless)");
    }
}
