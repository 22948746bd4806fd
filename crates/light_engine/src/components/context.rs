//! Collaborators handed to component systems

use crate::core::config::{LightEngineConfig, RunMode};
use crate::render::GraphicsDevice;
use crate::scene::SceneGraph;

/// Scene, device and settings a component system works against
///
/// Systems borrow the context per call instead of holding on to it, so the
/// same scene and device can serve several systems.
pub struct SystemContext<S: SceneGraph, D: GraphicsDevice> {
    /// Scene hierarchy and model registry
    pub scene: S,
    /// Buffer allocation and mapping
    pub device: D,
    /// Session settings
    pub config: LightEngineConfig,
}

impl<S: SceneGraph, D: GraphicsDevice> SystemContext<S, D> {
    /// Bundle collaborators with settings
    pub fn new(scene: S, device: D, config: LightEngineConfig) -> Self {
        Self { scene, device, config }
    }

    /// Current run mode
    pub fn run_mode(&self) -> RunMode {
        self.config.run_mode
    }

    /// True inside an editing session
    pub fn is_editing(&self) -> bool {
        self.config.run_mode.is_editing()
    }
}
