//! Spot light system errors

use thiserror::Error;

use crate::foundation::collections::NodeHandle;
use crate::geometry::GeometryError;
use crate::render::DeviceError;
use crate::scene::SceneError;

use super::schema::SchemaError;

/// Errors reported by [`super::SpotLightSystem`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpotLightError {
    /// The entity has no spot light component
    #[error("Entity {0:?} has no spotlight component")]
    NotFound(NodeHandle),

    /// The entity already has a spot light component
    #[error("Entity {0:?} already has a spotlight component")]
    AlreadyPresent(NodeHandle),

    /// The component was created outside an editing session and has no wireframe
    #[error("Spotlight on {0:?} has no debug mesh")]
    NoDebugMesh(NodeHandle),

    /// Editor-only operation requested at runtime
    #[error("Debug geometry is only maintained in editing mode")]
    NotEditing,

    /// Field write rejected by the schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Scene hierarchy or registry failure
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Buffer allocation or mapping failure
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Wireframe generation failure
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Result alias for spot light operations
pub type SpotLightResult<T> = Result<T, SpotLightError>;
