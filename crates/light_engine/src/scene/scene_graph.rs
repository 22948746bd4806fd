//! Scene graph trait and node types
//!
//! The light systems never own the scene hierarchy. They create and link
//! nodes and register models through this trait, so any hierarchy
//! implementation can sit behind it.

use thiserror::Error;

use crate::foundation::collections::{ModelId, NodeHandle};
use crate::scene::model::Model;

/// Types of lights a light node can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Directional light (like sunlight) with parallel rays
    Directional,
    /// Point light that radiates in all directions from a position
    Point,
    /// Spot light that creates a cone of light from a position
    Spot,
}

/// What a scene node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An addressable game entity that components attach to
    Entity,
    /// A light source owned by a light component
    Light(LightType),
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live node
    #[error("Scene node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// The node already has a parent and cannot be attached again
    #[error("Node {child:?} is already a child of {parent:?}")]
    AlreadyParented {
        /// Node being attached
        child: NodeHandle,
        /// Its current parent
        parent: NodeHandle,
    },

    /// The node is not a child of the given parent
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Node being detached
        child: NodeHandle,
        /// Parent it was expected under
        parent: NodeHandle,
    },

    /// A node cannot be attached beneath itself or its own descendants
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Node being attached
        child: NodeHandle,
        /// Requested parent
        parent: NodeHandle,
    },

    /// The model id is not registered with the scene
    #[error("Model not registered: {0:?}")]
    ModelNotRegistered(ModelId),
}

/// Result alias for scene graph operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Hierarchy and model registry consumed by component systems
///
/// Nodes are referenced by [`NodeHandle`]; parent/child links are stored as
/// handles by the implementation. A node has at most one parent.
pub trait SceneGraph {
    /// Create a detached node
    fn create_node(&mut self, name: &str, kind: NodeKind) -> NodeHandle;

    /// Destroy a node
    ///
    /// An attached node is unlinked from its parent first. Children of the
    /// destroyed node become roots.
    fn destroy_node(&mut self, node: NodeHandle) -> SceneResult<()>;

    /// Attach `child` beneath `parent`
    fn attach_child(&mut self, parent: NodeHandle, child: NodeHandle) -> SceneResult<()>;

    /// Detach `child` from `parent`
    fn detach_child(&mut self, parent: NodeHandle, child: NodeHandle) -> SceneResult<()>;

    /// Register a model so the renderer picks it up
    fn register_model(&mut self, model: Model) -> ModelId;

    /// Remove a model from the registry, handing it back to the caller
    fn deregister_model(&mut self, id: ModelId) -> SceneResult<Model>;

    /// Look up a registered model
    fn model(&self, id: ModelId) -> Option<&Model>;

    /// Whether the handle refers to a live node
    fn contains(&self, node: NodeHandle) -> bool;

    /// Parent of a node, if it has one
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// Children of a node in attachment order
    fn children(&self, node: NodeHandle) -> &[NodeHandle];

    /// Name given to a node at creation
    fn node_name(&self, node: NodeHandle) -> Option<&str>;

    /// Kind given to a node at creation
    fn node_kind(&self, node: NodeHandle) -> Option<NodeKind>;

    /// Number of models currently registered
    fn model_count(&self) -> usize;

    /// Number of direct children of a node
    fn child_count(&self, node: NodeHandle) -> usize {
        self.children(node).len()
    }
}
