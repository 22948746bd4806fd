//! Scene management
//!
//! Component systems talk to the scene through [`SceneGraph`]: they create
//! nodes, link them under entities and register models for the renderer.
//!
//! ```text
//! Component system
//!      ↓  attach_child / register_model
//! SceneGraph (hierarchy + model registry)
//!      ↓
//! Renderer
//! ```

mod hierarchy;
mod model;
mod scene_graph;

pub use hierarchy::HierarchyGraph;
pub use model::{Mesh, MeshInstance, Model, Primitive, PrimitiveType};
pub use scene_graph::{LightType, NodeKind, SceneError, SceneGraph, SceneResult};
