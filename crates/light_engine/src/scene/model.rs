//! Models registered with the scene
//!
//! A model ties a node subtree to the lights and mesh instances the renderer
//! should draw for it. Buffers are referenced by handle; the material is
//! shared through `Rc` so many instances can point at one definition.

use std::rc::Rc;

use crate::foundation::collections::{BufferHandle, NodeHandle};
use crate::render::Material;

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// Independent line segments, two indices each
    Lines,
}

/// Draw range of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    /// Topology
    pub kind: PrimitiveType,
    /// First index (or vertex) drawn
    pub base: usize,
    /// Number of indices (or vertices) drawn
    pub count: usize,
    /// Whether the index buffer is used
    pub indexed: bool,
}

/// Geometry bound for drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    /// Vertex storage
    pub vertex_buffer: BufferHandle,
    /// Index storage
    pub index_buffer: BufferHandle,
    /// Draw range
    pub primitive: Primitive,
}

/// A mesh placed in the scene at a node, drawn with a material
#[derive(Debug, Clone)]
pub struct MeshInstance {
    /// Node providing the world transform
    pub node: NodeHandle,
    /// Geometry
    pub mesh: Mesh,
    /// Shared material
    pub material: Rc<Material>,
}

/// Renderable bundle registered with the scene
#[derive(Debug, Clone)]
pub struct Model {
    /// Root of the model's node subtree
    pub graph: NodeHandle,
    /// Light nodes contributed by the model
    pub lights: Vec<NodeHandle>,
    /// Drawable instances
    pub mesh_instances: Vec<MeshInstance>,
}

impl Model {
    /// Model rooted at `graph` with nothing to draw yet
    pub fn new(graph: NodeHandle) -> Self {
        Self {
            graph,
            lights: Vec::new(),
            mesh_instances: Vec::new(),
        }
    }

    /// Add a light node
    pub fn with_light(mut self, light: NodeHandle) -> Self {
        self.lights.push(light);
        self
    }

    /// Add a mesh instance
    pub fn with_mesh_instance(mut self, instance: MeshInstance) -> Self {
        self.mesh_instances.push(instance);
        self
    }
}
