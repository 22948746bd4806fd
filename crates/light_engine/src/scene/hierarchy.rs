//! Arena-backed scene hierarchy
//!
//! Nodes live in a slot map and refer to each other by handle, so there are
//! no owning parent/child pointers. Registered models live in a second slot
//! map keyed by [`ModelId`].

use crate::foundation::collections::{ModelId, NodeHandle, SlotMap};
use crate::scene::model::Model;
use crate::scene::scene_graph::{NodeKind, SceneError, SceneGraph, SceneResult};

#[derive(Debug)]
struct SceneNode {
    name: String,
    kind: NodeKind,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

/// Simple hierarchy implementation of [`SceneGraph`]
#[derive(Debug, Default)]
pub struct HierarchyGraph {
    nodes: SlotMap<NodeHandle, SceneNode>,
    models: SlotMap<ModelId, Model>,
}

impl HierarchyGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn is_ancestor(&self, candidate: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == candidate {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }
}

impl SceneGraph for HierarchyGraph {
    fn create_node(&mut self, name: &str, kind: NodeKind) -> NodeHandle {
        let handle = self.nodes.insert(SceneNode {
            name: name.to_string(),
            kind,
            parent: None,
            children: Vec::new(),
        });
        log::trace!("Created node '{}' {:?}", name, handle);
        handle
    }

    fn destroy_node(&mut self, node: NodeHandle) -> SceneResult<()> {
        let removed = self.nodes.remove(node).ok_or(SceneError::NodeNotFound(node))?;
        if let Some(parent) = removed.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|&c| c != node);
        }
        for child in removed.children {
            if let Some(child) = self.nodes.get_mut(child) {
                child.parent = None;
            }
        }
        Ok(())
    }

    fn attach_child(&mut self, parent: NodeHandle, child: NodeHandle) -> SceneResult<()> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let current = self.nodes.get(child).ok_or(SceneError::NodeNotFound(child))?.parent;
        if let Some(existing) = current {
            return Err(SceneError::AlreadyParented { child, parent: existing });
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { child, parent });
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    fn detach_child(&mut self, parent: NodeHandle, child: NodeHandle) -> SceneResult<()> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let node = self.nodes.get_mut(child).ok_or(SceneError::NodeNotFound(child))?;
        if node.parent != Some(parent) {
            return Err(SceneError::NotAChild { child, parent });
        }
        node.parent = None;
        self.nodes[parent].children.retain(|&c| c != child);
        Ok(())
    }

    fn register_model(&mut self, model: Model) -> ModelId {
        let id = self.models.insert(model);
        log::trace!("Registered model {:?}", id);
        id
    }

    fn deregister_model(&mut self, id: ModelId) -> SceneResult<Model> {
        self.models.remove(id).ok_or(SceneError::ModelNotRegistered(id))
    }

    fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(node)
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn node_name(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(node).map(|n| n.name.as_str())
    }

    fn node_kind(&self, node: NodeHandle) -> Option<NodeKind> {
        self.nodes.get(node).map(|n| n.kind)
    }

    fn model_count(&self) -> usize {
        self.models.len()
    }
}
