//! Handle types for arena-backed collections
//!
//! Scene nodes, registered models and device buffers all live in slot maps and
//! are referenced by generational keys, never by owning pointers.

pub use slotmap::{SlotMap, SecondaryMap};

slotmap::new_key_type! {
    /// Handle to a node in the scene hierarchy (entities and light nodes alike)
    pub struct NodeHandle;

    /// Handle to a model registered with the scene
    pub struct ModelId;

    /// Handle to a buffer allocated on a graphics device
    pub struct BufferHandle;
}
