//! Resources shared by every spot light wireframe
//!
//! One index buffer with the cone outline topology and one material are
//! created per system and referenced by every debug mesh. Per-entity state is
//! limited to the vertex buffer holding that entity's cone positions.

use std::rc::Rc;

use crate::foundation::collections::{BufferHandle, NodeHandle};
use crate::foundation::math::Color;
use crate::geometry::{cone_outline_indices, CONE_INDEX_COUNT, CONE_VERTEX_COUNT};
use crate::render::{BufferUsage, DeviceResult, GraphicsDevice, IndexFormat, MappedBuffer, Material, VertexFormat};
use crate::scene::{Mesh, MeshInstance, Primitive, PrimitiveType};

/// Index buffer, material and vertex layout shared by all cone wireframes
#[derive(Debug, Clone)]
pub struct SharedDebugResources {
    index_buffer: BufferHandle,
    material: Rc<Material>,
    vertex_format: VertexFormat,
}

impl SharedDebugResources {
    /// Allocate the shared index buffer and fill it with the cone topology
    pub fn new<D: GraphicsDevice + ?Sized>(device: &mut D, color: Color) -> DeviceResult<Self> {
        let index_buffer = device.create_index_buffer(IndexFormat::Uint8, CONE_INDEX_COUNT)?;

        let upload = MappedBuffer::new(device, index_buffer).and_then(|mut mapping| {
            mapping.bytes_mut()?.copy_from_slice(&cone_outline_indices());
            Ok(())
        });
        if let Err(err) = upload {
            if let Err(release) = device.destroy_buffer(index_buffer) {
                log::warn!("Failed to release cone index buffer: {}", release);
            }
            return Err(err);
        }

        log::debug!("Created shared cone index buffer {:?} ({} indices)", index_buffer, CONE_INDEX_COUNT);
        Ok(Self {
            index_buffer,
            material: Rc::new(Material::new().with_color(color).with_depth_test(false)),
            vertex_format: VertexFormat::position_only(),
        })
    }

    /// Shared index buffer
    pub fn index_buffer(&self) -> BufferHandle {
        self.index_buffer
    }

    /// Shared material
    pub fn material(&self) -> &Rc<Material> {
        &self.material
    }

    /// Allocate a per-entity vertex buffer sized for one cone
    pub fn create_vertex_buffer<D: GraphicsDevice + ?Sized>(&self, device: &mut D) -> DeviceResult<BufferHandle> {
        device.create_vertex_buffer(&self.vertex_format, CONE_VERTEX_COUNT, BufferUsage::DYNAMIC)
    }

    /// Line-list mesh instance drawing `vertex_buffer` with the shared topology
    pub fn mesh_instance(&self, node: NodeHandle, vertex_buffer: BufferHandle) -> MeshInstance {
        MeshInstance {
            node,
            mesh: Mesh {
                vertex_buffer,
                index_buffer: self.index_buffer,
                primitive: Primitive {
                    kind: PrimitiveType::Lines,
                    base: 0,
                    count: CONE_INDEX_COUNT,
                    indexed: true,
                },
            },
            material: Rc::clone(&self.material),
        }
    }

    /// Release the shared index buffer
    pub fn release<D: GraphicsDevice + ?Sized>(self, device: &mut D) -> DeviceResult<()> {
        device.destroy_buffer(self.index_buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HostDevice;
    use crate::scene::{HierarchyGraph, NodeKind, SceneGraph};

    #[test]
    fn test_index_buffer_holds_topology() {
        let mut device = HostDevice::new();
        let shared = SharedDebugResources::new(&mut device, Color::WHITE).unwrap();

        let bytes = device.read(shared.index_buffer()).unwrap();
        assert_eq!(bytes, &cone_outline_indices()[..]);
        assert!(!device.is_mapped(shared.index_buffer()));
    }

    #[test]
    fn test_mesh_instances_share_index_buffer_and_material() {
        let mut device = HostDevice::new();
        let shared = SharedDebugResources::new(&mut device, Color::rgb(0.0, 1.0, 0.0)).unwrap();
        let mut scene = HierarchyGraph::new();
        let node = scene.create_node("n", NodeKind::Entity);

        let a = shared.mesh_instance(node, shared.create_vertex_buffer(&mut device).unwrap());
        let b = shared.mesh_instance(node, shared.create_vertex_buffer(&mut device).unwrap());

        assert_eq!(a.mesh.index_buffer, b.mesh.index_buffer);
        assert_ne!(a.mesh.vertex_buffer, b.mesh.vertex_buffer);
        assert!(Rc::ptr_eq(&a.material, &b.material));
        assert_eq!(a.mesh.primitive.count, 88);
        assert_eq!(a.material.color, Color::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_release_frees_index_buffer() {
        let mut device = HostDevice::new();
        let shared = SharedDebugResources::new(&mut device, Color::WHITE).unwrap();
        shared.release(&mut device).unwrap();
        assert_eq!(device.buffer_count(), 0);
    }
}
