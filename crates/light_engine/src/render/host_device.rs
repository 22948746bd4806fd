//! Host-memory graphics device
//!
//! Keeps every buffer in system memory. Used by tools and tests that need the
//! light systems without a GPU; mapping rules match a real device, so a
//! buffer left mapped is caught.

use crate::foundation::collections::{BufferHandle, SlotMap};
use crate::render::buffer::{BufferDesc, BufferLayout, BufferUsage, IndexFormat, VertexFormat};
use crate::render::device::{DeviceError, DeviceResult, GraphicsDevice};

#[derive(Debug)]
struct HostBuffer {
    desc: BufferDesc,
    data: Vec<u8>,
    mapped: bool,
    map_count: u64,
}

/// Graphics device backed by host memory
#[derive(Debug, Default)]
pub struct HostDevice {
    buffers: SlotMap<BufferHandle, HostBuffer>,
    allocations: u64,
}

impl HostDevice {
    /// Create a device with no buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of buffers allocated over the device's lifetime
    pub fn total_allocations(&self) -> u64 {
        self.allocations
    }

    /// Whether a buffer is currently mapped
    pub fn is_mapped(&self, buffer: BufferHandle) -> bool {
        self.buffers.get(buffer).is_some_and(|b| b.mapped)
    }

    /// How many times a buffer has been mapped
    pub fn map_count(&self, buffer: BufferHandle) -> u64 {
        self.buffers.get(buffer).map_or(0, |b| b.map_count)
    }

    fn allocate(&mut self, desc: BufferDesc) -> DeviceResult<BufferHandle> {
        let len = desc.byte_len();
        if len == 0 {
            return Err(DeviceError::EmptyAllocation);
        }
        self.allocations += 1;
        let handle = self.buffers.insert(HostBuffer {
            desc,
            data: vec![0; len],
            mapped: false,
            map_count: 0,
        });
        log::debug!("Allocated {} byte host buffer {:?}", len, handle);
        Ok(handle)
    }

    fn buffer_mut(&mut self, buffer: BufferHandle) -> DeviceResult<&mut HostBuffer> {
        self.buffers.get_mut(buffer).ok_or(DeviceError::BufferNotFound(buffer))
    }
}

impl GraphicsDevice for HostDevice {
    fn create_vertex_buffer(
        &mut self,
        format: &VertexFormat,
        num_vertices: usize,
        usage: BufferUsage,
    ) -> DeviceResult<BufferHandle> {
        self.allocate(BufferDesc {
            layout: BufferLayout::Vertex(format.clone()),
            count: num_vertices,
            usage: usage | BufferUsage::VERTEX,
        })
    }

    fn create_index_buffer(&mut self, format: IndexFormat, num_indices: usize) -> DeviceResult<BufferHandle> {
        self.allocate(BufferDesc {
            layout: BufferLayout::Index(format),
            count: num_indices,
            usage: BufferUsage::INDEX,
        })
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) -> DeviceResult<()> {
        if self.buffer_mut(buffer)?.mapped {
            return Err(DeviceError::Mapped(buffer));
        }
        self.buffers.remove(buffer);
        log::debug!("Released host buffer {:?}", buffer);
        Ok(())
    }

    fn buffer_desc(&self, buffer: BufferHandle) -> Option<&BufferDesc> {
        self.buffers.get(buffer).map(|b| &b.desc)
    }

    fn map(&mut self, buffer: BufferHandle) -> DeviceResult<()> {
        let entry = self.buffer_mut(buffer)?;
        if entry.mapped {
            return Err(DeviceError::AlreadyMapped(buffer));
        }
        entry.mapped = true;
        entry.map_count += 1;
        Ok(())
    }

    fn mapped_bytes(&mut self, buffer: BufferHandle) -> DeviceResult<&mut [u8]> {
        let entry = self.buffer_mut(buffer)?;
        if !entry.mapped {
            return Err(DeviceError::NotMapped(buffer));
        }
        Ok(&mut entry.data)
    }

    fn unmap(&mut self, buffer: BufferHandle) -> DeviceResult<()> {
        let entry = self.buffer_mut(buffer)?;
        if !entry.mapped {
            return Err(DeviceError::NotMapped(buffer));
        }
        entry.mapped = false;
        Ok(())
    }

    fn read(&self, buffer: BufferHandle) -> DeviceResult<&[u8]> {
        let entry = self.buffers.get(buffer).ok_or(DeviceError::BufferNotFound(buffer))?;
        if entry.mapped {
            return Err(DeviceError::Mapped(buffer));
        }
        Ok(&entry.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::MappedBuffer;

    #[test]
    fn test_guard_unmaps_on_drop() {
        let mut device = HostDevice::new();
        let buffer = device.create_index_buffer(IndexFormat::Uint8, 4).unwrap();
        {
            let mut mapping = MappedBuffer::new(&mut device, buffer).unwrap();
            mapping.bytes_mut().unwrap().copy_from_slice(&[1, 2, 3, 4]);
        }
        assert!(!device.is_mapped(buffer));
        assert_eq!(device.read(buffer).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_guard_unmaps_on_early_error() {
        fn fails_midway(device: &mut HostDevice, buffer: BufferHandle) -> DeviceResult<()> {
            let mut mapping = MappedBuffer::new(device, buffer)?;
            mapping.bytes_mut()?[0] = 9;
            Err(DeviceError::EmptyAllocation)
        }

        let mut device = HostDevice::new();
        let buffer = device.create_index_buffer(IndexFormat::Uint8, 2).unwrap();
        assert!(fails_midway(&mut device, buffer).is_err());
        assert!(!device.is_mapped(buffer));
        assert_eq!(device.read(buffer).unwrap()[0], 9);
    }

    #[test]
    fn test_double_map_is_refused() {
        let mut device = HostDevice::new();
        let buffer = device.create_index_buffer(IndexFormat::Uint16, 3).unwrap();
        device.map(buffer).unwrap();
        assert_eq!(device.map(buffer), Err(DeviceError::AlreadyMapped(buffer)));
        assert_eq!(device.read(buffer), Err(DeviceError::Mapped(buffer)));
        assert_eq!(device.destroy_buffer(buffer), Err(DeviceError::Mapped(buffer)));
        device.unmap(buffer).unwrap();
        assert_eq!(device.map_count(buffer), 1);
    }

    #[test]
    fn test_vertex_buffer_size_and_usage() {
        let mut device = HostDevice::new();
        let buffer = device
            .create_vertex_buffer(&VertexFormat::position_only(), 42, BufferUsage::DYNAMIC)
            .unwrap();
        let desc = device.buffer_desc(buffer).unwrap();
        assert_eq!(desc.byte_len(), 42 * 12);
        assert!(desc.usage.contains(BufferUsage::VERTEX | BufferUsage::DYNAMIC));
    }

    #[test]
    fn test_empty_allocation_and_destroy() {
        let mut device = HostDevice::new();
        assert_eq!(
            device.create_index_buffer(IndexFormat::Uint8, 0),
            Err(DeviceError::EmptyAllocation)
        );
        let buffer = device.create_index_buffer(IndexFormat::Uint32, 1).unwrap();
        device.destroy_buffer(buffer).unwrap();
        assert_eq!(device.buffer_count(), 0);
        assert_eq!(device.destroy_buffer(buffer), Err(DeviceError::BufferNotFound(buffer)));
        assert_eq!(device.total_allocations(), 1);
    }
}
