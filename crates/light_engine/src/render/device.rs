//! Graphics device abstraction
//!
//! Buffers are allocated and released through [`GraphicsDevice`]. Writes go
//! through lock/unlock style mapping; [`MappedBuffer`] wraps that pair so the
//! unmap happens on every exit path, including early returns and errors.

use thiserror::Error;

use crate::foundation::collections::BufferHandle;
use crate::render::buffer::{BufferDesc, BufferUsage, IndexFormat, VertexFormat};

/// Device errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The handle does not refer to a live buffer
    #[error("Buffer not found: {0:?}")]
    BufferNotFound(BufferHandle),

    /// The buffer is already mapped
    #[error("Buffer already mapped: {0:?}")]
    AlreadyMapped(BufferHandle),

    /// The buffer must be mapped for this operation
    #[error("Buffer not mapped: {0:?}")]
    NotMapped(BufferHandle),

    /// The buffer is mapped and cannot be read or destroyed
    #[error("Buffer is mapped: {0:?}")]
    Mapped(BufferHandle),

    /// Zero-sized allocations are refused
    #[error("Cannot allocate an empty buffer")]
    EmptyAllocation,
}

/// Result alias for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Buffer allocation and mapped-memory access consumed by component systems
pub trait GraphicsDevice {
    /// Allocate a vertex buffer holding `num_vertices` vertices of `format`
    fn create_vertex_buffer(
        &mut self,
        format: &VertexFormat,
        num_vertices: usize,
        usage: BufferUsage,
    ) -> DeviceResult<BufferHandle>;

    /// Allocate an index buffer holding `num_indices` indices
    fn create_index_buffer(&mut self, format: IndexFormat, num_indices: usize) -> DeviceResult<BufferHandle>;

    /// Release a buffer
    fn destroy_buffer(&mut self, buffer: BufferHandle) -> DeviceResult<()>;

    /// Describe a live buffer
    fn buffer_desc(&self, buffer: BufferHandle) -> Option<&BufferDesc>;

    /// Begin exclusive write access to a buffer's memory
    fn map(&mut self, buffer: BufferHandle) -> DeviceResult<()>;

    /// Memory of a mapped buffer
    fn mapped_bytes(&mut self, buffer: BufferHandle) -> DeviceResult<&mut [u8]>;

    /// End write access
    fn unmap(&mut self, buffer: BufferHandle) -> DeviceResult<()>;

    /// Contents of an unmapped buffer
    fn read(&self, buffer: BufferHandle) -> DeviceResult<&[u8]>;
}

/// Scoped mapping of one buffer
///
/// Created by [`MappedBuffer::new`], which maps the buffer. Dropping the
/// guard unmaps it.
pub struct MappedBuffer<'a, D: GraphicsDevice + ?Sized> {
    device: &'a mut D,
    buffer: BufferHandle,
}

impl<'a, D: GraphicsDevice + ?Sized> MappedBuffer<'a, D> {
    /// Map `buffer` for writing
    pub fn new(device: &'a mut D, buffer: BufferHandle) -> DeviceResult<Self> {
        device.map(buffer)?;
        log::trace!("Mapped buffer {:?}", buffer);
        Ok(Self { device, buffer })
    }

    /// Description of the mapped buffer
    pub fn desc(&self) -> DeviceResult<&BufferDesc> {
        self.device
            .buffer_desc(self.buffer)
            .ok_or(DeviceError::BufferNotFound(self.buffer))
    }

    /// Mapped memory
    pub fn bytes_mut(&mut self) -> DeviceResult<&mut [u8]> {
        self.device.mapped_bytes(self.buffer)
    }
}

impl<D: GraphicsDevice + ?Sized> Drop for MappedBuffer<'_, D> {
    fn drop(&mut self) {
        match self.device.unmap(self.buffer) {
            Ok(()) => log::trace!("Unmapped buffer {:?}", self.buffer),
            Err(err) => log::error!("Failed to unmap buffer {:?}: {}", self.buffer, err),
        }
    }
}
