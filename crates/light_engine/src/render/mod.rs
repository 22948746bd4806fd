//! Rendering resources consumed by component systems
//!
//! Only the parts of a renderer the light systems touch live here: buffer
//! descriptions, the device trait with scoped mapping, and materials.
//! [`HostDevice`] is an in-memory device for tools and tests.

pub mod buffer;
pub mod device;
pub mod host_device;
pub mod material;

pub use buffer::{BufferDesc, BufferLayout, BufferUsage, ElementType, IndexFormat, VertexElement, VertexFormat, VertexSemantic};
pub use device::{DeviceError, DeviceResult, GraphicsDevice, MappedBuffer};
pub use host_device::HostDevice;
pub use material::Material;
