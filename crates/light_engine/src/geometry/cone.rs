//! Spot light cone wireframe
//!
//! The wireframe is an apex at the light origin plus a ring of points at the
//! attenuation distance, opening along local -Y:
//!
//! ```text
//!            apex (0,0,0)
//!            /|\
//!           / | \        4 spokes: apex -> ring at quarter turns
//!          /  |  \
//!     ----(---+---)----  ring: radius r = d·sin(θ), height y = -d·cos(θ)
//! ```
//!
//! Every ring point lies exactly `attenuation_end` away from the apex. The
//! ring is closed by repeating its first point as its last, so a buffer of
//! `RING_SEGMENTS + 2` vertices holds the apex and `RING_SEGMENTS + 1` ring
//! points. Index topology never changes; only positions are rewritten.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::foundation::collections::BufferHandle;
use crate::foundation::math::{constants, utils, Vec3};
use crate::render::device::{DeviceError, GraphicsDevice, MappedBuffer};

/// Segments around the cone's ring
pub const RING_SEGMENTS: usize = 40;

/// Vertices in a cone wireframe buffer: apex + ring + closing duplicate
pub const CONE_VERTEX_COUNT: usize = RING_SEGMENTS + 2;

/// Spokes drawn from the apex to the ring
pub const SPOKE_COUNT: usize = 4;

/// Indices in the shared line list: two per spoke and two per ring segment
pub const CONE_INDEX_COUNT: usize = 2 * (SPOKE_COUNT + RING_SEGMENTS);

/// Position-only vertex as laid out in the wireframe buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ConeVertex {
    /// Position in light-local space
    pub position: [f32; 3],
}

impl From<Vec3> for ConeVertex {
    fn from(v: Vec3) -> Self {
        Self { position: [v.x, v.y, v.z] }
    }
}

/// Geometry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The buffer is not a vertex buffer holding exactly a 3 x f32 position
    #[error("Vertex buffer {0:?} is not a position-only float3 buffer")]
    UnsupportedLayout(BufferHandle),

    /// The buffer holds too few vertices for an apex and a closed ring
    #[error("Vertex buffer {buffer:?} holds {count} vertices, at least 3 are needed")]
    TooFewVertices {
        /// Buffer that was written
        buffer: BufferHandle,
        /// Vertices it holds
        count: usize,
    },

    /// Mapped memory is shorter than the buffer description claims
    #[error("Mapped memory of {buffer:?} ends after {written} of {expected} vertices")]
    Truncated {
        /// Buffer that was written
        buffer: BufferHandle,
        /// Vertices written before running out of memory
        written: usize,
        /// Vertices the description promised
        expected: usize,
    },

    /// Device failure while mapping or writing
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Position of one wireframe vertex
///
/// `index` 0 is the apex; indices `1..vertex_count` walk the ring, with the
/// last ring point landing back on the first. Angles are in degrees.
pub fn cone_vertex(outer_cone_angle: f32, attenuation_end: f32, index: usize, vertex_count: usize) -> Vec3 {
    if index == 0 {
        return Vec3::zeros();
    }

    let theta = utils::deg_to_rad(outer_cone_angle);
    let y = -attenuation_end * theta.cos();
    let r = attenuation_end * theta.sin();

    let segments = vertex_count.saturating_sub(2).max(1);
    let phi = constants::TAU * ((index - 1) as f32 / segments as f32);
    Vec3::new(r * phi.cos(), y, r * phi.sin())
}

/// All wireframe positions for a cone
pub fn cone_positions(outer_cone_angle: f32, attenuation_end: f32, vertex_count: usize) -> Vec<Vec3> {
    (0..vertex_count)
        .map(|i| cone_vertex(outer_cone_angle, attenuation_end, i, vertex_count))
        .collect()
}

/// Line-list indices of the wireframe
///
/// Four spokes from the apex to the ring at quarter turns, then one segment
/// between each pair of consecutive ring points.
pub fn cone_outline_indices() -> [u8; CONE_INDEX_COUNT] {
    let mut indices = [0u8; CONE_INDEX_COUNT];
    let quarter = RING_SEGMENTS / SPOKE_COUNT;

    for spoke in 0..SPOKE_COUNT {
        indices[spoke * 2] = 0;
        indices[spoke * 2 + 1] = (1 + spoke * quarter) as u8;
    }

    let ring = &mut indices[SPOKE_COUNT * 2..];
    for segment in 0..RING_SEGMENTS {
        ring[segment * 2] = (segment + 1) as u8;
        ring[segment * 2 + 1] = (segment + 2) as u8;
    }

    indices
}

/// Rewrite a wireframe vertex buffer in place
///
/// The vertex count comes from the buffer itself and is never changed. The
/// buffer is mapped for the duration of the write and unmapped on every exit
/// path, including errors.
pub fn write_cone_outline<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    buffer: BufferHandle,
    outer_cone_angle: f32,
    attenuation_end: f32,
) -> Result<usize, GeometryError> {
    let mut mapping = MappedBuffer::new(device, buffer)?;

    let desc = mapping.desc()?;
    let count = desc.count;
    if !desc.vertex_format().is_some_and(|f| f.is_position_only()) {
        return Err(GeometryError::UnsupportedLayout(buffer));
    }
    if count < 3 {
        return Err(GeometryError::TooFewVertices { buffer, count });
    }

    let stride = std::mem::size_of::<ConeVertex>();
    let bytes = mapping.bytes_mut()?;
    let mut written = 0;
    for (index, slot) in bytes.chunks_exact_mut(stride).take(count).enumerate() {
        let vertex = ConeVertex::from(cone_vertex(outer_cone_angle, attenuation_end, index, count));
        slot.copy_from_slice(bytemuck::bytes_of(&vertex));
        written += 1;
    }

    if written < count {
        return Err(GeometryError::Truncated { buffer, written, expected: count });
    }

    log::trace!(
        "Wrote {} cone vertices to {:?} (angle {}, distance {})",
        written,
        buffer,
        outer_cone_angle,
        attenuation_end
    );
    Ok(written)
}

/// Decode positions from raw wireframe buffer contents
pub fn read_cone_vertices(bytes: &[u8]) -> Vec<ConeVertex> {
    bytes
        .chunks_exact(std::mem::size_of::<ConeVertex>())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}
