//! Procedural debug geometry

pub mod cone;

pub use cone::{
    cone_outline_indices, cone_positions, cone_vertex, read_cone_vertices, write_cone_outline,
    ConeVertex, GeometryError, CONE_INDEX_COUNT, CONE_VERTEX_COUNT, RING_SEGMENTS,
};
