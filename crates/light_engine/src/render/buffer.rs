//! Buffer descriptions shared by every graphics device
//!
//! These types describe what a buffer holds. Storage and mapping belong to
//! the device that allocated it.

use bitflags::bitflags;

bitflags! {
    /// How a buffer is bound and how often its contents change
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Bound as vertex input
        const VERTEX = 1 << 0;
        /// Bound as index input
        const INDEX = 1 << 1;
        /// Contents are rewritten after creation
        const DYNAMIC = 1 << 2;
    }
}

/// Width of the entries of an index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 8-bit indices
    Uint8,
    /// 16-bit indices
    Uint16,
    /// 32-bit indices
    Uint32,
}

impl IndexFormat {
    /// Size of one index in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Meaning of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexSemantic {
    /// `vertex_position`
    Position,
    /// `vertex_color`
    Color,
}

/// Scalar type of a vertex attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// 32-bit float
    Float32,
    /// Unsigned byte
    Uint8,
}

impl ElementType {
    /// Size of one component in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Float32 => 4,
            Self::Uint8 => 1,
        }
    }
}

/// One attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexElement {
    /// Attribute meaning
    pub semantic: VertexSemantic,
    /// Number of components (1 to 4)
    pub components: u8,
    /// Component scalar type
    pub element_type: ElementType,
    /// Byte offset inside the vertex, filled in by [`VertexFormat`]
    pub offset: usize,
}

impl VertexElement {
    /// Create an attribute description
    pub fn new(semantic: VertexSemantic, components: u8, element_type: ElementType) -> Self {
        Self {
            semantic,
            components,
            element_type,
            offset: 0,
        }
    }

    /// Size of the attribute in bytes
    pub fn size(&self) -> usize {
        usize::from(self.components) * self.element_type.size()
    }
}

/// Interleaved vertex layout
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexFormat {
    elements: Vec<VertexElement>,
    stride: usize,
}

impl VertexFormat {
    /// Create an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout holding a single 3 x f32 position
    pub fn position_only() -> Self {
        Self::new().with_element(VertexElement::new(VertexSemantic::Position, 3, ElementType::Float32))
    }

    /// Append an attribute, placing it after the previous ones
    pub fn with_element(mut self, mut element: VertexElement) -> Self {
        element.offset = self.stride;
        self.stride += element.size();
        self.elements.push(element);
        self
    }

    /// Attributes in declaration order
    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// Size of one vertex in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// True when the layout is exactly one 3 x f32 position
    pub fn is_position_only(&self) -> bool {
        matches!(
            self.elements.as_slice(),
            [VertexElement { semantic: VertexSemantic::Position, components: 3, element_type: ElementType::Float32, .. }]
        )
    }
}

/// What a buffer stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferLayout {
    /// Interleaved vertices
    Vertex(VertexFormat),
    /// Indices of one width
    Index(IndexFormat),
}

/// Description of an allocated buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    /// Vertex or index layout
    pub layout: BufferLayout,
    /// Number of vertices or indices
    pub count: usize,
    /// Binding and update flags
    pub usage: BufferUsage,
}

impl BufferDesc {
    /// Size of one element in bytes
    pub fn stride(&self) -> usize {
        match &self.layout {
            BufferLayout::Vertex(format) => format.stride(),
            BufferLayout::Index(format) => format.size(),
        }
    }

    /// Total size in bytes
    pub fn byte_len(&self) -> usize {
        self.stride() * self.count
    }

    /// Vertex layout, if this is a vertex buffer
    pub fn vertex_format(&self) -> Option<&VertexFormat> {
        match &self.layout {
            BufferLayout::Vertex(format) => Some(format),
            BufferLayout::Index(_) => None,
        }
    }

    /// Index width, if this is an index buffer
    pub fn index_format(&self) -> Option<IndexFormat> {
        match self.layout {
            BufferLayout::Index(format) => Some(format),
            BufferLayout::Vertex(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_layout_is_twelve_bytes() {
        let format = VertexFormat::position_only();
        assert_eq!(format.stride(), 12);
        assert!(format.is_position_only());
    }

    #[test]
    fn test_element_offsets_accumulate() {
        let format = VertexFormat::new()
            .with_element(VertexElement::new(VertexSemantic::Position, 3, ElementType::Float32))
            .with_element(VertexElement::new(VertexSemantic::Color, 4, ElementType::Uint8));
        assert_eq!(format.elements()[1].offset, 12);
        assert_eq!(format.stride(), 16);
        assert!(!format.is_position_only());
    }

    #[test]
    fn test_index_buffer_size() {
        let desc = BufferDesc {
            layout: BufferLayout::Index(IndexFormat::Uint8),
            count: 88,
            usage: BufferUsage::INDEX,
        };
        assert_eq!(desc.byte_len(), 88);
        assert_eq!(desc.index_format(), Some(IndexFormat::Uint8));
        assert!(desc.vertex_format().is_none());
    }
}
