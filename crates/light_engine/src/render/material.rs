//! Material system for rendering

use crate::foundation::math::Color;

/// Unlit material used for debug and helper geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Flat color
    pub color: Color,

    /// Test against the depth buffer (off draws the lines over the scene)
    pub depth_test: bool,

    /// Write to the depth buffer
    pub depth_write: bool,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            color: Color::WHITE,
            depth_test: true,
            depth_write: false,
        }
    }

    /// Set the flat color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set depth testing
    pub fn with_depth_test(mut self, depth_test: bool) -> Self {
        self.depth_test = depth_test;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
