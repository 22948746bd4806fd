//! # Engine Configuration
//!
//! Settings that decide how the light systems behave for a session:
//! whether editor-only resources are allocated, how strictly field writes are
//! checked against the property schema, and how debug geometry looks.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```toml
//! run_mode = "editing"
//! field_validation = "strict"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::Color;

/// Whether the engine runs inside an editing tool or as the shipped game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Normal execution: no editor-only resources, no debug geometry
    #[default]
    Runtime,
    /// Running inside the editor: debug meshes are allocated and refreshed
    Editing,
}

impl RunMode {
    /// True when editor-only resources should exist
    pub fn is_editing(self) -> bool {
        self == Self::Editing
    }
}

/// How field writes are checked against a descriptor's range or enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValidation {
    /// Accept out-of-range values and log a warning
    #[default]
    Permissive,
    /// Reject out-of-range values with an error, leaving the field unchanged
    Strict,
}

/// Settings for the light systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightEngineConfig {
    /// Runtime or editing session
    pub run_mode: RunMode,
    /// Range/enumeration checking policy for field writes
    pub field_validation: FieldValidation,
    /// Default log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Color of the shared debug wireframe material
    pub debug_color: Color,
}

impl Default for LightEngineConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Runtime,
            field_validation: FieldValidation::Permissive,
            log_filter: "info".to_string(),
            debug_color: Color::rgb(1.0, 1.0, 0.0),
        }
    }
}

impl LightEngineConfig {
    /// Default settings for an editing session
    pub fn editing() -> Self {
        Self {
            run_mode: RunMode::Editing,
            ..Self::default()
        }
    }

    /// Builder-style override of the validation policy
    pub fn with_field_validation(mut self, policy: FieldValidation) -> Self {
        self.field_validation = policy;
        self
    }
}

impl Config for LightEngineConfig {}
