//! Spot light property schema
//!
//! The schema is a static, ordered table of field descriptors. Editors build
//! their property panels from it; the component reads defaults and
//! constraints from it when values are written by name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::FieldValidation;
use crate::foundation::math::Color;

/// Value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// On/off switch
    Boolean,
    /// Scalar number
    Number,
    /// RGB color
    Rgb,
    /// One of a fixed list of values
    Enumeration,
    /// Engine-managed state that editors never see
    Internal,
}

/// Typed field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Boolean field value
    Bool(bool),
    /// Number field value
    Number(f32),
    /// Color field value
    Color(Color),
    /// Enumeration field value
    Enum(u32),
}

impl FieldValue {
    /// Field type this value belongs to
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Bool(_) => FieldType::Boolean,
            Self::Number(_) => FieldType::Number,
            Self::Color(_) => FieldType::Rgb,
            Self::Enum(_) => FieldType::Enumeration,
        }
    }
}

/// Untyped value as written in scene files or sent by an editor
///
/// Colors arrive as plain `[r, g, b]` lists and enumeration values as plain
/// numbers; [`FieldDescriptor::coerce`] turns them into [`FieldValue`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// `true` / `false`
    Bool(bool),
    /// Any number
    Number(f64),
    /// List of numbers
    List(Vec<f32>),
}

impl RawValue {
    fn describe(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for RawValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<[f32; 3]> for RawValue {
    fn from(value: [f32; 3]) -> Self {
        Self::List(value.to_vec())
    }
}

/// Caller-supplied field values, keyed by field name
pub type FieldOverrides = BTreeMap<String, RawValue>;

/// Build overrides from `(name, value)` pairs
pub fn overrides<I, K, V>(pairs: I) -> FieldOverrides
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<RawValue>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Numeric bounds shown by editors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    /// Inclusive lower bound
    pub min: Option<f32>,
    /// Inclusive upper bound
    pub max: Option<f32>,
    /// Editor slider step
    pub step: Option<f32>,
}

impl NumberRange {
    /// True when `value` lies within the bounds
    pub fn contains(&self, value: f32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// One entry of an enumeration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumOption {
    /// Label shown by editors
    pub label: &'static str,
    /// Stored value
    pub value: u32,
}

/// Validation attached to a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldConstraint {
    /// Anything of the right type
    None,
    /// Numeric range
    Range(NumberRange),
    /// Fixed list of values
    Enumeration(&'static [EnumOption]),
}

/// Schema errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// No field with this name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Field exists but is not exposed to editors
    #[error("Field '{0}' is not exposed")]
    NotExposed(&'static str),

    /// Value of the wrong type for the field
    #[error("Field '{field}' expects {expected:?}, got {found}")]
    TypeMismatch {
        /// Field name
        field: &'static str,
        /// Declared type
        expected: FieldType,
        /// What was supplied
        found: &'static str,
    },

    /// Number outside the declared range
    #[error("Field '{field}' value {value} is outside [{min:?}, {max:?}]")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: f32,
        /// Lower bound
        min: Option<f32>,
        /// Upper bound
        max: Option<f32>,
    },

    /// Value not listed by an enumeration field
    #[error("Field '{field}' does not list value {value}")]
    NotEnumerated {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: u32,
    },
}

/// Description of one component field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    /// Key used in data and scene files
    pub name: &'static str,
    /// Label shown by editors
    pub display_name: &'static str,
    /// Tooltip shown by editors
    pub description: &'static str,
    /// Value type
    pub field_type: FieldType,
    /// Value used when nothing is supplied
    pub default: Option<FieldValue>,
    /// Range or enumeration
    pub constraint: FieldConstraint,
    /// Visible to editors and writable by name
    pub exposed: bool,
}

impl FieldDescriptor {
    fn mismatch(&self, found: &'static str) -> SchemaError {
        SchemaError::TypeMismatch {
            field: self.name,
            expected: self.field_type,
            found,
        }
    }

    /// Convert an untyped value into this field's type
    ///
    /// A 3 or 4 element list becomes a [`Color`] for rgb fields; whole,
    /// non-negative numbers become enumeration values.
    pub fn coerce(&self, raw: &RawValue) -> Result<FieldValue, SchemaError> {
        match (self.field_type, raw) {
            (FieldType::Internal, _) => Err(SchemaError::NotExposed(self.name)),
            (FieldType::Boolean, RawValue::Bool(b)) => Ok(FieldValue::Bool(*b)),
            (FieldType::Number, RawValue::Number(n)) => Ok(FieldValue::Number(*n as f32)),
            (FieldType::Rgb, RawValue::List(channels)) => Color::from_slice(channels)
                .map(FieldValue::Color)
                .ok_or_else(|| self.mismatch("list of wrong length")),
            (FieldType::Enumeration, RawValue::Number(n))
                if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) =>
            {
                Ok(FieldValue::Enum(*n as u32))
            }
            (_, raw) => Err(self.mismatch(raw.describe())),
        }
    }

    /// Check a typed value against the type, range and enumeration
    ///
    /// Type mismatches are always errors. Range and enumeration violations
    /// are errors under [`FieldValidation::Strict`] and warnings otherwise.
    pub fn check(&self, value: &FieldValue, policy: FieldValidation) -> Result<(), SchemaError> {
        if self.field_type == FieldType::Internal {
            return Err(SchemaError::NotExposed(self.name));
        }
        if value.field_type() != self.field_type {
            return Err(self.mismatch(match value {
                FieldValue::Bool(_) => "boolean",
                FieldValue::Number(_) => "number",
                FieldValue::Color(_) => "color",
                FieldValue::Enum(_) => "enumeration",
            }));
        }

        let violation = match (self.constraint, value) {
            (FieldConstraint::Range(range), FieldValue::Number(n)) if !range.contains(*n) => {
                Some(SchemaError::OutOfRange {
                    field: self.name,
                    value: *n,
                    min: range.min,
                    max: range.max,
                })
            }
            (FieldConstraint::Enumeration(options), FieldValue::Enum(v))
                if !options.iter().any(|o| o.value == *v) =>
            {
                Some(SchemaError::NotEnumerated { field: self.name, value: *v })
            }
            _ => None,
        };

        match (violation, policy) {
            (None, _) => Ok(()),
            (Some(err), FieldValidation::Strict) => Err(err),
            (Some(err), FieldValidation::Permissive) => {
                log::warn!("Accepting value outside schema: {}", err);
                Ok(())
            }
        }
    }
}

const SHADOW_RESOLUTIONS: &[EnumOption] = &[
    EnumOption { label: "256", value: 256 },
    EnumOption { label: "512", value: 512 },
    EnumOption { label: "1024", value: 1024 },
    EnumOption { label: "2048", value: 2048 },
];

static SPOT_LIGHT_FIELDS: [FieldDescriptor; 9] = [
    FieldDescriptor {
        name: "enable",
        display_name: "Enable",
        description: "Enable or disable the light",
        field_type: FieldType::Boolean,
        default: Some(FieldValue::Bool(true)),
        constraint: FieldConstraint::None,
        exposed: true,
    },
    FieldDescriptor {
        name: "color",
        display_name: "Color",
        description: "Light color",
        field_type: FieldType::Rgb,
        default: Some(FieldValue::Color(Color::WHITE)),
        constraint: FieldConstraint::None,
        exposed: true,
    },
    FieldDescriptor {
        name: "intensity",
        display_name: "Intensity",
        description: "Factors the light color",
        field_type: FieldType::Number,
        default: Some(FieldValue::Number(1.0)),
        constraint: FieldConstraint::Range(NumberRange { min: Some(0.0), max: Some(10.0), step: Some(0.05) }),
        exposed: true,
    },
    FieldDescriptor {
        name: "attenuationEnd",
        display_name: "Attenuation End",
        description: "The distance from the light where its contribution falls to zero",
        field_type: FieldType::Number,
        default: Some(FieldValue::Number(10.0)),
        constraint: FieldConstraint::Range(NumberRange { min: Some(0.0), max: None, step: None }),
        exposed: true,
    },
    FieldDescriptor {
        name: "innerConeAngle",
        display_name: "Inner Cone Angle",
        description: "Spotlight inner cone angle",
        field_type: FieldType::Number,
        default: Some(FieldValue::Number(40.0)),
        constraint: FieldConstraint::Range(NumberRange { min: Some(0.0), max: Some(90.0), step: None }),
        exposed: true,
    },
    FieldDescriptor {
        name: "outerConeAngle",
        display_name: "Outer Cone Angle",
        description: "Spotlight outer cone angle",
        field_type: FieldType::Number,
        default: Some(FieldValue::Number(45.0)),
        constraint: FieldConstraint::Range(NumberRange { min: Some(0.0), max: Some(90.0), step: None }),
        exposed: true,
    },
    FieldDescriptor {
        name: "castShadows",
        display_name: "Cast Shadows",
        description: "Cast shadows from this light",
        field_type: FieldType::Boolean,
        default: Some(FieldValue::Bool(false)),
        constraint: FieldConstraint::None,
        exposed: true,
    },
    FieldDescriptor {
        name: "shadowResolution",
        display_name: "Shadow Resolution",
        description: "Resolution of shadowmap generated by this light",
        field_type: FieldType::Enumeration,
        default: Some(FieldValue::Enum(1024)),
        constraint: FieldConstraint::Enumeration(SHADOW_RESOLUTIONS),
        exposed: true,
    },
    FieldDescriptor {
        name: "model",
        display_name: "Model",
        description: "Scene model owned by the component",
        field_type: FieldType::Internal,
        default: None,
        constraint: FieldConstraint::None,
        exposed: false,
    },
];

/// Field table of the spot light component
pub struct SpotLightSchema;

impl SpotLightSchema {
    /// All descriptors in declaration order
    pub fn fields() -> &'static [FieldDescriptor] {
        &SPOT_LIGHT_FIELDS
    }

    /// Descriptor by name, exposed or not
    pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
        SPOT_LIGHT_FIELDS.iter().find(|f| f.name == name)
    }

    /// Descriptor by name, for reads and writes through the editor surface
    pub fn exposed_field(name: &str) -> Result<&'static FieldDescriptor, SchemaError> {
        let field = Self::field(name).ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        if field.exposed {
            Ok(field)
        } else {
            Err(SchemaError::NotExposed(field.name))
        }
    }

    /// Descriptors editors may show
    pub fn exposed() -> impl Iterator<Item = &'static FieldDescriptor> {
        SPOT_LIGHT_FIELDS.iter().filter(|f| f.exposed)
    }
}
