//! Spot light field values
//!
//! Pure data, following the engine's component rule: values live here, the
//! system does the work. Fields are public for typed access from code; the
//! by-name accessors route editor writes through the schema.

use crate::core::config::FieldValidation;
use crate::foundation::math::Color;

use super::schema::{FieldDescriptor, FieldOverrides, FieldValue, RawValue, SchemaError, SpotLightSchema};

/// Field values of one spot light component
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLightData {
    /// Whether the light contributes to the scene
    pub enable: bool,
    /// Light color
    pub color: Color,
    /// Multiplier on the color
    pub intensity: f32,
    /// Distance at which the light's contribution reaches zero
    pub attenuation_end: f32,
    /// Full-intensity cone half-angle in degrees
    pub inner_cone_angle: f32,
    /// Outer cone half-angle in degrees; the debug wireframe follows this one
    pub outer_cone_angle: f32,
    /// Whether the light casts shadows
    pub cast_shadows: bool,
    /// Shadow map edge length in texels
    pub shadow_resolution: u32,
}

impl SpotLightData {
    const UNSET: Self = Self {
        enable: false,
        color: Color::rgba(0.0, 0.0, 0.0, 0.0),
        intensity: 0.0,
        attenuation_end: 0.0,
        inner_cone_angle: 0.0,
        outer_cone_angle: 0.0,
        cast_shadows: false,
        shadow_resolution: 0,
    };

    /// Schema defaults with `overrides` applied on top
    pub fn from_overrides(overrides: &FieldOverrides, policy: FieldValidation) -> Result<Self, SchemaError> {
        let mut data = Self::default();
        for (name, raw) in overrides {
            data.set_raw(name, raw, policy)?;
        }
        Ok(data)
    }

    /// Read a field by name
    pub fn get(&self, name: &str) -> Result<FieldValue, SchemaError> {
        let field = SpotLightSchema::exposed_field(name)?;
        Ok(match field.name {
            "enable" => FieldValue::Bool(self.enable),
            "color" => FieldValue::Color(self.color),
            "intensity" => FieldValue::Number(self.intensity),
            "attenuationEnd" => FieldValue::Number(self.attenuation_end),
            "innerConeAngle" => FieldValue::Number(self.inner_cone_angle),
            "outerConeAngle" => FieldValue::Number(self.outer_cone_angle),
            "castShadows" => FieldValue::Bool(self.cast_shadows),
            "shadowResolution" => FieldValue::Enum(self.shadow_resolution),
            _ => return Err(SchemaError::UnknownField(name.to_string())),
        })
    }

    /// Write a typed value by name
    ///
    /// On error the field keeps its previous value.
    pub fn set(&mut self, name: &str, value: FieldValue, policy: FieldValidation) -> Result<(), SchemaError> {
        let field = SpotLightSchema::exposed_field(name)?;
        field.check(&value, policy)?;
        self.store(field, value)
    }

    /// Write an untyped value by name, converting it with the schema first
    pub fn set_raw(&mut self, name: &str, raw: &RawValue, policy: FieldValidation) -> Result<(), SchemaError> {
        let field = SpotLightSchema::exposed_field(name)?;
        let value = field.coerce(raw)?;
        field.check(&value, policy)?;
        self.store(field, value)
    }

    fn store(&mut self, field: &'static FieldDescriptor, value: FieldValue) -> Result<(), SchemaError> {
        match (field.name, value) {
            ("enable", FieldValue::Bool(v)) => self.enable = v,
            ("color", FieldValue::Color(v)) => self.color = v,
            ("intensity", FieldValue::Number(v)) => self.intensity = v,
            ("attenuationEnd", FieldValue::Number(v)) => self.attenuation_end = v,
            ("innerConeAngle", FieldValue::Number(v)) => self.inner_cone_angle = v,
            ("outerConeAngle", FieldValue::Number(v)) => self.outer_cone_angle = v,
            ("castShadows", FieldValue::Bool(v)) => self.cast_shadows = v,
            ("shadowResolution", FieldValue::Enum(v)) => self.shadow_resolution = v,
            _ => {
                return Err(SchemaError::TypeMismatch {
                    field: field.name,
                    expected: field.field_type,
                    found: "value of another field type",
                })
            }
        }
        Ok(())
    }
}

impl Default for SpotLightData {
    /// Every exposed field at its schema default
    fn default() -> Self {
        let mut data = Self::UNSET;
        for field in SpotLightSchema::exposed() {
            if let Some(value) = field.default {
                if let Err(err) = data.store(field, value) {
                    log::error!("Schema default for '{}' does not fit its field: {}", field.name, err);
                }
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::spot_light::schema::overrides;

    #[test]
    fn test_defaults_match_schema() {
        let data = SpotLightData::default();
        assert!(data.enable);
        assert_eq!(data.color, Color::rgb(1.0, 1.0, 1.0));
        assert_eq!(data.intensity, 1.0);
        assert_eq!(data.attenuation_end, 10.0);
        assert_eq!(data.inner_cone_angle, 40.0);
        assert_eq!(data.outer_cone_angle, 45.0);
        assert!(!data.cast_shadows);
        assert_eq!(data.shadow_resolution, 1024);

        for field in SpotLightSchema::exposed() {
            assert_eq!(Some(data.get(field.name).unwrap()), field.default, "field {}", field.name);
        }
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let supplied = FieldOverrides::from([
            ("outerConeAngle".to_string(), RawValue::Number(30.0)),
            ("color".to_string(), RawValue::List(vec![1.0, 0.0, 0.0])),
        ]);
        let data = SpotLightData::from_overrides(&supplied, FieldValidation::Permissive).unwrap();
        assert_eq!(data.outer_cone_angle, 30.0);
        assert_eq!(data.color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(data.attenuation_end, 10.0);
        assert_eq!(data.inner_cone_angle, 40.0);
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let supplied = overrides([("range", 4.0)]);
        assert_eq!(
            SpotLightData::from_overrides(&supplied, FieldValidation::Permissive),
            Err(SchemaError::UnknownField("range".to_string()))
        );
    }

    #[test]
    fn test_strict_write_leaves_value_unchanged() {
        let mut data = SpotLightData::default();
        let result = data.set("intensity", FieldValue::Number(25.0), FieldValidation::Strict);
        assert!(matches!(result, Err(SchemaError::OutOfRange { field: "intensity", .. })));
        assert_eq!(data.intensity, 1.0);

        data.set("intensity", FieldValue::Number(25.0), FieldValidation::Permissive).unwrap();
        assert_eq!(data.intensity, 25.0);
    }

    #[test]
    fn test_type_mismatch_by_name() {
        let mut data = SpotLightData::default();
        assert!(matches!(
            data.set("enable", FieldValue::Number(1.0), FieldValidation::Permissive),
            Err(SchemaError::TypeMismatch { field: "enable", .. })
        ));
        assert!(matches!(
            data.set_raw("castShadows", &RawValue::Number(1.0), FieldValidation::Permissive),
            Err(SchemaError::TypeMismatch { field: "castShadows", .. })
        ));
        assert_eq!(data.get("model"), Err(SchemaError::NotExposed("model")));
    }
}
