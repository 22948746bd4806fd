//! Spot light component
//!
//! Field schema, per-entity data, and the system that manages light nodes,
//! models and editor wireframes for every entity carrying a spot light.

pub mod data;
pub mod error;
pub mod resources;
pub mod schema;
pub mod system;

pub use data::SpotLightData;
pub use error::{SpotLightError, SpotLightResult};
pub use resources::SharedDebugResources;
pub use schema::{
    overrides, EnumOption, FieldConstraint, FieldDescriptor, FieldOverrides, FieldType, FieldValue,
    NumberRange, RawValue, SchemaError, SpotLightSchema,
};
pub use system::{RecomputeReport, SpotLightComponent, SpotLightSystem, SPOT_LIGHT_SYSTEM_ID};
