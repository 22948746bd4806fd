//! # Light Engine
//!
//! Spot light components for a scene-graph engine, with cone wireframes for
//! editing sessions.
//!
//! ## Features
//!
//! - **Component Lifecycle**: light node and model per entity, fully released on removal
//! - **Field Schema**: typed, described fields with editor ranges and enumerations
//! - **Debug Geometry**: cone outline regenerated in place after edits
//! - **Pluggable Backends**: scene graph and graphics device behind traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use light_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut ctx = SystemContext::new(HierarchyGraph::new(), HostDevice::new(), LightEngineConfig::editing());
//!     let mut spot_lights = SpotLightSystem::new(&mut ctx)?;
//!
//!     let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);
//!     spot_lights.add_component(&mut ctx, lamp, &overrides([("outerConeAngle", 30.0)]))?;
//!
//!     spot_lights.set_field(lamp, "attenuationEnd", &RawValue::Number(25.0))?;
//!     spot_lights.recompute_all(&mut ctx)?;
//!
//!     spot_lights.shutdown(&mut ctx)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod scene;
pub mod render;
pub mod geometry;
pub mod components;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        components::{
            spot_light::{overrides, FieldOverrides, FieldValue, RawValue, RecomputeReport, SpotLightSchema},
            SpotLightComponent, SpotLightData, SpotLightError, SpotLightSystem, SystemContext,
        },
        config::Config,
        core::{FieldValidation, LightEngineConfig, RunMode},
        foundation::{
            collections::{BufferHandle, ModelId, NodeHandle},
            math::{Color, Vec3},
        },
        geometry::{cone_positions, write_cone_outline},
        render::{GraphicsDevice, HostDevice},
        scene::{HierarchyGraph, NodeKind, SceneGraph},
    };
}
