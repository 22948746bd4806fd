//! Component systems

pub mod context;
pub mod spot_light;

pub use context::SystemContext;
pub use spot_light::{SpotLightComponent, SpotLightData, SpotLightError, SpotLightSystem};
