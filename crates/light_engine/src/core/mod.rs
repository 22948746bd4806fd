//! Core engine settings

pub mod config;

pub use config::{LightEngineConfig, RunMode, FieldValidation};
