//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types, color and angle helpers
//! - Handle types for arena-backed collections
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
