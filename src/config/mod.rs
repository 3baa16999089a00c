//! Configuration management module
//!
//! This module handles application settings loaded from defaults, a settings
//! file and the environment, plus the field registry that maps question
//! identifiers to external configuration keys.

pub mod registry;
pub mod settings;

pub use registry::*;
pub use settings::*;
