//! Utility functions module
//!
//! This module contains the properties-file codec and table formatting helpers.

pub mod format;
pub mod properties;

pub use format::*;
pub use properties::*;
