//! propwizard - Interactive configuration collector
//!
//! Asks configuration questions on a terminal, records each answer under a
//! field identifier mapped to an external configuration key, and saves the
//! answers as a `key=value` properties file, optionally per profile.

pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use error::{PropwizardError, Result};
