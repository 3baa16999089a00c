//! Command-line interface module
//!
//! This module contains the CLI command definitions and their execution logic.

pub mod commands;

pub use commands::*;
