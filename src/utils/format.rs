//! Table formatting and output utilities
//!
//! This module renders listings either as styled tables or as JSON.

use crate::error::Result;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Padding, Style},
    Table, Tabled,
};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Table formatter with optional color
pub struct TableFormatter {
    format: OutputFormat,
    no_color: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        Self { format, no_color }
    }

    /// Format rows in the configured output format
    pub fn format_table<T: Tabled + Serialize>(&self, data: &[T]) -> Result<String> {
        match self.format {
            OutputFormat::Table if data.is_empty() => Ok("No data to display".to_string()),
            OutputFormat::Table => Ok(self.format_as_table(data)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        }
    }

    fn format_as_table<T: Tabled>(&self, data: &[T]) -> String {
        let mut table = Table::new(data);

        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Padding::new(1, 1, 0, 0));

        if !self.no_color {
            table.with(Modify::new(Rows::first()).with(Color::FG_BLUE));
        }

        table.to_string()
    }
}
