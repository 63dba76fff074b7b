//! Output adapters. Render an analysis result for stdout.
//!
//! JSON is the canonical shape; Markdown and CSV are convenience views of the same data.

pub mod csv_report;
pub mod markdown;

pub use csv_report::result_to_csv;
pub use markdown::result_to_markdown;

use crate::domain::{AnalysisResult, DomainError};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(DomainError::Output(format!("unknown output format: {}", other))),
        }
    }
}

/// Render `result` in the requested format.
pub fn render(result: &AnalysisResult, format: OutputFormat) -> Result<String, DomainError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| DomainError::Output(format!("serialize result: {}", e))),
        OutputFormat::Markdown => Ok(result_to_markdown(result)),
        OutputFormat::Csv => result_to_csv(result)
            .map_err(|e| DomainError::Output(format!("Failed to generate CSV: {}", e))),
    }
}
