//! Output module for rendering pipeline results and store reports
//!
//! This module handles:
//! - The caller-facing JSON shape of a pipeline result
//! - Markdown rendering of a pipeline result
//! - Statistics and listings of stored resources

mod json;
mod markdown;
pub mod stats;

pub use json::{
    resources_to_json, roadmap_resources_to_json, roadmap_resources_to_json_value, to_json,
    to_json_value,
};
pub use markdown::{format_markdown, write_markdown};
pub use stats::{load_statistics, print_resources, print_statistics, ResourceStatistics};

use crate::model::PipelineResult;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Rendering of a pipeline result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

/// Renders a result in the requested format
pub fn render(result: &PipelineResult, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Json => Ok(to_json(result)?),
        OutputFormat::Markdown => Ok(format_markdown(result)),
    }
}

/// Writes a rendered result to `path`, or to stdout when no path is given
pub fn emit(
    result: &PipelineResult,
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    match (format, path) {
        (OutputFormat::Markdown, Some(path)) => write_markdown(result, path),
        (OutputFormat::Json, Some(path)) => {
            let mut rendered = render(result, format)?;
            rendered.push('\n');
            std::fs::write(path, rendered)?;
            Ok(())
        }
        (_, None) => {
            let rendered = render(result, format)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", rendered)?;
            Ok(())
        }
    }
}
