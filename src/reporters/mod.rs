//! Output reporters for adamscore results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON (the `AnalysisResponse` envelope)

mod json;
mod text;

pub use json::{render_comparison, render_measurements};

use crate::scoring::Reconciled;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render an analysis in the specified format
pub fn report(analysis: &Reconciled, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(analysis, fmt)
}

/// Render an analysis using an OutputFormat enum
pub fn report_with_format(analysis: &Reconciled, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(analysis),
        OutputFormat::Json => json::render(analysis),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::GeometricMeasurements;
    use crate::scoring::ScoreSynthesizer;

    /// Offline analysis of the default measurements
    pub(crate) fn test_analysis() -> Reconciled {
        ScoreSynthesizer::offline().reconcile(&GeometricMeasurements::default())
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_report_by_name() {
        let analysis = test_analysis();
        assert!(report(&analysis, "json").unwrap().starts_with('{'));
        assert!(report(&analysis, "text").unwrap().contains("Chad"));
        assert!(report(&analysis, "html").is_err());
    }
}
