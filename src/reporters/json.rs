//! JSON reporter
//!
//! Outputs the `AnalysisResponse` envelope as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::ai::ComparisonReport;
use crate::models::{AnalysisResponse, GeometricMeasurements};
use crate::scoring::Reconciled;
use anyhow::Result;

/// Render an analysis as JSON
pub fn render(analysis: &Reconciled) -> Result<String> {
    let response = AnalysisResponse::new(analysis.result.clone());
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn render_measurements(measurements: &GeometricMeasurements) -> Result<String> {
    Ok(serde_json::to_string_pretty(measurements)?)
}

pub fn render_comparison(report: &ComparisonReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
