//! Run the same measurements past several models at once
//!
//! Each client is called on a bounded rayon pool and reconciled on its own,
//! so one slow or failing model only affects its own outcome. The call
//! returns once every model has finished.

use crate::ai::NarrativeClient;
use crate::models::{AnalysisResult, GeometricMeasurements};
use crate::scoring::{ResultSource, ScoreSynthesizer};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct ModelOutcome {
    pub model: String,
    pub source: ResultSource,
    pub elapsed_secs: f64,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub measurements: GeometricMeasurements,
    /// One entry per client, in the order the clients were given
    pub outcomes: Vec<ModelOutcome>,
    pub timestamp: DateTime<Utc>,
}

impl ComparisonReport {
    pub fn fallback_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.source.is_fallback())
            .count()
    }
}

/// Reconcile `measurements` against every client using at most `workers`
/// threads.
pub fn compare_models(
    measurements: &GeometricMeasurements,
    side_profile: bool,
    clients: &[Box<dyn NarrativeClient>],
    workers: usize,
) -> Result<ComparisonReport, rayon::ThreadPoolBuildError> {
    let workers = workers.clamp(1, clients.len().max(1));
    debug!("Comparing {} models on {} workers", clients.len(), workers);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let outcomes: Vec<ModelOutcome> = pool.install(|| {
        clients
            .par_iter()
            .map(|client| {
                let started = Instant::now();
                let reconciled = ScoreSynthesizer::with_client(client.as_ref())
                    .side_profile(side_profile)
                    .reconcile(measurements);
                let elapsed_secs = started.elapsed().as_secs_f64();
                debug!("{} finished in {:.2}s", client.model(), elapsed_secs);

                ModelOutcome {
                    model: client.model().to_string(),
                    source: reconciled.source,
                    elapsed_secs,
                    result: reconciled.result,
                }
            })
            .collect()
    });

    let report = ComparisonReport {
        measurements: *measurements,
        outcomes,
        timestamp: Utc::now(),
    };
    info!(
        "Model comparison done: {} models, {} fell back to rule-based scoring",
        report.outcomes.len(),
        report.fallback_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::StubClient;
    use crate::scoring::fallback_analysis;
    use std::time::Duration;

    fn clients() -> Vec<Box<dyn NarrativeClient>> {
        vec![
            Box::new(StubClient::replying("gemini-2.0-flash", r#"{"score": 8.1, "tier": "Chad"}"#)),
            Box::new(StubClient::failing("gemini-1.5-flash").delayed(Duration::from_millis(50))),
            Box::new(StubClient::replying("gemini-1.5-pro", "no idea")),
            Box::new(StubClient::replying("gemini-2.0-pro-exp", "```json\n{\"score\": 6.0}\n```")),
        ]
    }

    #[test]
    fn test_outcomes_keep_input_order_and_isolation() {
        let m = GeometricMeasurements::default();
        let report = compare_models(&m, false, &clients(), 4).expect("build pool");

        let models: Vec<&str> = report.outcomes.iter().map(|o| o.model.as_str()).collect();
        assert_eq!(
            models,
            vec!["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro", "gemini-2.0-pro-exp"]
        );

        assert_eq!(report.outcomes[0].result.score, 8.1);
        assert!(!report.outcomes[0].source.is_fallback());
        assert!(report.outcomes[1].source.is_fallback());
        assert_eq!(report.outcomes[1].result, fallback_analysis(&m));
        assert!(report.outcomes[2].source.is_fallback());
        assert_eq!(report.outcomes[3].result.tier, "HTN");
        assert_eq!(report.fallback_count(), 2);
        assert!(report.outcomes[1].elapsed_secs >= 0.05);
    }

    #[test]
    fn test_single_worker_and_zero_workers() {
        let m = GeometricMeasurements::default();
        let sequential = compare_models(&m, true, &clients(), 1).expect("build pool");
        let clamped = compare_models(&m, true, &clients(), 0).expect("build pool");
        assert_eq!(sequential.outcomes.len(), 4);
        assert_eq!(clamped.outcomes.len(), 4);
        for (a, b) in sequential.outcomes.iter().zip(&clamped.outcomes) {
            assert_eq!(a.result, b.result);
        }
    }

    #[test]
    fn test_no_clients() {
        let report = compare_models(&GeometricMeasurements::default(), false, &[], 4)
            .expect("build pool");
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let report = compare_models(&GeometricMeasurements::default(), false, &clients(), 2)
            .expect("build pool");
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["outcomes"][0]["source"]["kind"], "narrative");
        assert_eq!(json["outcomes"][1]["source"]["kind"], "fallback");
        assert!(json["outcomes"][0]["result"]["radar_data"].is_object());
    }
}
