//! Compare command: one set of measurements, several models

use super::analyze::load_views;
use super::emit;
use crate::ai::{
    compare_models, NarrativeBackend, NarrativeClient, NarrativeError, NarrativePrompt,
    NarrativeResult,
};
use crate::config::Settings;
use crate::geometry::calculate_all_measurements;
use crate::reporters::render_comparison;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

/// Stands in for a model whose backend has no API key, so the model still
/// gets its own (rule-based) outcome in the report.
struct Unconfigured {
    model: String,
    backend: NarrativeBackend,
}

impl NarrativeClient for Unconfigured {
    fn complete(&self, _prompt: &NarrativePrompt) -> NarrativeResult<String> {
        Err(NarrativeError::MissingApiKey {
            env_var: self.backend.env_key().to_string(),
            signup_url: self.backend.signup_url().to_string(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// One client per model id; the backend is picked from the model name
fn build_clients(settings: &Settings, models: &[String]) -> Vec<Box<dyn NarrativeClient>> {
    models
        .iter()
        .map(|model| {
            let backend = NarrativeBackend::for_model(model);
            match settings.narrative_client(backend, Some(model)) {
                Ok(client) => Box::new(client) as Box<dyn NarrativeClient>,
                Err(e) => {
                    warn!("{}: {}", model, e);
                    Box::new(Unconfigured {
                        model: model.clone(),
                        backend,
                    })
                }
            }
        })
        .collect()
}

pub(super) fn run(
    front: &Path,
    side: Option<&Path>,
    models: Vec<String>,
    output: Option<&Path>,
    workers: Option<usize>,
    config: Option<&Path>,
) -> Result<()> {
    let settings = Settings::load(config)?;
    let (front, side) = load_views(front, side)?;
    let measurements = calculate_all_measurements(&front, side.as_ref());

    let models: Vec<String> = models
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    let models = if models.is_empty() {
        settings.compare_models()
    } else {
        models
    };

    let clients = build_clients(&settings, &models);
    let workers = workers.unwrap_or_else(|| settings.workers());
    let report = compare_models(&measurements, side.is_some(), &clients, workers)
        .context("Failed to start comparison workers")?;

    emit(&render_comparison(&report)?, output)
}
