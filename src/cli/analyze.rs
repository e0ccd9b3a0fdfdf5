//! Measure and analyze commands

use super::{emit, load_landmarks};
use crate::ai::NarrativeBackend;
use crate::config::Settings;
use crate::geometry::calculate_all_measurements;
use crate::landmarks::LandmarkSet;
use crate::reporters::{self, render_measurements};
use crate::scoring::ScoreSynthesizer;
use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

pub(super) struct AnalyzeArgs<'a> {
    pub front: &'a Path,
    pub side: Option<&'a Path>,
    pub format: &'a str,
    pub output: Option<&'a Path>,
    pub offline: bool,
    pub provider: Option<NarrativeBackend>,
    pub model: Option<&'a str>,
    pub config: Option<&'a Path>,
}

/// Front set plus the side set when one was given and is non-empty
pub(super) fn load_views(front: &Path, side: Option<&Path>) -> Result<(LandmarkSet, Option<LandmarkSet>)> {
    let front = load_landmarks(front)?;
    let side = match side {
        Some(path) => Some(load_landmarks(path)?).filter(|set| !set.points().is_empty()),
        None => None,
    };
    Ok((front, side))
}

pub(super) fn measure(front: &Path, side: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let (front, side) = load_views(front, side)?;
    let measurements = calculate_all_measurements(&front, side.as_ref());
    emit(&render_measurements(&measurements)?, output)
}

pub(super) fn run(args: AnalyzeArgs<'_>) -> Result<()> {
    let start = Instant::now();
    let (front, side) = load_views(args.front, args.side)?;
    let measurements = calculate_all_measurements(&front, side.as_ref());

    let client = if args.offline {
        None
    } else {
        let settings = Settings::load(args.config)?;
        let backend = args.provider.unwrap_or_else(|| settings.provider());
        match settings.narrative_client(backend, args.model) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("{}; using rule-based scoring", e);
                None
            }
        }
    };

    let synthesizer = match &client {
        Some(client) => ScoreSynthesizer::with_client(client),
        None => ScoreSynthesizer::offline(),
    }
    .side_profile(side.is_some());

    let analysis = synthesizer.reconcile(&measurements);
    info!(
        "Scored {:.1} ({}) in {:.2}s",
        analysis.result.score,
        analysis.result.tier,
        start.elapsed().as_secs_f64()
    );

    emit(&reporters::report(&analysis, args.format)?, args.output)
}
