//! Reference tables: tiers, landmark indices, ideal bands, comparison models

use crate::ai::{model_info, NarrativeBackend};
use crate::config::Settings;
use crate::landmarks::{LandmarkName, EXPECTED_LANDMARKS};
use crate::scoring::{IDEAL_RANGES, TIERS};
use anyhow::Result;
use console::style;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

pub(super) fn tiers(format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&TIERS)?);
        return Ok(());
    }

    println!("\n{}", style("Tiers").bold());
    println!("{}", style("──────────────────────────────────────").dim());
    // Highest tier first
    for tier in TIERS.iter().rev() {
        println!(
            "  {:<10} {:>9}  {}",
            style(tier.label).cyan().bold(),
            tier.display_range(),
            style(tier.description).dim()
        );
    }
    println!();
    Ok(())
}

fn landmark_json() -> Value {
    let key_landmarks: Map<String, Value> = LandmarkName::all()
        .map(|name| (name.as_str().to_string(), json!(name.index())))
        .collect();
    json!({
        "total_landmarks": EXPECTED_LANDMARKS,
        "key_landmarks": key_landmarks,
        "ideal_values": IDEAL_RANGES,
    })
}

pub(super) fn landmarks(format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&landmark_json())?);
        return Ok(());
    }

    println!(
        "\n{} ({} points)",
        style("Landmarks").bold(),
        EXPECTED_LANDMARKS
    );
    println!("{}", style("──────────────────────────────────────").dim());
    for name in LandmarkName::all() {
        println!("  {:<20} {:>3}", name.as_str(), style(name.index()).cyan());
    }

    println!("\n{}", style("Ideal ranges").bold());
    println!("{}", style("──────────────────────────────────────").dim());
    for range in IDEAL_RANGES.iter() {
        let band = match range.max {
            Some(max) => format!("{} - {} {}", range.min, max, range.unit),
            None => format!(">= {} {}", range.min, range.unit),
        };
        println!(
            "  {:<28} {:<18} {}",
            range.key,
            style(band.trim_end()).green(),
            style(range.description).dim()
        );
    }
    println!();
    Ok(())
}

/// One configured comparison model, described from the catalog when known
#[derive(Debug, Serialize)]
struct ModelListing {
    id: String,
    name: String,
    description: String,
    speed: String,
    quality: String,
    backend: NarrativeBackend,
    key_configured: bool,
}

fn model_listing(settings: &Settings) -> Vec<ModelListing> {
    settings
        .compare_models()
        .into_iter()
        .map(|id| {
            let backend = NarrativeBackend::for_model(&id);
            let key_configured = settings.has_key(backend);
            match model_info(&id) {
                Some(info) => ModelListing {
                    id,
                    name: info.name.to_string(),
                    description: info.description.to_string(),
                    speed: info.speed.to_string(),
                    quality: info.quality.to_string(),
                    backend,
                    key_configured,
                },
                None => ModelListing {
                    name: id.clone(),
                    id,
                    description: "Not in the built-in catalog.".to_string(),
                    speed: String::new(),
                    quality: String::new(),
                    backend,
                    key_configured,
                },
            }
        })
        .collect()
}

pub(super) fn models(format: &str, config: Option<&Path>) -> Result<()> {
    let settings = Settings::load(config)?;
    let listing = model_listing(&settings);

    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "models": listing }))?
        );
        return Ok(());
    }

    println!("\n{}", style("Comparison models").bold());
    println!("{}", style("──────────────────────────────────────").dim());
    for model in &listing {
        let key = if model.key_configured {
            style("key set".to_string()).green()
        } else {
            style(format!("no {}", model.backend.env_key())).yellow()
        };
        println!(
            "  {:<30} {:<6} {:<6} {}",
            style(&model.name).cyan().bold(),
            model.speed,
            model.quality,
            key
        );
        println!("    {}  {}", style(&model.id).dim(), model.description);
    }
    println!();
    Ok(())
}
