//! Text (terminal) reporter with colors and formatting

use crate::models::GeometricMeasurements;
use crate::scoring::{ideal_range, Reconciled, ResultSource};
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Score colors (ANSI escape codes)
fn score_color(score: f64) -> &'static str {
    if score >= 8.0 {
        GREEN
    } else if score >= 6.0 {
        "\x1b[92m" // Light green
    } else if score >= 5.0 {
        "\x1b[33m" // Yellow
    } else if score >= 3.0 {
        "\x1b[91m" // Light red
    } else {
        RED
    }
}

/// Ten-cell bar for a 1-10 score
fn bar(score: f64) -> String {
    let filled = score.round().clamp(0.0, 10.0) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Marker for whether a measurement sits in its ideal band
fn ideal_mark(key: &str, value: f64) -> String {
    match ideal_range(key) {
        Some(range) if range.contains(value) => format!("{GREEN}ideal{RESET}"),
        Some(range) => match range.max {
            Some(max) => format!("{DIM}ideal {}-{}{RESET}", range.min, max),
            None => format!("{DIM}ideal >= {}{RESET}", range.min),
        },
        None => String::new(),
    }
}

fn measurement_lines(m: &GeometricMeasurements) -> Vec<(String, String, String)> {
    let mut lines = vec![
        (
            "Canthal tilt".to_string(),
            format!("{:+.1}°", m.canthal_tilt),
            ideal_mark("canthal_tilt", m.canthal_tilt),
        ),
        (
            "Bigonial/bizygomatic".to_string(),
            format!("{:.1}%", m.bigonial_bizygomatic_ratio * 100.0),
            ideal_mark("bigonial_bizygomatic_ratio", m.bigonial_bizygomatic_ratio),
        ),
        (
            "Gonial angle".to_string(),
            format!("{:.1}°", m.gonial_angle),
            ideal_mark("gonial_angle", m.gonial_angle),
        ),
        (
            "Midface ratio".to_string(),
            format!("{:.1}%", m.midface_ratio * 100.0),
            ideal_mark("midface_ratio", m.midface_ratio),
        ),
        (
            "Nasofrontal angle".to_string(),
            format!("{:.1}°", m.nasofrontal_angle),
            ideal_mark("nasofrontal_angle", m.nasofrontal_angle),
        ),
        (
            "Facial thirds".to_string(),
            format!(
                "{:.1}/{:.1}/{:.1}%",
                m.upper_third() * 100.0,
                m.middle_third() * 100.0,
                m.lower_third() * 100.0
            ),
            String::new(),
        ),
        (
            "Symmetry".to_string(),
            format!("{:.1}%", m.symmetry_score * 100.0),
            ideal_mark("symmetry", m.symmetry_score),
        ),
    ];
    if let Some(ipd) = m.ipd_face_ratio {
        lines.push((
            "IPD/face width".to_string(),
            format!("{:.1}%", ipd * 100.0),
            ideal_mark("ipd_face_ratio", ipd),
        ));
    }
    lines
}

/// Render an analysis as formatted terminal output
pub fn render(analysis: &Reconciled) -> Result<String> {
    let result = &analysis.result;
    let mut out = String::new();

    // Header
    let score_c = score_color(result.score);
    out.push_str(&format!("\n{BOLD}adamscore analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {score_c}{BOLD}{:.1}/10{RESET}  Tier: {score_c}{BOLD}{}{RESET}\n",
        result.score, result.tier
    ));
    match &analysis.source {
        ResultSource::Narrative { model } => {
            out.push_str(&format!("{DIM}Narrative by {}{RESET}\n\n", model))
        }
        ResultSource::Fallback { reason } => out.push_str(&format!(
            "{DIM}Rule-based scoring ({}){RESET}\n\n",
            reason
        )),
    }

    // Radar
    out.push_str(&format!("{BOLD}PROFILE{RESET}\n"));
    for (axis, score) in result.radar.as_array() {
        out.push_str(&format!(
            "  {:<10} {}{}{RESET} {:>4.1}\n",
            axis,
            score_color(score),
            bar(score),
            score
        ));
    }
    out.push('\n');

    // Measurements
    out.push_str(&format!("{BOLD}MEASUREMENTS{RESET}\n"));
    for (label, value, mark) in measurement_lines(&result.measurements) {
        out.push_str(&format!("  {:<22} {:>16}  {}\n", label, value, mark));
    }
    out.push('\n');

    // Narrative
    out.push_str(&format!("{BOLD}ANALYSIS{RESET}\n  {}\n\n", result.analysis));

    if !result.strengths.is_empty() {
        out.push_str(&format!("{BOLD}STRENGTHS{RESET}\n"));
        for strength in &result.strengths {
            out.push_str(&format!("  {GREEN}+{RESET} {}\n", strength));
        }
        out.push('\n');
    }
    if !result.weaknesses.is_empty() {
        out.push_str(&format!("{BOLD}WEAKNESSES{RESET}\n"));
        for weakness in &result.weaknesses {
            out.push_str(&format!("  {RED}-{RESET} {}\n", weakness));
        }
        out.push('\n');
    }

    out.push_str(&format!("{BOLD}ADVICE{RESET}\n  {}\n", result.advice));
    Ok(out)
}
