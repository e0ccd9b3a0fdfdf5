//! Prompt templates for the narrative collaborator
//!
//! The system prompt is static apart from the tier list, which is rendered
//! from [`TIERS`] so the model and the local classifier use the same labels.
//! The user prompt is a deterministic rendering of the measurements.

use crate::ai::NarrativePrompt;
use crate::models::GeometricMeasurements;
use crate::scoring::TIERS;
use std::sync::OnceLock;

const EXPERT_TEMPLATE: &str = include_str!("prompts/aesthetic_expert.txt");

static SYSTEM: OnceLock<String> = OnceLock::new();

/// Expert persona, tier table, ideal ranges and the JSON response schema
pub fn system_prompt() -> &'static str {
    SYSTEM.get_or_init(|| {
        let tiers = TIERS
            .iter()
            .map(|tier| format!("- {} ({}): {}", tier.label, tier.display_range(), tier.description))
            .collect::<Vec<_>>()
            .join("\n");
        EXPERT_TEMPLATE.replace("{tiers}", &tiers)
    })
}

/// Render the measurements into the user message.
///
/// Angles get one decimal and a degree sign; the jaw and midface ratios are
/// percentages with two decimals; thirds and symmetry are percentages with
/// one decimal.
pub fn format_user_prompt(m: &GeometricMeasurements, side_profile: bool) -> String {
    let mut out = String::from(
        "Analyze the following facial measurements and provide a comprehensive aesthetic assessment:\n\n\
         MEASUREMENTS DATA:\n",
    );

    out.push_str(&format!(
        "- Canthal Tilt: {:.1}° (ideal: +4° to +8°)\n",
        m.canthal_tilt
    ));
    out.push_str(&format!(
        "- Bigonial/Bizygomatic Ratio: {:.2}% (ideal: 75-80%)\n",
        m.bigonial_bizygomatic_ratio * 100.0
    ));
    out.push_str(&format!(
        "- Gonial Angle: {:.1}° (ideal: 125-130°)\n",
        m.gonial_angle
    ));
    out.push_str(&format!(
        "- Midface Ratio: {:.2}% (ideal: 43-44%)\n",
        m.midface_ratio * 100.0
    ));
    out.push_str(&format!(
        "- Nasofrontal Angle: {:.1}° (ideal: 130-135°)\n",
        m.nasofrontal_angle
    ));
    out.push_str(&format!(
        "- Facial Thirds: Upper {:.1}%, Middle {:.1}%, Lower {:.1}%\n",
        m.upper_third() * 100.0,
        m.middle_third() * 100.0,
        m.lower_third() * 100.0
    ));
    out.push_str(&format!(
        "- Symmetry Score: {:.1}%\n",
        m.symmetry_score * 100.0
    ));
    if let Some(ipd) = m.ipd_face_ratio {
        out.push_str(&format!(
            "- IPD/Face Width Ratio: {:.1}% (ideal: 42-46%)\n",
            ipd * 100.0
        ));
    }

    let view = if side_profile {
        "Front view + Side profile"
    } else {
        "Front view only"
    };
    out.push_str(&format!(
        "\nAdditional context:\n- Image type analyzed: {}\n\n\
         Please provide your expert analysis in the specified JSON format.",
        view
    ));
    out
}

pub fn build_prompt(m: &GeometricMeasurements, side_profile: bool) -> NarrativePrompt {
    NarrativePrompt {
        system: system_prompt().to_string(),
        user: format_user_prompt(m, side_profile),
    }
}
