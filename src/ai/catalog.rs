//! Descriptions of the models known to work with the narrative prompt

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub speed: &'static str,
    pub quality: &'static str,
}

pub static MODEL_CATALOG: [ModelInfo; 5] = [
    ModelInfo {
        id: "gemini-2.0-flash",
        name: "Gemini 2.0 Flash",
        description: "Fastest, cheapest option. Good for quick analysis.",
        speed: "⚡⚡⚡",
        quality: "★★★☆☆",
    },
    ModelInfo {
        id: "gemini-1.5-flash",
        name: "Gemini 1.5 Flash",
        description: "Fast with good quality balance.",
        speed: "⚡⚡",
        quality: "★★★☆☆",
    },
    ModelInfo {
        id: "gemini-1.5-pro",
        name: "Gemini 1.5 Pro",
        description: "Best quality-to-price ratio. Recommended.",
        speed: "⚡",
        quality: "★★★★☆",
    },
    ModelInfo {
        id: "gemini-2.0-pro-exp",
        name: "Gemini 2.0 Pro (Experimental)",
        description: "Latest model, highest quality but experimental.",
        speed: "⚡",
        quality: "★★★★★",
    },
    ModelInfo {
        id: "claude-3-5-sonnet-20241022",
        name: "Claude 3.5 Sonnet",
        description: "Anthropic backend. Detailed, well-structured analysis.",
        speed: "⚡⚡",
        quality: "★★★★☆",
    },
];

/// Catalog entry for a model id (exact match, case-insensitive)
pub fn model_info(id: &str) -> Option<&'static ModelInfo> {
    let id = id.trim();
    MODEL_CATALOG
        .iter()
        .find(|info| info.id.eq_ignore_ascii_case(id))
}
