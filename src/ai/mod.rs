//! Narrative collaborator: text generation around the measurements
//!
//! The rest of the crate only sees one capability, [`NarrativeClient`]:
//! prompt text in, response text out, or a [`NarrativeError`]. Two HTTP
//! backends (Anthropic Claude and Google Gemini) implement it through
//! [`HttpNarrativeClient`]. Uses BYOK (bring your own key): keys come from
//! the config file or environment variables.
//!
//! # Environment Variables
//!
//! - `ANTHROPIC_API_KEY`: Required for the Claude backend
//! - `GOOGLE_API_KEY`: Required for the Gemini backend
//!
//! # Example
//!
//! ```rust,ignore
//! use adamscore::ai::NarrativeBackend;
//! use adamscore::config::Settings;
//! use adamscore::scoring::ScoreSynthesizer;
//!
//! let settings = Settings::load(None)?;
//! let client = settings.narrative_client(NarrativeBackend::Gemini, None)?;
//! let result = ScoreSynthesizer::with_client(&client).analyze(&measurements);
//! ```

pub mod catalog;
mod client;
pub mod compare;
pub mod parser;
pub mod prompts;

pub use catalog::{model_info, ModelInfo, MODEL_CATALOG};
pub use client::{HttpNarrativeClient, NarrativeBackend, NarrativeConfig};
pub use compare::{compare_models, ComparisonReport, ModelOutcome};
pub use parser::{parse_response, ParseError};
pub use prompts::{build_prompt, format_user_prompt, system_prompt};

use thiserror::Error;

/// Errors from a narrative collaborator call.
///
/// None of these reach the caller of
/// [`ScoreSynthesizer::analyze`](crate::scoring::ScoreSynthesizer::analyze);
/// they are logged and replaced by the rule-based result.
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response envelope: {0}")]
    MalformedEnvelope(String),
}

pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// System instructions plus the measurement-specific user message
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativePrompt {
    pub system: String,
    pub user: String,
}

/// Anything that can turn a prompt into free-form response text.
///
/// Implementations must be shareable across worker threads; the
/// comparison fan-out calls several clients concurrently.
pub trait NarrativeClient: Send + Sync {
    fn complete(&self, prompt: &NarrativePrompt) -> NarrativeResult<String>;

    /// Model identifier, used for provenance and reports
    fn model(&self) -> &str;
}
