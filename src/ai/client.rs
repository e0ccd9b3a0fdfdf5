//! HTTP narrative client for Anthropic Claude and Google Gemini
//!
//! Both backends sit behind one struct; which one is used is an explicit
//! constructor parameter. Uses ureq (sync HTTP), so no async runtime is
//! needed and calls fan out on plain worker threads.

use crate::ai::{NarrativeClient, NarrativeError, NarrativePrompt, NarrativeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Supported narrative backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeBackend {
    Claude,
    #[default]
    Gemini,
}

impl NarrativeBackend {
    pub fn env_key(&self) -> &'static str {
        match self {
            NarrativeBackend::Claude => "ANTHROPIC_API_KEY",
            NarrativeBackend::Gemini => "GOOGLE_API_KEY",
        }
    }

    pub fn signup_url(&self) -> &'static str {
        match self {
            NarrativeBackend::Claude => "https://console.anthropic.com/settings/keys",
            NarrativeBackend::Gemini => "https://aistudio.google.com/app/apikey",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            NarrativeBackend::Claude => "claude-3-5-sonnet-20241022",
            NarrativeBackend::Gemini => "gemini-1.5-pro",
        }
    }

    /// Backend serving a model id (`claude-*` on Anthropic, anything else on Gemini)
    pub fn for_model(model: &str) -> Self {
        if model.trim().to_lowercase().starts_with("claude") {
            NarrativeBackend::Claude
        } else {
            NarrativeBackend::Gemini
        }
    }

    /// Endpoint for one call. Gemini puts the model in the path.
    pub fn api_url(&self, model: &str) -> String {
        match self {
            NarrativeBackend::Claude => ANTHROPIC_API_URL.to_string(),
            NarrativeBackend::Gemini => format!("{}/{}:generateContent", GEMINI_API_BASE, model),
        }
    }
}

impl fmt::Display for NarrativeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeBackend::Claude => write!(f, "claude"),
            NarrativeBackend::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for NarrativeBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(NarrativeBackend::Claude),
            "gemini" | "google" => Ok(NarrativeBackend::Gemini),
            _ => Err(format!("Unknown provider '{}'. Valid: claude, gemini", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub backend: NarrativeBackend,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            backend: NarrativeBackend::default(),
            model: None,
            max_tokens: 2000,
            temperature: 0.4,
            timeout: Duration::from_secs(60),
        }
    }
}

impl NarrativeConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }
}

/// Narrative client over HTTP (sync, via ureq)
pub struct HttpNarrativeClient {
    config: NarrativeConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are mapped to NarrativeError::Api below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl HttpNarrativeClient {
    pub fn new(config: NarrativeConfig, api_key: impl Into<String>) -> Self {
        let agent = make_agent(config.timeout);
        Self {
            config,
            api_key: api_key.into(),
            agent,
        }
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    fn transport_error(&self, err: ureq::Error) -> NarrativeError {
        match err {
            ureq::Error::Timeout(_) => NarrativeError::Timeout(self.config.timeout.as_secs()),
            other => NarrativeError::Transport(other.to_string()),
        }
    }

    fn post<B: Serialize>(
        &self,
        request: ureq::RequestBuilder<ureq::typestate::WithBody>,
        body: &B,
    ) -> NarrativeResult<ureq::http::Response<ureq::Body>> {
        let response = request
            .header("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(NarrativeError::Api {
                status,
                message: error_text,
            });
        }
        Ok(response)
    }

    fn complete_claude(&self, prompt: &NarrativePrompt) -> NarrativeResult<String> {
        let body = ClaudeRequest::new(&self.config, prompt);
        let request = self
            .agent
            .post(&self.config.backend.api_url(self.config.model()))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);

        let response: ClaudeResponse = self
            .post(request, &body)?
            .into_body()
            .read_json()
            .map_err(|e| NarrativeError::MalformedEnvelope(e.to_string()))?;

        response.into_text()
    }

    fn complete_gemini(&self, prompt: &NarrativePrompt) -> NarrativeResult<String> {
        let body = GeminiRequest::new(&self.config, prompt);
        let request = self
            .agent
            .post(&self.config.backend.api_url(self.config.model()))
            .header("x-goog-api-key", &self.api_key);

        let response: GeminiResponse = self
            .post(request, &body)?
            .into_body()
            .read_json()
            .map_err(|e| NarrativeError::MalformedEnvelope(e.to_string()))?;

        response.into_text()
    }
}

impl NarrativeClient for HttpNarrativeClient {
    fn complete(&self, prompt: &NarrativePrompt) -> NarrativeResult<String> {
        let started = Instant::now();
        debug!(
            "Calling {} ({}) with {} prompt bytes",
            self.config.backend,
            self.config.model(),
            prompt.system.len() + prompt.user.len()
        );

        let result = match self.config.backend {
            NarrativeBackend::Claude => self.complete_claude(prompt),
            NarrativeBackend::Gemini => self.complete_gemini(prompt),
        };

        debug!(
            "{} responded in {:.2}s (ok: {})",
            self.config.model(),
            started.elapsed().as_secs_f64(),
            result.is_ok()
        );
        result
    }

    fn model(&self) -> &str {
        self.config.model()
    }
}

// Anthropic Messages API types
#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ClaudeMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ClaudeRequest<'a> {
    fn new(config: &'a NarrativeConfig, prompt: &'a NarrativePrompt) -> Self {
        Self {
            model: config.model(),
            max_tokens: config.max_tokens,
            system: &prompt.system,
            messages: vec![ClaudeMessage {
                role: "user",
                content: &prompt.user,
            }],
            temperature: config.temperature,
        }
    }
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

impl ClaudeResponse {
    fn into_text(self) -> NarrativeResult<String> {
        self.content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .ok_or_else(|| NarrativeError::MalformedEnvelope("No text content in response".into()))
    }
}

// Gemini generateContent types. The system prompt is sent inline ahead of
// the user message.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiRequest {
    fn new(config: &NarrativeConfig, prompt: &NarrativePrompt) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".into()),
                parts: vec![GeminiPart {
                    text: format!("{}\n\n{}", prompt.system, prompt.user),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_tokens,
            },
        }
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    fn into_text(self) -> NarrativeResult<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(NarrativeError::MalformedEnvelope(
                "No candidate text in response".into(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> NarrativePrompt {
        NarrativePrompt {
            system: "be an expert".into(),
            user: "measure this".into(),
        }
    }

    #[test]
    fn test_backend_defaults() {
        assert_eq!(NarrativeBackend::default(), NarrativeBackend::Gemini);
        assert_eq!(
            NarrativeBackend::Claude.default_model(),
            "claude-3-5-sonnet-20241022"
        );
        assert_eq!(
            NarrativeBackend::Gemini.api_url("gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("Claude".parse::<NarrativeBackend>(), Ok(NarrativeBackend::Claude));
        assert_eq!("google".parse::<NarrativeBackend>(), Ok(NarrativeBackend::Gemini));
        assert!("openai".parse::<NarrativeBackend>().is_err());
        assert_eq!(NarrativeBackend::Claude.to_string(), "claude");
    }

    #[test]
    fn test_backend_for_model() {
        assert_eq!(NarrativeBackend::for_model("claude-3-5-sonnet-20241022"), NarrativeBackend::Claude);
        assert_eq!(NarrativeBackend::for_model("gemini-2.0-flash"), NarrativeBackend::Gemini);
        assert_eq!(NarrativeBackend::for_model("custom-model"), NarrativeBackend::Gemini);
    }

    #[test]
    fn test_config_model() {
        let config = NarrativeConfig::default();
        assert_eq!(config.model(), "gemini-1.5-pro");

        let config = NarrativeConfig {
            model: Some("gemini-2.0-flash".to_string()),
            ..Default::default()
        };
        assert_eq!(config.model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_claude_request_shape() {
        let config = NarrativeConfig {
            backend: NarrativeBackend::Claude,
            ..Default::default()
        };
        let p = prompt();
        let json = serde_json::to_value(ClaudeRequest::new(&config, &p)).expect("serialize");
        assert_eq!(json["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["system"], "be an expert");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "measure this");
    }

    #[test]
    fn test_gemini_request_shape() {
        let p = prompt();
        let json =
            serde_json::to_value(GeminiRequest::new(&NarrativeConfig::default(), &p)).expect("serialize");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "be an expert\n\nmeasure this"
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2000);
    }

    #[test]
    fn test_claude_envelope() {
        let response: ClaudeResponse = serde_json::from_str(
            r#"{"content": [{"type": "tool_use"}, {"type": "text", "text": "{\"score\": 7}"}]}"#,
        )
        .expect("parse envelope");
        assert_eq!(response.into_text().expect("text"), "{\"score\": 7}");

        let empty: ClaudeResponse = serde_json::from_str(r#"{"content": []}"#).expect("parse");
        assert!(matches!(
            empty.into_text(),
            Err(NarrativeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_gemini_envelope() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "{\"score\""}, {"text": ": 8}"}]}}]}"#,
        )
        .expect("parse envelope");
        assert_eq!(response.into_text().expect("text"), "{\"score\": 8}");

        let blocked: GeminiResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).expect("parse");
        assert!(blocked.into_text().is_err());
    }
}
