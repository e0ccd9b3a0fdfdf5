//! User-level configuration for adamscore
//!
//! Supports loading config from (later wins):
//! - built-in defaults
//! - ~/.config/adamscore/config.toml
//! - an explicit `--config <path>`
//! - environment variables

use crate::ai::{HttpNarrativeClient, NarrativeBackend, NarrativeConfig, NarrativeError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_WORKERS: usize = 4;
pub const MAX_WORKERS: usize = 16;

/// Models used by `compare` when none are configured
pub const DEFAULT_COMPARE_MODELS: [&str; 4] = [
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-2.0-pro-exp",
];

const EXAMPLE_CONFIG: &str = r#"# adamscore user configuration

[narrative]
# Provider: "gemini" (default) or "claude"
# provider = "gemini"

# Keys (environment variables ANTHROPIC_API_KEY / GOOGLE_API_KEY take priority)
# google_api_key = "AIza..."
# anthropic_api_key = "sk-ant-..."

# gemini_model = "gemini-1.5-pro"
# claude_model = "claude-3-5-sonnet-20241022"

# Models used by `adamscore compare`
# compare_models = ["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro", "gemini-2.0-pro-exp"]

# Per-call timeout; on timeout the rule-based score is used
# timeout_secs = 60
# max_tokens = 2000
# temperature = 0.4

# Parallel calls during `compare` (1-16)
# workers = 4
"#;

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub narrative: NarrativeSettings,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NarrativeSettings {
    pub provider: Option<NarrativeBackend>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub claude_model: Option<String>,
    pub gemini_model: Option<String>,
    pub compare_models: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub workers: Option<usize>,
}

impl Settings {
    /// Load settings from every source.
    ///
    /// A broken user file is logged and skipped; a broken explicit file is
    /// an error since the user asked for it.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            match Self::from_file(&path) {
                Ok(user) => {
                    debug!("Loaded user config from {}", path.display());
                    settings.merge(user);
                }
                Err(e) => warn!("Ignoring user config {}: {:#}", path.display(), e),
            }
        }

        if let Some(path) = explicit {
            let file = Self::from_file(path)?;
            debug!("Loaded config from {}", path.display());
            settings.merge(file);
        }

        // Environment variables override everything
        settings.apply_env_with(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("adamscore").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Settings) {
        let ours = &mut self.narrative;
        let theirs = other.narrative;
        if theirs.provider.is_some() {
            ours.provider = theirs.provider;
        }
        if theirs.anthropic_api_key.is_some() {
            ours.anthropic_api_key = theirs.anthropic_api_key;
        }
        if theirs.google_api_key.is_some() {
            ours.google_api_key = theirs.google_api_key;
        }
        if theirs.claude_model.is_some() {
            ours.claude_model = theirs.claude_model;
        }
        if theirs.gemini_model.is_some() {
            ours.gemini_model = theirs.gemini_model;
        }
        if theirs.compare_models.is_some() {
            ours.compare_models = theirs.compare_models;
        }
        if theirs.timeout_secs.is_some() {
            ours.timeout_secs = theirs.timeout_secs;
        }
        if theirs.max_tokens.is_some() {
            ours.max_tokens = theirs.max_tokens;
        }
        if theirs.temperature.is_some() {
            ours.temperature = theirs.temperature;
        }
        if theirs.workers.is_some() {
            ours.workers = theirs.workers;
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Empty values are ignored; unparsable ones are logged and ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let narrative = &mut self.narrative;

        if let Some(key) = get("ANTHROPIC_API_KEY") {
            narrative.anthropic_api_key = Some(key);
        }
        if let Some(key) = get("GOOGLE_API_KEY") {
            narrative.google_api_key = Some(key);
        }
        if let Some(provider) = get("ADAMSCORE_PROVIDER") {
            match provider.parse::<NarrativeBackend>() {
                Ok(backend) => narrative.provider = Some(backend),
                Err(e) => warn!("Ignoring ADAMSCORE_PROVIDER: {}", e),
            }
        }
        if let Some(model) = get("ADAMSCORE_CLAUDE_MODEL") {
            narrative.claude_model = Some(model);
        }
        if let Some(model) = get("ADAMSCORE_GEMINI_MODEL") {
            narrative.gemini_model = Some(model);
        }
        if let Some(timeout) = get("ADAMSCORE_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) => narrative.timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring ADAMSCORE_TIMEOUT_SECS={:?}: not a number of seconds", timeout),
            }
        }
    }

    pub fn provider(&self) -> NarrativeBackend {
        self.narrative.provider.unwrap_or_default()
    }

    pub fn api_key(&self, backend: NarrativeBackend) -> Option<&str> {
        match backend {
            NarrativeBackend::Claude => self.narrative.anthropic_api_key.as_deref(),
            NarrativeBackend::Gemini => self.narrative.google_api_key.as_deref(),
        }
    }

    /// Check if a narrative backend can be used
    pub fn has_key(&self, backend: NarrativeBackend) -> bool {
        self.api_key(backend).is_some()
    }

    pub fn model(&self, backend: NarrativeBackend) -> &str {
        let configured = match backend {
            NarrativeBackend::Claude => self.narrative.claude_model.as_deref(),
            NarrativeBackend::Gemini => self.narrative.gemini_model.as_deref(),
        };
        configured.unwrap_or_else(|| backend.default_model())
    }

    pub fn compare_models(&self) -> Vec<String> {
        match &self.narrative.compare_models {
            Some(models) if !models.is_empty() => models.clone(),
            _ => DEFAULT_COMPARE_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.narrative.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Worker count for model comparison, bounded to 1..=16
    pub fn workers(&self) -> usize {
        self.narrative
            .workers
            .unwrap_or(DEFAULT_WORKERS)
            .clamp(1, MAX_WORKERS)
    }

    /// Client settings for one call; `model` overrides the configured one
    pub fn narrative_config(&self, backend: NarrativeBackend, model: Option<&str>) -> NarrativeConfig {
        NarrativeConfig {
            backend,
            model: Some(model.unwrap_or_else(|| self.model(backend)).to_string()),
            max_tokens: self.narrative.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.narrative.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            timeout: self.timeout(),
        }
    }

    pub fn narrative_client(
        &self,
        backend: NarrativeBackend,
        model: Option<&str>,
    ) -> Result<HttpNarrativeClient, NarrativeError> {
        let api_key = self
            .api_key(backend)
            .ok_or_else(|| NarrativeError::MissingApiKey {
                env_var: backend.env_key().to_string(),
                signup_url: backend.signup_url().to_string(),
            })?;
        Ok(HttpNarrativeClient::new(
            self.narrative_config(backend, model),
            api_key,
        ))
    }

    /// Initialize user config directory and create example config.
    /// Returns the path and whether a file was written.
    pub fn init_user_config() -> Result<(PathBuf, bool)> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        let written = Self::write_example(&config_path)?;
        Ok((config_path, written))
    }

    /// Write the example config to `path` unless a file is already there.
    /// Returns whether a file was written.
    pub fn write_example(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.provider(), NarrativeBackend::Gemini);
        assert_eq!(settings.model(NarrativeBackend::Gemini), "gemini-1.5-pro");
        assert_eq!(
            settings.model(NarrativeBackend::Claude),
            "claude-3-5-sonnet-20241022"
        );
        assert_eq!(settings.timeout(), Duration::from_secs(60));
        assert_eq!(settings.workers(), 4);
        assert_eq!(settings.compare_models().len(), 4);
        assert!(!settings.has_key(NarrativeBackend::Gemini));
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[narrative]
provider = "claude"
anthropic_api_key = "sk-ant-abc"
claude_model = "claude-3-opus-20240229"
compare_models = ["gemini-2.0-flash"]
timeout_secs = 15
workers = 64
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.provider(), NarrativeBackend::Claude);
        assert_eq!(settings.api_key(NarrativeBackend::Claude), Some("sk-ant-abc"));
        assert_eq!(settings.model(NarrativeBackend::Claude), "claude-3-opus-20240229");
        assert_eq!(settings.compare_models(), vec!["gemini-2.0-flash".to_string()]);
        assert_eq!(settings.timeout(), Duration::from_secs(15));
        assert_eq!(settings.workers(), MAX_WORKERS);
    }

    #[test]
    fn test_toml_parsing_minimal() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(toml::from_str::<Settings>("this is [[ not valid toml {{{}}}").is_err());
        assert!(toml::from_str::<Settings>("[narrative]\nprovider = \"openai\"").is_err());
        assert!(toml::from_str::<Settings>("[narrative]\ntimout_secs = 5").is_err());
    }

    #[test]
    fn test_merge_overrides_set_fields() {
        let mut base = Settings::default();
        base.narrative.google_api_key = Some("AIza-original".into());
        base.narrative.workers = Some(2);

        let mut other = Settings::default();
        other.narrative.google_api_key = Some("AIza-new".into());
        other.narrative.gemini_model = Some("gemini-2.0-flash".into());
        base.merge(other);

        assert_eq!(base.api_key(NarrativeBackend::Gemini), Some("AIza-new"));
        assert_eq!(base.model(NarrativeBackend::Gemini), "gemini-2.0-flash");
        assert_eq!(base.workers(), 2);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.narrative.anthropic_api_key = Some("from-file".into());
        settings.apply_env_with(env(&[
            ("ANTHROPIC_API_KEY", "from-env"),
            ("GOOGLE_API_KEY", ""),
            ("ADAMSCORE_PROVIDER", "claude"),
            ("ADAMSCORE_TIMEOUT_SECS", "5"),
            ("ADAMSCORE_GEMINI_MODEL", "gemini-1.5-flash"),
        ]));
        assert_eq!(settings.api_key(NarrativeBackend::Claude), Some("from-env"));
        assert_eq!(settings.api_key(NarrativeBackend::Gemini), None);
        assert_eq!(settings.provider(), NarrativeBackend::Claude);
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.model(NarrativeBackend::Gemini), "gemini-1.5-flash");
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut settings = Settings::default();
        settings.narrative.timeout_secs = Some(30);
        settings.apply_env_with(env(&[
            ("ADAMSCORE_PROVIDER", "openai"),
            ("ADAMSCORE_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(settings.provider(), NarrativeBackend::Gemini);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_narrative_client_requires_key() {
        let settings = Settings::default();
        let err = settings
            .narrative_client(NarrativeBackend::Claude, None)
            .err()
            .expect("missing key");
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let mut keyed = Settings::default();
        keyed.narrative.google_api_key = Some("AIza-test".into());
        let client = keyed
            .narrative_client(NarrativeBackend::Gemini, Some("gemini-2.0-flash"))
            .expect("client");
        assert_eq!(client.config().model(), "gemini-2.0-flash");
        assert_eq!(client.config().max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_explicit_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(Settings::write_example(&path).unwrap());
        assert!(!Settings::write_example(&path).unwrap());

        // the example is all comments, so it parses to defaults
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[narrative]\nworkers = \"many\"").unwrap();
        assert!(Settings::load(Some(path.as_path())).is_err());
        assert!(Settings::from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_user_config_path() {
        if let Some(p) = Settings::user_config_path() {
            assert!(p.ends_with("adamscore/config.toml"));
        }
    }
}
