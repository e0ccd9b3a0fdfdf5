//! Merge measurements with narrative output into one bounded result
//!
//! [`ScoreSynthesizer`] never fails. A missing client, a failed or timed-out
//! call and an unparsable reply all end in the rule-based result from
//! [`fallback_analysis`]; a parsed reply is validated field by field so
//! whatever the model returned is clamped into range.

use super::fallback::fallback_analysis;
use super::tiers::tier_label;
use super::{clamp_score, NEUTRAL_SCORE};
use crate::ai::{build_prompt, parse_response, NarrativeClient};
use crate::models::{AnalysisResult, GeometricMeasurements, RadarScores};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const DEFAULT_ANALYSIS: &str = "Analysis not available.";
pub const DEFAULT_ADVICE: &str = "No specific recommendations.";

/// Where a result came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultSource {
    Narrative { model: String },
    Fallback { reason: String },
}

impl ResultSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ResultSource::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub result: AnalysisResult,
    pub source: ResultSource,
}

impl Reconciled {
    fn fallback(measurements: &GeometricMeasurements, reason: impl Into<String>) -> Self {
        Self {
            result: fallback_analysis(measurements),
            source: ResultSource::Fallback {
                reason: reason.into(),
            },
        }
    }
}

/// Narrative-backed scorer with a rule-based safety net
#[derive(Clone, Copy)]
pub struct ScoreSynthesizer<'a> {
    client: Option<&'a dyn NarrativeClient>,
    side_profile: bool,
}

impl<'a> ScoreSynthesizer<'a> {
    /// Rule-based scoring only
    pub fn offline() -> Self {
        Self {
            client: None,
            side_profile: false,
        }
    }

    pub fn with_client(client: &'a dyn NarrativeClient) -> Self {
        Self {
            client: Some(client),
            side_profile: false,
        }
    }

    /// Whether the measurements include a side profile (mentioned in the prompt)
    pub fn side_profile(mut self, used: bool) -> Self {
        self.side_profile = used;
        self
    }

    /// Score `measurements`, reporting which path produced the result
    pub fn reconcile(&self, measurements: &GeometricMeasurements) -> Reconciled {
        let Some(client) = self.client else {
            debug!("No narrative client configured, using rule-based scoring");
            return Reconciled::fallback(measurements, "no narrative client configured");
        };

        let prompt = build_prompt(measurements, self.side_profile);
        match client.complete(&prompt) {
            Ok(text) => Self::reconcile_response(&text, measurements, client.model()),
            Err(e) => {
                warn!("Narrative call to {} failed: {}; using rule-based scoring", client.model(), e);
                Reconciled::fallback(measurements, e.to_string())
            }
        }
    }

    /// Reconcile an already obtained response text
    pub fn reconcile_response(
        text: &str,
        measurements: &GeometricMeasurements,
        model: &str,
    ) -> Reconciled {
        match parse_response(text) {
            Ok(data) => Reconciled {
                result: validate_response(&data, measurements),
                source: ResultSource::Narrative {
                    model: model.to_string(),
                },
            },
            Err(e) => {
                warn!("Unusable response from {}: {}; using rule-based scoring", model, e);
                Reconciled::fallback(measurements, e.to_string())
            }
        }
    }

    pub fn analyze(&self, measurements: &GeometricMeasurements) -> AnalysisResult {
        self.reconcile(measurements).result
    }
}

/// Number from a JSON number or numeric string; non-finite values count as absent
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn text(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Build a complete result from parsed narrative data.
///
/// Never fails: absent or malformed fields take their defaults and every
/// score is clamped into [1, 10].
pub fn validate_response(
    data: &Map<String, Value>,
    measurements: &GeometricMeasurements,
) -> AnalysisResult {
    let score = clamp_score(number(data.get("score")).unwrap_or(NEUTRAL_SCORE));

    let radar_raw = data.get("radar_data").and_then(Value::as_object);
    let axis = |name: &str| {
        number(radar_raw.and_then(|radar| radar.get(name))).unwrap_or(NEUTRAL_SCORE)
    };
    let radar = RadarScores::clamped(
        axis("eyes"),
        axis("jaw"),
        axis("midface"),
        axis("symmetry"),
        axis("harmony"),
    );

    let tier = data
        .get("tier")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map_or_else(|| tier_label(score).to_string(), str::to_string);

    AnalysisResult {
        score,
        tier,
        analysis: text(data.get("analysis"), DEFAULT_ANALYSIS),
        strengths: string_list(data.get("strengths")),
        weaknesses: string_list(data.get("weaknesses")),
        advice: text(data.get("advice"), DEFAULT_ADVICE),
        radar,
        measurements: *measurements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::StubClient;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_offline_uses_fallback() {
        let m = GeometricMeasurements::default();
        let reconciled = ScoreSynthesizer::offline().reconcile(&m);
        assert!(reconciled.source.is_fallback());
        assert_eq!(reconciled.result, fallback_analysis(&m));
    }

    #[test]
    fn test_narrative_response_is_used() {
        let reply = r#"Here you go:
```json
{
  "score": 7.2,
  "tier": "Chadlite",
  "analysis": "Strong jaw.",
  "strengths": ["Jaw", "Eyes"],
  "weaknesses": ["Midface"],
  "advice": "Keep mewing.",
  "radar_data": {"eyes": 8, "jaw": 7.5, "midface": 6, "symmetry": 9, "harmony": 7}
}
```"#;
        let client = StubClient::replying("gemini-2.0-flash", reply);
        let m = GeometricMeasurements::default();
        let reconciled = ScoreSynthesizer::with_client(&client).reconcile(&m);

        assert_eq!(
            reconciled.source,
            ResultSource::Narrative {
                model: "gemini-2.0-flash".into()
            }
        );
        let result = reconciled.result;
        assert_eq!(result.score, 7.2);
        assert_eq!(result.tier, "Chadlite");
        assert_eq!(result.strengths, vec!["Jaw".to_string(), "Eyes".to_string()]);
        assert_eq!(result.radar.jaw, 7.5);
        assert_eq!(result.advice, "Keep mewing.");
        assert_eq!(result.measurements, m);
    }

    #[test]
    fn test_failed_call_falls_back() {
        let client = StubClient::failing("claude-3-5-sonnet-20241022");
        let m = GeometricMeasurements::default();
        let reconciled = ScoreSynthesizer::with_client(&client).reconcile(&m);
        match &reconciled.source {
            ResultSource::Fallback { reason } => assert!(reason.contains("connection refused")),
            other => panic!("expected fallback, got {:?}", other),
        }
        assert_eq!(reconciled.result, fallback_analysis(&m));
    }

    #[test]
    fn test_prose_reply_falls_back() {
        let client = StubClient::replying("gemini-1.5-pro", "I can't rate faces, sorry.");
        let result = ScoreSynthesizer::with_client(&client).analyze(&GeometricMeasurements::default());
        assert_eq!(result, fallback_analysis(&GeometricMeasurements::default()));
    }

    #[test]
    fn test_adversarial_scores_are_clamped() {
        let m = GeometricMeasurements::default();

        let high = validate_response(
            &object(json!({"score": 999, "radar_data": {"eyes": -5, "jaw": 42}})),
            &m,
        );
        assert_eq!(high.score, 10.0);
        assert_eq!(high.radar.eyes, 1.0);
        assert_eq!(high.radar.jaw, 10.0);
        assert_eq!(high.radar.midface, 5.0);
        assert_eq!(high.tier, "Adam");

        let garbage = validate_response(&object(json!({"score": "abc"})), &m);
        assert_eq!(garbage.score, 5.0);
        assert_eq!(garbage.tier, "Normie");

        let negative = validate_response(&object(json!({"score": -3.5})), &m);
        assert_eq!(negative.score, 1.0);
        assert_eq!(negative.tier, "Sub 3");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let result = validate_response(&Map::new(), &GeometricMeasurements::default());
        assert_eq!(result.score, NEUTRAL_SCORE);
        assert_eq!(result.tier, "Normie");
        assert_eq!(result.analysis, DEFAULT_ANALYSIS);
        assert_eq!(result.advice, DEFAULT_ADVICE);
        assert!(result.strengths.is_empty());
        assert!(result.weaknesses.is_empty());
        assert_eq!(result.radar, RadarScores::default());
    }

    #[test]
    fn test_loose_field_shapes() {
        let result = validate_response(
            &object(json!({
                "score": " 6.4 ",
                "tier": "  ",
                "strengths": "Good symmetry",
                "weaknesses": ["Recessed chin", null, 3],
                "analysis": null,
                "radar_data": {"eyes": "8.5", "harmony": "n/a"}
            })),
            &GeometricMeasurements::default(),
        );
        assert_eq!(result.score, 6.4);
        assert_eq!(result.tier, "HTN");
        assert_eq!(result.strengths, vec!["Good symmetry".to_string()]);
        assert_eq!(result.weaknesses, vec!["Recessed chin".to_string(), "3".to_string()]);
        assert_eq!(result.analysis, DEFAULT_ANALYSIS);
        assert_eq!(result.radar.eyes, 8.5);
        assert_eq!(result.radar.harmony, 5.0);
    }

    #[test]
    fn test_reconcile_response_directly() {
        let m = GeometricMeasurements::default();
        let ok = ScoreSynthesizer::reconcile_response("{\"score\": 8}", &m, "gemini-2.0-flash");
        assert!(!ok.source.is_fallback());
        assert_eq!(ok.result.tier, "Chad");

        let bad = ScoreSynthesizer::reconcile_response("[1, 2, 3]", &m, "gemini-2.0-flash");
        assert!(bad.source.is_fallback());
    }
}
