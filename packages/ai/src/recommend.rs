//! Recommendation prompt construction and response handling.
//!
//! The model is instructed to answer in strict JSON, but generative models
//! routinely wrap JSON in Markdown code fences — the response is cleaned
//! before parsing, and a response that still doesn't parse is carried as
//! raw text with a "Failed to parse JSON" summary rather than rejected.

use crate::AiError;
use crate::providers::TextProvider;

/// Summary reported when no provider is configured.
const NO_KEY_SUMMARY: &str = "Set GEMINI_API_KEY in the environment to use Gemini.";

/// Pollutant figures fed into the prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantFigures {
    /// Nitrogen dioxide.
    pub no2: f64,
    /// Ozone.
    pub o3: f64,
    /// Formaldehyde.
    pub ch2o: f64,
    /// Particulate matter.
    pub pm: f64,
}

impl PollutantFigures {
    /// Current best-available figures.
    ///
    /// TODO: replace with the ML prediction service call once it is
    /// deployed; these are its documented placeholder outputs.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            no2: 12.34,
            o3: 56.78,
            ch2o: 9.10,
            pm: 23.45,
        }
    }

    /// The maximum of the four figures.
    #[must_use]
    pub fn max(&self) -> f64 {
        [self.no2, self.o3, self.pm, self.ch2o]
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Everything the prompt needs about one request.
#[derive(Debug, Clone)]
pub struct RecommendationInput {
    /// Country the user asked about.
    pub country_id: i64,
    /// User-selected date, if any.
    pub out_date: Option<String>,
    /// Names of the user's preference/risk tags.
    pub tag_names: Vec<String>,
    /// Pollutant figures to reason over.
    pub figures: PollutantFigures,
}

/// The model's response plus a human-readable outcome summary.
#[derive(Debug, Clone)]
pub struct RecommendationOutcome {
    /// Parsed JSON recommendation, or the raw text / an error object when
    /// parsing wasn't possible.
    pub response: serde_json::Value,
    /// `"OK"`, `"Failed to parse JSON"`, or the missing-key notice.
    pub summary: String,
}

/// Runs the recommendation flow against `provider`.
///
/// A `None` provider (no API key configured) degrades gracefully to an
/// explanatory response instead of failing the request.
///
/// # Errors
///
/// Returns [`AiError`] if the provider call itself fails.
pub async fn recommend(
    provider: Option<&dyn TextProvider>,
    input: &RecommendationInput,
) -> Result<RecommendationOutcome, AiError> {
    let Some(provider) = provider else {
        return Ok(RecommendationOutcome {
            response: serde_json::json!({ "error": "No API key configured" }),
            summary: NO_KEY_SUMMARY.to_string(),
        });
    };

    let prompt = build_prompt(input);
    let raw = provider.generate(&prompt).await?;
    let cleaned = strip_code_fences(&raw);

    Ok(serde_json::from_str::<serde_json::Value>(cleaned).map_or_else(
        |_| {
            log::warn!("Gemini response was not valid JSON");
            RecommendationOutcome {
                response: serde_json::Value::String(raw.clone()),
                summary: "Failed to parse JSON".to_string(),
            }
        },
        |parsed| RecommendationOutcome {
            response: parsed,
            summary: "OK".to_string(),
        },
    ))
}

/// Builds the strict-JSON recommendation prompt.
#[must_use]
pub fn build_prompt(input: &RecommendationInput) -> String {
    let figures = &input.figures;
    let tags = if input.tag_names.is_empty() {
        "N/A".to_string()
    } else {
        input.tag_names.join(", ")
    };
    let date = input.out_date.as_deref().unwrap_or("N/A");

    format!(
        r#"You are an environmental health assistant. Using the air quality data and user context below, produce a concise, actionable recommendation in **strict JSON** that follows the provided schema. Do not include any extra commentary—return **only** valid JSON.

## Context
- Country: {country}
- Date (user-selected): {date}
- User tags (preferences & risk): {tags}

## Pollutants (current best available; units vary by pollutant)
- NO2: {no2}
- O3: {o3}
- PM: {pm}
- CH2O: {ch2o}
- AI (max of above): {max}

## Guidance
- Rate overall outdoor suitability and risk. Identify the *dominant* pollutant driving risk.
- If air is unhealthy, offer safer indoor alternatives.
- Tailor to user tags when relevant (e.g., "Elderly", "Asthma", "Outdoor Activities", "Pet Owner", etc.).
- Keep it practical and medically non-prescriptive.

## SCORING
- outdoor_suitability: 0–100 (higher = safer/more suitable to be outdoors).
- health_risk: 0–100 (higher = riskier).
- confidence: 0–100 (how confident are you given the inputs?).

## JSON SCHEMA (respond EXACTLY in this structure)
{{
  "country": string,
  "date": string,
  "dominant_pollutant": "NO2" | "O3" | "PM" | "CH2O" | "Unknown",
  "risk_level_label": "Good" | "Moderate" | "USG" | "Unhealthy" | "Very Unhealthy" | "Hazardous" | "Unknown",
  "scores": {{
    "outdoor_suitability": number,
    "health_risk": number,
    "confidence": number
  }},
  "pollutants": {{
    "NO2": number | null,
    "O3": number | null,
    "PM": number | null,
    "CH2O": number | null,
    "AI": number | null
  }},
  "tailored_notes": string[],
  "recommendations": string[],
  "indoor_alternatives": string[],
  "disclaimer": string
}}"#,
        country = input.country_id,
        date = date,
        tags = tags,
        no2 = figures.no2,
        o3 = figures.o3,
        pm = figures.pm,
        ch2o = figures.ch2o,
        max = figures.max(),
    )
}

/// Strips Markdown code fences from a model response.
fn strip_code_fences(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProvider(String);

    #[async_trait::async_trait]
    impl TextProvider for CannedProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
            Ok(self.0.clone())
        }
    }

    fn input() -> RecommendationInput {
        RecommendationInput {
            country_id: 1,
            out_date: Some("2025-06-01".to_string()),
            tag_names: vec!["Asthma".to_string(), "Elderly".to_string()],
            figures: PollutantFigures::placeholder(),
        }
    }

    #[test]
    fn prompt_carries_context() {
        let prompt = build_prompt(&input());
        assert!(prompt.contains("Asthma, Elderly"));
        assert!(prompt.contains("2025-06-01"));
        assert!(prompt.contains("NO2: 12.34"));
        assert!(prompt.contains("strict JSON"));
    }

    #[test]
    fn prompt_defaults_missing_fields() {
        let mut i = input();
        i.out_date = None;
        i.tag_names.clear();
        let prompt = build_prompt(&i);
        assert!(prompt.contains("Date (user-selected): N/A"));
        assert!(prompt.contains("risk): N/A"));
    }

    #[test]
    fn figures_max() {
        assert!((PollutantFigures::placeholder().max() - 56.78).abs() < f64::EPSILON);
    }

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[tokio::test]
    async fn fenced_response_parses_ok() {
        let provider = CannedProvider("```json\n{\"country\":\"US\"}\n```".to_string());
        let outcome = recommend(Some(&provider), &input()).await.unwrap();
        assert_eq!(outcome.summary, "OK");
        assert_eq!(outcome.response["country"], "US");
    }

    #[tokio::test]
    async fn unparseable_response_is_carried_raw() {
        let provider = CannedProvider("definitely not json".to_string());
        let outcome = recommend(Some(&provider), &input()).await.unwrap();
        assert_eq!(outcome.summary, "Failed to parse JSON");
        assert_eq!(outcome.response, "definitely not json");
    }

    #[tokio::test]
    async fn missing_provider_degrades_gracefully() {
        let outcome = recommend(None, &input()).await.unwrap();
        assert_eq!(outcome.response["error"], "No API key configured");
        assert!(outcome.summary.contains("GEMINI_API_KEY"));
    }
}
