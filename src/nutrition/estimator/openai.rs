use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Estimator, MealAnalysis, MockEstimator};
use crate::config::EstimatorConfig;
use crate::nutrition::error::EstimateError;
use crate::nutrition::parser::ParsedFoodItem;

const SYSTEM_PROMPT: &str = "You are a certified nutritionist providing meal analysis.";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Shape the model is asked to answer with.
#[derive(Debug, Deserialize)]
struct ExternalAnalysis {
    calories: f64,
    #[serde(alias = "protein_g")]
    protein: f64,
    #[serde(alias = "carbs_g")]
    carbs: f64,
    #[serde(alias = "fat_g")]
    fat: f64,
    #[serde(alias = "fiber_g")]
    fiber: f64,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(alias = "confidence")]
    confidence_score: f64,
}

/// Delegates to an OpenAI-compatible chat completion endpoint and falls
/// back to [`MockEstimator`] on any failure.
pub struct OpenAiEstimator {
    client: Client,
    config: EstimatorConfig,
    fallback: MockEstimator,
}

impl OpenAiEstimator {
    pub fn new(config: EstimatorConfig) -> Result<Self, EstimateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            fallback: MockEstimator,
        })
    }

    async fn request_analysis(
        &self,
        description: &str,
        foods: &[ParsedFoodItem],
    ) -> Result<MealAnalysis, EstimateError> {
        if self.config.api_key.trim().is_empty() {
            return Err(EstimateError::MissingCredentials);
        }

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(description, foods),
                },
            ],
            temperature: 0.3,
            max_tokens: 500,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EstimateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EstimateError::Malformed("no choices in response".into()))?;
        debug!(content = %content, "model analysis received");

        parse_analysis(&content)
    }
}

#[async_trait]
impl Estimator for OpenAiEstimator {
    async fn estimate(&self, description: &str, foods: &[ParsedFoodItem]) -> MealAnalysis {
        match self.request_analysis(description, foods).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "external estimation failed; using mock analysis");
                self.fallback.analyze(description)
            }
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn build_prompt(description: &str, foods: &[ParsedFoodItem]) -> String {
    let foods_json = serde_json::to_string(foods).unwrap_or_else(|_| "[]".into());
    format!(
        "Analyze this meal and estimate its nutrition.\n\n\
         Meal description: {description}\n\
         Parsed foods: {foods_json}\n\n\
         Reply with a single JSON object and nothing else, using exactly these keys:\n\
         \"calories\" (kcal), \"protein\", \"carbs\", \"fat\", \"fiber\" (grams, numbers),\n\
         \"recommendations\" (2-3 short strings) and \"confidence_score\" (0 to 1)."
    )
}

/// Parse the model's reply, tolerating a surrounding markdown code fence.
fn parse_analysis(content: &str) -> Result<MealAnalysis, EstimateError> {
    let body = strip_code_fence(content);
    let raw: ExternalAnalysis =
        serde_json::from_str(body).map_err(|e| EstimateError::Malformed(e.to_string()))?;

    let values = [raw.calories, raw.protein, raw.carbs, raw.fat, raw.fiber];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(EstimateError::Malformed(
            "nutrition values must be non-negative numbers".into(),
        ));
    }

    Ok(MealAnalysis {
        calories: raw.calories,
        protein_g: raw.protein,
        carbs_g: raw.carbs,
        fat_g: raw.fat,
        fiber_g: raw.fiber,
        recommendations: raw.recommendations,
        confidence_score: raw.confidence_score.clamp(0.0, 1.0),
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str, api_url: &str) -> EstimatorConfig {
        EstimatorConfig {
            use_external: true,
            api_key: api_key.into(),
            api_url: api_url.into(),
            timeout_secs: 1,
            ..EstimatorConfig::default()
        }
    }

    #[test]
    fn parses_plain_json_reply() {
        let reply = r#"{"calories": 612.5, "protein": 41, "carbs": 58, "fat": 19, "fiber": 6.5,
                        "recommendations": ["Add greens"], "confidence_score": 0.82}"#;
        let a = parse_analysis(reply).unwrap();
        assert_eq!(a.calories, 612.5);
        assert_eq!(a.protein_g, 41.0);
        assert_eq!(a.fiber_g, 6.5);
        assert_eq!(a.recommendations, vec!["Add greens".to_string()]);
        assert_eq!(a.confidence_score, 0.82);
    }

    #[test]
    fn parses_fenced_reply_with_aliases_and_clamps_confidence() {
        let reply = "```json\n{\"calories\": 400, \"protein_g\": 30, \"carbs_g\": 40, \
                     \"fat_g\": 12, \"fiber_g\": 5, \"confidence\": 1.4}\n```";
        let a = parse_analysis(reply).unwrap();
        assert_eq!(a.carbs_g, 40.0);
        assert!(a.recommendations.is_empty());
        assert_eq!(a.confidence_score, 1.0);
    }

    #[test]
    fn rejects_incomplete_or_negative_replies() {
        assert!(matches!(
            parse_analysis("I think about 500 calories"),
            Err(EstimateError::Malformed(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"calories": 500, "protein": 20}"#),
            Err(EstimateError::Malformed(_))
        ));
        let negative = r#"{"calories": -5, "protein": 1, "carbs": 1, "fat": 1, "fiber": 1,
                           "confidence_score": 0.5}"#;
        assert!(matches!(
            parse_analysis(negative),
            Err(EstimateError::Malformed(_))
        ));
    }

    #[test]
    fn prompt_carries_description_and_foods() {
        let foods = vec![ParsedFoodItem {
            food_name: "rice".into(),
            quantity_grams: 2.0,
        }];
        let prompt = build_prompt("2 cups rice", &foods);
        assert!(prompt.contains("Meal description: 2 cups rice"));
        assert!(prompt.contains(r#"{"food":"rice","quantity_grams":2.0}"#));
    }

    #[tokio::test]
    async fn missing_credentials_fall_back_to_mock() {
        let estimator = OpenAiEstimator::new(config("", "http://127.0.0.1:9")).unwrap();
        let description = "grilled chicken with rice and broccoli";
        let a = estimator.estimate(description, &[]).await;
        assert_eq!(a, MockEstimator.analyze(description));
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back_to_mock() {
        let estimator = OpenAiEstimator::new(config("sk-test", "http://127.0.0.1:9")).unwrap();
        let a = estimator.estimate("beef stew", &[]).await;
        assert_eq!(a.confidence_score, 0.75);
        assert_eq!(a.protein_g, 35.0);
    }
}
