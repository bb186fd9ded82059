//! Google Gemini API grading provider.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use wordcoach_core::results::TokenUsage;
use wordcoach_core::traits::{
    parse_grade, GradeRequest, GradeResponse, GradingProvider, ModelInfo, GRADER_SYSTEM_PROMPT,
};

use crate::http::{build_client, check_status, send_error, unparseable};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, base_url: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: build_client()?,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
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
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: GeminiUsage,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[async_trait]
impl GradingProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %request.model, kind = %request.prompt.kind()))]
    async fn grade(&self, request: &GradeRequest) -> anyhow::Result<GradeResponse> {
        let start = Instant::now();

        let body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: GRADER_SYSTEM_PROMPT.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: request.instruction(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;

        let api_response: GeminiResponse = check_status(response, &request.model)
            .await?
            .json()
            .await
            .map_err(unparseable)?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let raw: String = api_response
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();
        let grade = parse_grade(&raw)?;

        let usage = &api_response.usage_metadata;
        // Pricing: Gemini 2.0 Flash $0.10/$0.40 per 1M tokens
        let estimated_cost = (usage.prompt_token_count as f64 * 0.10
            + usage.candidates_token_count as f64 * 0.40)
            / 1_000_000.0;

        Ok(GradeResponse {
            grade,
            raw,
            model: api_response
                .model_version
                .unwrap_or_else(|| request.model.clone()),
            token_usage: TokenUsage {
                prompt_tokens: usage.prompt_token_count,
                completion_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
                estimated_cost_usd: estimated_cost,
            },
            latency_ms,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gemini-2.0-flash".into(),
                name: "Gemini 2.0 Flash".into(),
                provider: "gemini".into(),
                max_context: 1_048_576,
                cost_per_1k_input: 0.0001,
                cost_per_1k_output: 0.0004,
            },
            ModelInfo {
                id: "gemini-2.0-flash-lite".into(),
                name: "Gemini 2.0 Flash-Lite".into(),
                provider: "gemini".into(),
                max_context: 1_048_576,
                cost_per_1k_input: 0.000075,
                cost_per_1k_output: 0.0003,
            },
        ]
    }
}
