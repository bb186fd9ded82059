//! Mock grader for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use wordcoach_core::results::TokenUsage;
use wordcoach_core::traits::{
    parse_grade, GradeRequest, GradeResponse, GradingProvider, ModelInfo,
};

/// A mock grading provider for exercising the practice engine without real
/// API calls.
///
/// Replies are picked by answer substring, first match in insertion order;
/// anything else gets the default.
pub struct MockGrader {
    /// (answer substring, raw model reply) pairs.
    replies: Vec<(String, String)>,
    default_reply: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<GradeRequest>>,
}

impl MockGrader {
    /// Create a new mock grader with the given answer→reply mappings.
    pub fn new<K, V>(replies: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            replies: replies
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            default_reply: r#"{"score": 5, "feedback": "Keep practising!", "explanation": ""}"#
                .to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same raw reply.
    pub fn with_fixed_reply(reply: &str) -> Self {
        Self {
            replies: Vec::new(),
            default_reply: reply.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this grader.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this grader.
    pub fn last_request(&self) -> Option<GradeRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl GradingProvider for MockGrader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn grade(&self, request: &GradeRequest) -> anyhow::Result<GradeResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let raw = self
            .replies
            .iter()
            .find(|(key, _)| request.answer.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_reply.clone());

        let grade = parse_grade(&raw)?;
        let prompt_tokens = (request.instruction().len() / 4) as u32; // Rough estimate
        let completion_tokens = (raw.len() / 4) as u32;

        Ok(GradeResponse {
            grade,
            raw,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
                estimated_cost_usd: 0.0,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
            cost_per_1k_input: 0.0,
            cost_per_1k_output: 0.0,
        }]
    }
}
