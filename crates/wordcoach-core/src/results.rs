//! Per-attempt result types.

use serde::{Deserialize, Serialize};

use crate::model::ExerciseKind;
use crate::scorer::{Tier, Verdict};
use crate::traits::GradeResponse;

/// Token consumption of a model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

impl TokenUsage {
    pub fn add(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        self.estimated_cost_usd += other.estimated_cost_usd;
    }
}

/// Outcome of scoring one learner attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResult {
    pub exercise_id: String,
    pub kind: ExerciseKind,
    /// The learner's answer as submitted.
    pub answer: String,
    /// 1–10.
    pub score: u8,
    pub feedback: String,
    /// Tip (speaking) or explanation (writing).
    pub tip: String,
    /// Only set for speaking attempts.
    #[serde(default)]
    pub tier: Option<Tier>,
    /// "heuristic" or "<provider>/<model>".
    pub grader: String,
    #[serde(default)]
    pub token_usage: Option<TokenUsage>,
    pub latency_ms: u64,
}

impl AttemptResult {
    pub fn from_verdict(exercise_id: &str, verdict: Verdict, latency_ms: u64) -> Self {
        Self {
            exercise_id: exercise_id.to_string(),
            kind: ExerciseKind::Speaking,
            answer: verdict.transcript,
            score: verdict.score,
            feedback: verdict.feedback,
            tip: verdict.tip,
            tier: Some(verdict.tier),
            grader: "heuristic".to_string(),
            token_usage: None,
            latency_ms,
        }
    }

    pub fn from_grade(
        exercise_id: &str,
        kind: ExerciseKind,
        answer: &str,
        provider: &str,
        response: GradeResponse,
    ) -> Self {
        Self {
            exercise_id: exercise_id.to_string(),
            kind,
            answer: answer.to_string(),
            score: response.grade.score,
            feedback: response.grade.feedback,
            tip: response.grade.explanation,
            tier: None,
            grader: format!("{provider}/{}", response.model),
            token_usage: Some(response.token_usage),
            latency_ms: response.latency_ms,
        }
    }
}

/// An attempt that could not be scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedAttempt {
    pub exercise_id: String,
    pub error: String,
}
