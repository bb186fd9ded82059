//! The grading provider seam for writing exercises.
//!
//! The async [`GradingProvider`] trait is implemented by the
//! `wordcoach-providers` crate. This module also owns the prompt text and the
//! parsing of model replies, so every provider asks the same question and
//! reads the answer the same way.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::model::WritingPrompt;
use crate::results::TokenUsage;

// ---------------------------------------------------------------------------
// Grading provider trait
// ---------------------------------------------------------------------------

/// Trait for language-model backends that grade written answers.
#[async_trait]
pub trait GradingProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Grade one written answer.
    async fn grade(&self, request: &GradeRequest) -> anyhow::Result<GradeResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to grade a written answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    /// Model identifier (e.g. "gemini-2.0-flash").
    pub model: String,
    /// What the learner was asked to do.
    pub prompt: WritingPrompt,
    /// The learner's answer.
    pub answer: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl GradeRequest {
    pub fn new(model: impl Into<String>, prompt: WritingPrompt, answer: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt,
            answer: answer.into(),
            max_tokens: 512,
            temperature: 0.0,
        }
    }

    /// The full instruction text sent to the model.
    pub fn instruction(&self) -> String {
        build_grading_prompt(&self.prompt, &self.answer)
    }
}

/// A grade as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    /// 1–10.
    pub score: u8,
    pub feedback: String,
    #[serde(default)]
    pub explanation: String,
}

/// Response from a grading request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResponse {
    pub grade: Grade,
    /// The raw model reply.
    pub raw: String,
    /// Model that actually produced the grade.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Cost per 1K input tokens in USD.
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens in USD.
    pub cost_per_1k_output: f64,
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// System prompt shared by providers that accept one.
pub const GRADER_SYSTEM_PROMPT: &str = "You are a kind English teacher for children aged 6 to 12. Reply ONLY with a single JSON object and nothing else.";

const REPLY_FORMAT: &str =
    r#"Format: {"score": number, "feedback": "string", "explanation": "string"}"#;

/// Build the grading instruction for one written answer.
pub fn build_grading_prompt(prompt: &WritingPrompt, answer: &str) -> String {
    match prompt {
        WritingPrompt::Qa { question } => format!(
            "You are an English teacher grading a student's answer.\n\
             Question: \"{question}\"\n\
             Student's answer: \"{answer}\"\n\n\
             Please rate this answer from 1-10 and provide brief, encouraging feedback for a child (6-12 years old).\n\
             {REPLY_FORMAT}"
        ),
        WritingPrompt::Sentence { word } => format!(
            "You are an English teacher grading a student's sentence.\n\
             Target word to use: \"{word}\"\n\
             Student's sentence: \"{answer}\"\n\n\
             Check if the sentence is grammatically correct, makes sense, and uses the target word properly.\n\
             Rate from 1-10 and provide brief, encouraging feedback for a child.\n\
             {REPLY_FORMAT}"
        ),
        WritingPrompt::Complete {
            partial,
            target_word,
        } => {
            let target = target_word
                .as_deref()
                .map(|w| format!("Target word: \"{w}\"\n"))
                .unwrap_or_default();
            format!(
                "You are an English teacher grading a student's answer.\n\
                 Sentence to complete: \"{partial}\"\n\
                 Student's answer: \"{answer}\"\n\
                 {target}\n\
                 Check if the answer is correct and makes grammatical sense.\n\
                 Rate from 1-10 and provide brief, encouraging feedback for a child.\n\
                 {REPLY_FORMAT}"
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

/// Cut the JSON object out of a model reply.
///
/// Models like to wrap the object in prose or markdown fences, so this takes
/// everything from the first `{` to the last `}`. Returns the trimmed reply
/// unchanged when there is no such span.
pub fn extract_json_object(reply: &str) -> &str {
    let trimmed = reply.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

#[derive(Deserialize)]
struct RawGrade {
    score: f64,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    explanation: String,
}

/// Parse a model reply into a [`Grade`], clamping the score to 1–10.
pub fn parse_grade(reply: &str) -> Result<Grade, ProviderError> {
    let json = extract_json_object(reply);
    let raw: RawGrade = serde_json::from_str(json)
        .map_err(|e| ProviderError::MalformedReply(format!("{e}: {}", truncate(reply, 200))))?;

    if !raw.score.is_finite() {
        return Err(ProviderError::MalformedReply(format!(
            "score is not a number: {}",
            raw.score
        )));
    }

    Ok(Grade {
        score: raw.score.round().clamp(1.0, 10.0) as u8,
        feedback: raw.feedback,
        explanation: raw.explanation,
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
