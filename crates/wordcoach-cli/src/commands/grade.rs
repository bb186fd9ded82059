//! The `wordcoach grade` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use wordcoach_core::engine::{grade_with_retry, PracticeEngineConfig};
use wordcoach_core::model::{ExerciseKind, WritingPrompt};
use wordcoach_core::traits::GradeRequest;
use wordcoach_providers::{create_provider, load_config_from};

use super::parse_grader_spec;

/// Prompt text for the exercise being graded.
pub struct PromptArgs {
    pub question: Option<String>,
    pub target_word: Option<String>,
    pub partial: Option<String>,
}

impl PromptArgs {
    fn into_prompt(self, kind: ExerciseKind) -> Result<WritingPrompt> {
        match kind {
            ExerciseKind::Qa => {
                let question = self.question.context("--question is required for qa")?;
                Ok(WritingPrompt::Qa { question })
            }
            ExerciseKind::Sentence => {
                let word = self
                    .target_word
                    .context("--target-word is required for sentence")?;
                Ok(WritingPrompt::Sentence { word })
            }
            ExerciseKind::Complete => {
                let partial = self.partial.context("--partial is required for complete")?;
                Ok(WritingPrompt::Complete {
                    partial,
                    target_word: self.target_word,
                })
            }
            ExerciseKind::Speaking => {
                anyhow::bail!("speaking answers are scored locally; use `wordcoach score`")
            }
        }
    }
}

pub async fn execute(
    kind: ExerciseKind,
    answer: String,
    prompt_args: PromptArgs,
    model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!answer.trim().is_empty(), "answer must not be empty");
    let prompt = prompt_args.into_prompt(kind)?;

    let config = load_config_from(config_path.as_deref())?;
    let spec = parse_grader_spec(
        model.as_deref(),
        &config.default_provider,
        &config.default_model,
    );

    let provider_config = config.providers.get(&spec.provider).with_context(|| {
        format!(
            "provider '{}' not found in config. Available: {:?}",
            spec.provider,
            config.providers.keys().collect::<Vec<_>>()
        )
    })?;
    let provider = create_provider(provider_config)?;

    let mut request = GradeRequest::new(&spec.model, prompt, &answer);
    request.temperature = config.default_temperature;

    let engine_config = PracticeEngineConfig {
        max_retries: config.max_retries,
        retry_delay: Duration::from_millis(config.retry_delay_ms),
        ..PracticeEngineConfig::default()
    };

    let response = grade_with_retry(provider.as_ref(), &request, &engine_config).await?;

    println!("Score: {}/10", response.grade.score);
    println!("{}", response.grade.feedback);
    if !response.grade.explanation.is_empty() {
        println!("Why: {}", response.grade.explanation);
    }
    eprintln!(
        "Graded by {}/{} in {}ms ({} tokens)",
        spec.provider, response.model, response.latency_ms, response.token_usage.total_tokens
    );

    Ok(())
}
