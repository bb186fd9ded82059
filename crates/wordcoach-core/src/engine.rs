//! Practice engine orchestrator.
//!
//! Scores every attempt of a practice session. Speaking attempts run through
//! the local [`Scorer`]; writing attempts go to a grading provider with
//! bounded parallelism and retries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::model::{Attempt, Exercise, Lesson, Prompt};
use crate::report::{LessonSummary, PracticeReport};
use crate::results::{AttemptResult, FailedAttempt};
use crate::scorer::Scorer;
use crate::statistics::compute_summary;
use crate::traits::{GradeRequest, GradeResponse, GradingProvider};

/// Configuration for the practice engine.
#[derive(Debug, Clone)]
pub struct PracticeEngineConfig {
    /// Maximum concurrent grading requests.
    pub parallelism: usize,
    /// Temperature for grading.
    pub temperature: f64,
    /// Max tokens for a grade reply.
    pub max_tokens: u32,
    /// Retries on provider errors (not on bad answers).
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each retry.
    pub retry_delay: Duration,
}

impl Default for PracticeEngineConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            temperature: 0.0,
            max_tokens: 512,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Which grading model to use for writing exercises.
#[derive(Debug, Clone)]
pub struct GraderSpec {
    /// Provider name (e.g. "gemini").
    pub provider: String,
    /// Model identifier (e.g. "gemini-2.0-flash").
    pub model: String,
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_attempt_complete(&self, result: &AttemptResult);
    fn on_attempt_error(&self, exercise_id: &str, error: &str);
    fn on_session_complete(&self, total: usize, scored: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_attempt_complete(&self, _: &AttemptResult) {}
    fn on_attempt_error(&self, _: &str, _: &str) {}
    fn on_session_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// The practice engine.
pub struct PracticeEngine {
    scorer: Arc<Scorer>,
    grader: Option<(GraderSpec, Arc<dyn GradingProvider>)>,
    config: PracticeEngineConfig,
}

impl PracticeEngine {
    pub fn new(scorer: Scorer, config: PracticeEngineConfig) -> Self {
        Self {
            scorer: Arc::new(scorer),
            grader: None,
            config,
        }
    }

    /// Attach a grading provider for writing exercises.
    pub fn with_grader(mut self, spec: GraderSpec, provider: Arc<dyn GradingProvider>) -> Self {
        self.grader = Some((spec, provider));
        self
    }

    /// Score a practice session for `lesson`.
    pub async fn run(
        &self,
        lesson: &Lesson,
        attempts: &[Attempt],
        progress: &dyn ProgressReporter,
    ) -> Result<PracticeReport> {
        let start = Instant::now();
        let sequence = lesson.exercises();
        let exercise_count = sequence.len();
        let exercises: HashMap<String, Exercise> =
            sequence.into_iter().map(|e| (e.id.clone(), e)).collect();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        let mut results = Vec::new();
        let mut failures = Vec::new();
        let mut pending = FuturesUnordered::new();

        for (index, attempt) in attempts.iter().enumerate() {
            let Some(exercise) = exercises.get(&attempt.exercise) else {
                record_failure(
                    &mut failures,
                    progress,
                    &attempt.exercise,
                    format!("unknown exercise '{}' in lesson '{}'", attempt.exercise, lesson.id),
                );
                continue;
            };

            let writing = match &exercise.prompt {
                Prompt::Writing(writing) => writing.clone(),
                Prompt::Speaking { word } => {
                    let scored_at = Instant::now();
                    let verdict = self.scorer.classify(&attempt.answer, word);
                    let result = AttemptResult::from_verdict(
                        &exercise.id,
                        verdict,
                        scored_at.elapsed().as_millis() as u64,
                    );
                    progress.on_attempt_complete(&result);
                    results.push((index, result));
                    continue;
                }
            };

            if attempt.answer.trim().is_empty() {
                record_failure(
                    &mut failures,
                    progress,
                    &exercise.id,
                    "answer is empty".to_string(),
                );
                continue;
            }

            let Some((spec, provider)) = &self.grader else {
                record_failure(
                    &mut failures,
                    progress,
                    &exercise.id,
                    "no grading provider configured for writing exercises".to_string(),
                );
                continue;
            };

            let provider = Arc::clone(provider);
            let semaphore = Arc::clone(&semaphore);
            let spec = spec.clone();
            let exercise_id = exercise.id.clone();
            let answer = attempt.answer.clone();
            let config = self.config.clone();

            pending.push(async move {
                let id = exercise_id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    let kind = writing.kind();
                    let mut request = GradeRequest::new(&spec.model, writing, &answer);
                    request.max_tokens = config.max_tokens;
                    request.temperature = config.temperature;

                    let response = grade_with_retry(provider.as_ref(), &request, &config).await?;
                    Ok::<_, anyhow::Error>(AttemptResult::from_grade(
                        &exercise_id,
                        kind,
                        &answer,
                        &spec.provider,
                        response,
                    ))
                };
                (index, id, inner.await)
            });
        }

        while let Some((index, exercise_id, outcome)) = pending.next().await {
            match outcome {
                Ok(result) => {
                    progress.on_attempt_complete(&result);
                    results.push((index, result));
                }
                Err(e) => {
                    tracing::error!("grading failed for {exercise_id}: {e:#}");
                    record_failure(&mut failures, progress, &exercise_id, format!("{e:#}"));
                }
            }
        }

        // Submission order, not completion order.
        results.sort_by_key(|(index, _)| *index);
        let results: Vec<AttemptResult> = results.into_iter().map(|(_, r)| r).collect();

        let elapsed = start.elapsed();
        progress.on_session_complete(attempts.len(), results.len(), failures.len(), elapsed);

        let summary = compute_summary(&results, failures.len());

        Ok(PracticeReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            lesson: LessonSummary {
                id: lesson.id.clone(),
                title: lesson.title.clone(),
                exercise_count,
            },
            results,
            failures,
            summary,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

fn record_failure(
    failures: &mut Vec<FailedAttempt>,
    progress: &dyn ProgressReporter,
    exercise_id: &str,
    error: String,
) {
    progress.on_attempt_error(exercise_id, &error);
    failures.push(FailedAttempt {
        exercise_id: exercise_id.to_string(),
        error,
    });
}

/// Grade one answer, retrying transient provider errors with exponential
/// backoff capped at 60 seconds.
pub async fn grade_with_retry(
    provider: &dyn GradingProvider,
    request: &GradeRequest,
    config: &PracticeEngineConfig,
) -> Result<GradeResponse> {
    let mut last_error = None;
    let mut retry_delay = config.retry_delay;

    for retry in 0..=config.max_retries {
        if retry > 0 {
            tracing::debug!(retry, ?retry_delay, "retrying grade request");
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
        }
        match provider.grade(request).await {
            Ok(response) => return Ok(response),
            Err(e) => {
                if let Some(provider_error) = e.downcast_ref::<ProviderError>() {
                    if provider_error.is_permanent() {
                        return Err(e);
                    }
                    if let Some(ms) = provider_error.retry_after_ms() {
                        retry_delay = Duration::from_millis(ms);
                    }
                }
                tracing::warn!("grade attempt {} failed: {e}", retry + 1);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CompletionItem, ExerciseKind, QuestionItem, SentenceItem, VocabularyItem, WritingPrompt,
    };
    use crate::results::TokenUsage;
    use crate::scorer::Tier;
    use crate::traits::{parse_grade, ModelInfo};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Fails `failures` times with `error`, then answers with a fixed grade.
    struct FlakyGrader {
        failures: u32,
        error: fn() -> ProviderError,
        calls: AtomicU32,
        instructions: Mutex<Vec<String>>,
    }

    impl FlakyGrader {
        fn new(failures: u32, error: fn() -> ProviderError) -> Self {
            Self {
                failures,
                error,
                calls: AtomicU32::new(0),
                instructions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GradingProvider for FlakyGrader {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn grade(&self, request: &GradeRequest) -> anyhow::Result<GradeResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.instructions.lock().unwrap().push(request.instruction());
            if call < self.failures {
                return Err((self.error)().into());
            }
            let raw = r#"{"score": 8, "feedback": "Nice sentence!", "explanation": "Good."}"#;
            Ok(GradeResponse {
                grade: parse_grade(raw)?,
                raw: raw.to_string(),
                model: request.model.clone(),
                token_usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                    estimated_cost_usd: 0.0,
                },
                latency_ms: 1,
            })
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    fn lesson() -> Lesson {
        Lesson {
            id: "animals".into(),
            title: "Animals".into(),
            description: String::new(),
            vocabulary: vec![VocabularyItem {
                id: "dog".into(),
                word: "Dog".into(),
                example: String::new(),
                emoji: String::new(),
            }],
            questions: vec![QuestionItem {
                question: "What is your favorite animal?".into(),
                hint: String::new(),
            }],
            sentences: vec![SentenceItem {
                word: "cat".into(),
                example: String::new(),
                emoji: String::new(),
            }],
            completions: vec![CompletionItem {
                text: "I have a ___ at home.".into(),
                answer: "cat".into(),
            }],
        }
    }

    fn attempt(exercise: &str, answer: &str) -> Attempt {
        Attempt {
            exercise: exercise.into(),
            answer: answer.into(),
        }
    }

    fn fast_config() -> PracticeEngineConfig {
        PracticeEngineConfig {
            retry_delay: Duration::from_millis(1),
            ..PracticeEngineConfig::default()
        }
    }

    fn spec() -> GraderSpec {
        GraderSpec {
            provider: "flaky".into(),
            model: "test-model".into(),
        }
    }

    #[tokio::test]
    async fn speaking_only_session_needs_no_provider() {
        let engine = PracticeEngine::new(Scorer::default(), fast_config());
        let report = engine
            .run(&lesson(), &[attempt("speak:dog", "dawg")], &NoopReporter)
            .await
            .unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].tier, Some(Tier::Good));
        assert_eq!(report.summary.failed, 0);
        assert_eq!(report.lesson.exercise_count, 4);
    }

    #[tokio::test]
    async fn writing_without_provider_fails_gracefully() {
        let engine = PracticeEngine::new(Scorer::default(), fast_config());
        let report = engine
            .run(
                &lesson(),
                &[attempt("qa:1", "I like dogs."), attempt("speak:dog", "dog")],
                &NoopReporter,
            )
            .await
            .unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("no grading provider"));
    }

    #[tokio::test]
    async fn mixed_session_with_provider() {
        let grader = Arc::new(FlakyGrader::new(0, || ProviderError::Timeout(1)));
        let engine = PracticeEngine::new(Scorer::default(), fast_config()).with_grader(spec(), grader);
        let report = engine
            .run(
                &lesson(),
                &[
                    attempt("sentence:cat", "The cat is cute."),
                    attempt("speak:dog", "dog"),
                    attempt("qa:1", "My favorite animal is a dog."),
                    attempt("qa:7", "nope"),
                    attempt("sentence:cat", "   "),
                ],
                &NoopReporter,
            )
            .await
            .unwrap();

        let ids: Vec<&str> = report.results.iter().map(|r| r.exercise_id.as_str()).collect();
        assert_eq!(ids, vec!["sentence:cat", "speak:dog", "qa:1"]);
        assert_eq!(report.results[0].score, 8);
        assert_eq!(report.results[0].grader, "flaky/test-model");
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.summary.attempts, 5);
        assert_eq!(report.summary.token_usage.total_tokens, 30);
    }

    fn sentence_request() -> GradeRequest {
        GradeRequest::new("m", WritingPrompt::Sentence { word: "cat".into() }, "A cat.")
    }

    #[tokio::test]
    async fn completion_grading_names_the_expected_word() {
        let grader = Arc::new(FlakyGrader::new(0, || ProviderError::Timeout(1)));
        let engine =
            PracticeEngine::new(Scorer::default(), fast_config()).with_grader(spec(), grader.clone());
        let report = engine
            .run(&lesson(), &[attempt("complete:1", "frog")], &NoopReporter)
            .await
            .unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].kind, ExerciseKind::Complete);
        let instructions = grader.instructions.lock().unwrap();
        assert_eq!(instructions.len(), 1);
        assert!(instructions[0].contains("Sentence to complete: \"I have a ___ at home.\""));
        assert!(instructions[0].contains("Student's answer: \"frog\""));
        assert!(instructions[0].contains("Target word: \"cat\""));
    }

    #[tokio::test]
    async fn duplicate_ids_still_count_every_exercise() {
        let mut lesson = lesson();
        lesson.vocabulary.push(VocabularyItem {
            id: "dog".into(),
            word: "Doggy".into(),
            example: String::new(),
            emoji: String::new(),
        });
        let engine = PracticeEngine::new(Scorer::default(), fast_config());
        let report = engine
            .run(&lesson, &[attempt("speak:dog", "doggy")], &NoopReporter)
            .await
            .unwrap();

        assert_eq!(report.lesson.exercise_count, 5);
        assert_eq!(report.results.len(), 1);
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let grader = FlakyGrader::new(2, || ProviderError::NetworkError("reset".into()));
        let request = sentence_request();
        let response = grade_with_retry(&grader, &request, &fast_config()).await.unwrap();
        assert_eq!(response.grade.score, 8);
        assert_eq!(grader.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let grader = FlakyGrader::new(5, || ProviderError::AuthenticationFailed("bad".into()));
        let request = sentence_request();
        let err = grade_with_retry(&grader, &request, &fast_config()).await.unwrap_err();
        assert!(err.to_string().contains("authentication"));
        assert_eq!(grader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_give_up_after_limit() {
        let grader = FlakyGrader::new(10, || ProviderError::RateLimited { retry_after_ms: 1 });
        let request = sentence_request();
        let config = PracticeEngineConfig {
            max_retries: 2,
            ..fast_config()
        };
        let err = grade_with_retry(&grader, &request, &config).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
        assert_eq!(grader.calls.load(Ordering::SeqCst), 3);
    }
}
