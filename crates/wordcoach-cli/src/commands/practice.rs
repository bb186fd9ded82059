//! The `wordcoach practice` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use wordcoach_core::engine::{PracticeEngine, PracticeEngineConfig, ProgressReporter};
use wordcoach_core::parser;
use wordcoach_core::report::PracticeReport;
use wordcoach_core::results::AttemptResult;
use wordcoach_core::Scorer;
use wordcoach_providers::{create_provider, load_config_from};

use super::parse_grader_spec;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_attempt_complete(&self, result: &AttemptResult) {
        let tier = result
            .tier
            .map(|t| format!(" [{t}]"))
            .unwrap_or_default();
        eprintln!(
            "  Done: {} \"{}\" -> {}/10{} ({}ms)",
            result.exercise_id, result.answer, result.score, tier, result.latency_ms,
        );
    }

    fn on_attempt_error(&self, exercise_id: &str, error: &str) {
        eprintln!("  ERROR: {exercise_id}: {error}");
    }

    fn on_session_complete(&self, total: usize, scored: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {scored}/{total} scored, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    lesson_path: PathBuf,
    attempts_path: PathBuf,
    model: Option<String>,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(
        (0.0..=2.0).contains(&config.default_temperature),
        "temperature must be between 0.0 and 2.0"
    );

    let lesson = parser::parse_lesson(&lesson_path)?;
    let attempts = parser::parse_attempts(&attempts_path)?;
    anyhow::ensure!(
        !attempts.is_empty(),
        "no attempts found in {}",
        attempts_path.display()
    );

    let engine_config = PracticeEngineConfig {
        parallelism,
        temperature: config.default_temperature,
        max_retries: config.max_retries,
        retry_delay: Duration::from_millis(config.retry_delay_ms),
        ..PracticeEngineConfig::default()
    };
    let mut engine = PracticeEngine::new(Scorer::new(config.scoring.clone()), engine_config);

    let needs_grader = attempts.iter().any(|a| {
        lesson
            .exercise(&a.exercise)
            .is_some_and(|e| e.prompt.kind().is_writing())
    });
    if needs_grader {
        let spec = parse_grader_spec(
            model.as_deref(),
            &config.default_provider,
            &config.default_model,
        );
        match config.providers.get(&spec.provider).map(create_provider) {
            Some(Ok(provider)) => {
                engine = engine.with_grader(spec, Arc::from(provider));
            }
            Some(Err(e)) => {
                tracing::warn!("grading provider '{}' unavailable: {e:#}", spec.provider);
            }
            None => {
                tracing::warn!(
                    "provider '{}' not found in config; writing attempts will not be graded",
                    spec.provider
                );
            }
        }
    }

    eprintln!(
        "wordcoach v{} — Practising \"{}\" with {} attempts",
        env!("CARGO_PKG_VERSION"),
        lesson.title,
        attempts.len()
    );
    eprintln!();

    let report = engine.run(&lesson, &attempts, &ConsoleReporter).await?;

    print_summary(&report);

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("practice-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &PracticeReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Kind", "Scored", "Average", "Best", "Worst", "Latency"]);

    for (kind, stats) in &report.summary.per_kind {
        table.add_row(vec![
            Cell::new(kind),
            Cell::new(stats.scored),
            Cell::new(format!("{:.1}", stats.average_score)),
            Cell::new(stats.best_score),
            Cell::new(stats.worst_score),
            Cell::new(format!("{}ms", stats.avg_latency_ms)),
        ]);
    }

    eprintln!("\n{table}");

    if !report.summary.tier_counts.is_empty() {
        let tiers: Vec<String> = report
            .summary
            .tier_counts
            .iter()
            .map(|(tier, count)| format!("{tier}: {count}"))
            .collect();
        eprintln!("Speaking tiers: {}", tiers.join(", "));
    }
    if report.summary.token_usage.total_tokens > 0 {
        eprintln!(
            "Tokens: {} (${:.4})",
            report.summary.token_usage.total_tokens, report.summary.token_usage.estimated_cost_usd
        );
    }
    println!(
        "Average score: {:.1}/10 over {} attempt(s), {} failed",
        report.summary.average_score, report.summary.attempts, report.summary.failed
    );
}
