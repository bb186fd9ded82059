//! Practice report types with JSON persistence and progress tracking.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::{AttemptResult, FailedAttempt};
use crate::statistics::PracticeSummary;

/// A complete practice report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the lesson.
    pub lesson: LessonSummary,
    /// Scored attempts.
    pub results: Vec<AttemptResult>,
    /// Attempts that could not be scored.
    #[serde(default)]
    pub failures: Vec<FailedAttempt>,
    /// Aggregate statistics.
    pub summary: PracticeSummary,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a lesson (without its content).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub exercise_count: usize,
}

impl PracticeReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: PracticeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Best score per exercise id.
    fn best_scores(&self) -> HashMap<&str, u8> {
        let mut map: HashMap<&str, u8> = HashMap::new();
        for r in &self.results {
            let entry = map.entry(r.exercise_id.as_str()).or_insert(0);
            *entry = (*entry).max(r.score);
        }
        map
    }

    /// Compare this session against an earlier one.
    ///
    /// A change counts only when the best score per exercise moves by more
    /// than `threshold` points.
    pub fn compare(&self, baseline: &PracticeReport, threshold: f64) -> ProgressReport {
        let baseline_scores = baseline.best_scores();
        let current_scores = self.best_scores();

        let mut slipped = Vec::new();
        let mut improved = Vec::new();
        let mut unchanged = 0usize;
        let mut new_exercises = 0usize;

        for (exercise_id, &current) in &current_scores {
            let Some(&before) = baseline_scores.get(exercise_id) else {
                new_exercises += 1;
                continue;
            };
            let change = ScoreChange {
                exercise_id: exercise_id.to_string(),
                baseline_score: before,
                current_score: current,
                delta: i16::from(current) - i16::from(before),
            };
            if f64::from(change.delta) < -threshold {
                slipped.push(change);
            } else if f64::from(change.delta) > threshold {
                improved.push(change);
            } else {
                unchanged += 1;
            }
        }

        slipped.sort_by(|a, b| a.exercise_id.cmp(&b.exercise_id));
        improved.sort_by(|a, b| a.exercise_id.cmp(&b.exercise_id));

        let skipped_exercises = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(*k))
            .count();

        ProgressReport {
            slipped,
            improved,
            unchanged,
            new_exercises,
            skipped_exercises,
        }
    }
}

/// Result of comparing two practice sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Exercises where the score went down.
    pub slipped: Vec<ScoreChange>,
    /// Exercises where the score went up.
    pub improved: Vec<ScoreChange>,
    /// Exercises with no significant change.
    pub unchanged: usize,
    /// Exercises practised now but not in the baseline.
    pub new_exercises: usize,
    /// Exercises practised in the baseline but not now.
    pub skipped_exercises: usize,
}

/// A score movement on one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub exercise_id: String,
    pub baseline_score: u8,
    pub current_score: u8,
    pub delta: i16,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} improved, {} slipped, {} unchanged\n\n",
            self.improved.len(),
            self.slipped.len(),
            self.unchanged
        ));

        for (title, changes) in [("Improved", &self.improved), ("Slipped", &self.slipped)] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Exercise | Before | Now | Change |\n");
            md.push_str("|----------|--------|-----|--------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {} | {} | {:+} |\n",
                    c.exercise_id, c.baseline_score, c.current_score, c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if any exercise slipped.
    pub fn has_slipped(&self) -> bool {
        !self.slipped.is_empty()
    }
}
