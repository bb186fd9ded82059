//! Aggregate statistics over a practice run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ExerciseKind;
use crate::results::{AttemptResult, TokenUsage};
use crate::scorer::Tier;

/// Aggregate view of a practice run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PracticeSummary {
    /// Attempts submitted, scored or not.
    pub attempts: usize,
    /// Attempts that could not be scored.
    pub failed: usize,
    /// Mean score over scored attempts (0.0 when none).
    pub average_score: f64,
    /// Per-kind statistics.
    pub per_kind: BTreeMap<ExerciseKind, KindStats>,
    /// How many speaking attempts landed in each tier.
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Token usage summed over writing grades.
    pub token_usage: TokenUsage,
}

/// Statistics for one exercise kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindStats {
    pub scored: usize,
    pub average_score: f64,
    pub best_score: u8,
    pub worst_score: u8,
    pub avg_latency_ms: u64,
}

/// Compute the summary for a run.
pub fn compute_summary(results: &[AttemptResult], failed: usize) -> PracticeSummary {
    let mut per_kind_results: BTreeMap<ExerciseKind, Vec<&AttemptResult>> = BTreeMap::new();
    let mut tier_counts: BTreeMap<Tier, usize> = BTreeMap::new();
    let mut token_usage = TokenUsage::default();

    for r in results {
        per_kind_results.entry(r.kind).or_default().push(r);
        if let Some(tier) = r.tier {
            *tier_counts.entry(tier).or_insert(0) += 1;
        }
        if let Some(usage) = &r.token_usage {
            token_usage.add(usage);
        }
    }

    let per_kind = per_kind_results
        .into_iter()
        .map(|(kind, group)| (kind, kind_stats(&group)))
        .collect();

    PracticeSummary {
        attempts: results.len() + failed,
        failed,
        average_score: mean(results.iter().map(|r| r.score)),
        per_kind,
        tier_counts,
        token_usage,
    }
}

fn kind_stats(group: &[&AttemptResult]) -> KindStats {
    let scored = group.len();
    let total_latency: u64 = group.iter().map(|r| r.latency_ms).sum();
    KindStats {
        scored,
        average_score: mean(group.iter().map(|r| r.score)),
        best_score: group.iter().map(|r| r.score).max().unwrap_or(0),
        worst_score: group.iter().map(|r| r.score).min().unwrap_or(0),
        avg_latency_ms: if scored > 0 {
            total_latency / scored as u64
        } else {
            0
        },
    }
}

fn mean(scores: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = scores.fold((0u64, 0u64), |(s, c), x| (s + u64::from(x), c + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
