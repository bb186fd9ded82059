//! Sound-alike comparison through ordered letter-cluster rewriting.
//!
//! The rewrite is deliberately sequential: each rule runs over the output of
//! the previous one, so `c → k` followed by `k → c` folds both letters onto
//! `c`. Scores produced by earlier releases depend on this exact order.

use serde::{Deserialize, Serialize};

use crate::similarity::edit_distance;

/// One rewrite rule: every `from` cluster is replaced by each alternative in
/// turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    pub from: String,
    pub to: Vec<String>,
}

/// Ordered table of interchangeable letter clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionTable {
    rules: Vec<SubstitutionRule>,
}

impl SubstitutionTable {
    pub fn new(rules: Vec<SubstitutionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    /// Run every rule over `word`, in table order.
    pub fn rewrite(&self, word: &str) -> String {
        let mut result = word.to_string();
        for rule in &self.rules {
            if rule.from.is_empty() {
                continue;
            }
            for to in &rule.to {
                result = result.replace(rule.from.as_str(), to);
            }
        }
        result
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        const RULES: &[(&str, &[&str])] = &[
            ("c", &["k", "s", "z"]),
            ("k", &["c"]),
            ("g", &["j"]),
            ("j", &["g", "dge"]),
            ("f", &["ph"]),
            ("ph", &["f"]),
            ("s", &["z", "c"]),
            ("z", &["s", "x"]),
            ("x", &["ks"]),
            ("ee", &["ea"]),
            ("oo", &["ou", "u"]),
            ("ea", &["ee"]),
            ("ou", &["oo"]),
        ];

        Self::new(
            RULES
                .iter()
                .map(|(from, to)| SubstitutionRule {
                    from: (*from).to_string(),
                    to: to.iter().map(|t| (*t).to_string()).collect(),
                })
                .collect(),
        )
    }
}

/// Limits for [`phonetically_similar`].
#[derive(Debug, Clone, Copy)]
pub struct PhoneticLimits {
    /// Inputs whose lengths differ by more than this are never similar.
    pub max_length_gap: usize,
    /// Largest edit distance between rewritten forms still counted as similar.
    pub max_rewritten_distance: usize,
}

impl Default for PhoneticLimits {
    fn default() -> Self {
        Self {
            max_length_gap: 2,
            max_rewritten_distance: 1,
        }
    }
}

/// Whether `a` and `b` sound alike after rewriting both through `table`.
pub fn phonetically_similar(
    a: &str,
    b: &str,
    table: &SubstitutionTable,
    limits: PhoneticLimits,
) -> bool {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len.abs_diff(b_len) > limits.max_length_gap {
        return false;
    }
    if a == b {
        return true;
    }

    let a_alt = table.rewrite(a);
    let b_alt = table.rewrite(b);
    a_alt == b_alt || edit_distance(&a_alt, &b_alt) <= limits.max_rewritten_distance
}
