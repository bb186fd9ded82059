//! Speaking scorer: turns a transcript and a target word into a tiered
//! verdict.
//!
//! The ladder is evaluated top to bottom and the first rule that holds wins:
//!
//! | Tier      | Condition                                              |
//! |-----------|--------------------------------------------------------|
//! | Perfect   | normalized forms are equal                             |
//! | Close     | distance ≤ `close_distance`, or transcript contains target |
//! | Good      | distance ≤ `good_distance`, or the words sound alike   |
//! | Partial   | transcript nonempty and shares enough letters          |
//! | WrongWord | transcript nonempty                                    |
//! | NoMatch   | everything else (empty transcript)                     |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::phonetic::phonetically_similar;
use crate::similarity::{edit_distance, has_letter_overlap, normalize};

/// Discrete scoring bucket, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Perfect,
    Close,
    Good,
    Partial,
    WrongWord,
    NoMatch,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::Perfect,
        Tier::Close,
        Tier::Good,
        Tier::Partial,
        Tier::WrongWord,
        Tier::NoMatch,
    ];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Perfect => write!(f, "perfect"),
            Tier::Close => write!(f, "close"),
            Tier::Good => write!(f, "good"),
            Tier::Partial => write!(f, "partial"),
            Tier::WrongWord => write!(f, "wrong_word"),
            Tier::NoMatch => write!(f, "no_match"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "perfect" => Ok(Tier::Perfect),
            "close" => Ok(Tier::Close),
            "good" => Ok(Tier::Good),
            "partial" => Ok(Tier::Partial),
            "wrong_word" | "wrong" => Ok(Tier::WrongWord),
            "no_match" | "none" => Ok(Tier::NoMatch),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// Outcome of scoring one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// 1–10.
    pub score: u8,
    pub tier: Tier,
    /// Short encouragement.
    pub feedback: String,
    /// Short actionable tip.
    pub tip: String,
    /// The transcript exactly as received.
    pub transcript: String,
}

/// Speaking scorer bound to one configuration.
///
/// Holds no mutable state, so a single instance can be shared across tasks.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Pick the tier for `transcript` against `target`.
    pub fn tier(&self, transcript: &str, target: &str) -> Tier {
        let said = normalize(transcript);
        let expected = normalize(target);
        self.tier_normalized(&said, &expected)
    }

    fn tier_normalized(&self, said: &str, expected: &str) -> Tier {
        let config = &self.config;

        if said == expected {
            return Tier::Perfect;
        }

        let distance = edit_distance(said, expected);
        if distance <= config.close_distance || said.contains(expected) {
            return Tier::Close;
        }

        if distance <= config.good_distance
            || phonetically_similar(
                said,
                expected,
                &config.substitutions,
                config.phonetic_limits(),
            )
        {
            return Tier::Good;
        }

        if said.is_empty() {
            return Tier::NoMatch;
        }

        if has_letter_overlap(said, expected, config.overlap_ratio) {
            Tier::Partial
        } else {
            Tier::WrongWord
        }
    }

    /// Score `transcript` against `target`. Never fails.
    pub fn classify(&self, transcript: &str, target: &str) -> Verdict {
        let said = normalize(transcript);
        let expected = normalize(target);
        let tier = self.tier_normalized(&said, &expected);
        let text = self.config.feedback.get(tier);

        tracing::debug!(%said, %expected, %tier, "scored transcript");

        Verdict {
            score: self.config.scores.get(tier),
            tier,
            feedback: text.feedback.clone(),
            tip: text.render_tip(&said, &expected),
            transcript: transcript.to_string(),
        }
    }
}

/// Score with the default configuration.
pub fn classify(transcript: &str, target: &str) -> Verdict {
    Scorer::default().classify(transcript, target)
}
