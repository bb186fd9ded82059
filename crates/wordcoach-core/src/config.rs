//! Tuning knobs for the speaking scorer.
//!
//! Everything here is product calibration rather than algorithm: the overlap
//! ratio, the distance cut-offs, the score attached to each tier and the
//! text shown to the learner. All of it can be overridden from the
//! `[scoring]` section of `wordcoach.toml`.

use serde::{Deserialize, Serialize};

use crate::phonetic::{PhoneticLimits, SubstitutionTable};
use crate::scorer::Tier;

/// Scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Fraction of the shorter-scaled length that shared letters must reach
    /// for the Partial tier.
    pub overlap_ratio: f64,
    /// Largest edit distance still graded Close.
    pub close_distance: usize,
    /// Largest edit distance still graded Good.
    pub good_distance: usize,
    /// Length gap beyond which two words are never sound-alikes.
    pub phonetic_length_gap: usize,
    /// Largest edit distance between rewritten forms counted as sound-alike.
    pub phonetic_distance: usize,
    /// Score awarded per tier.
    pub scores: TierScores,
    /// Text shown per tier.
    pub feedback: TierFeedback,
    /// Ordered phonetic rewrite rules.
    pub substitutions: SubstitutionTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            overlap_ratio: 0.4,
            close_distance: 1,
            good_distance: 2,
            phonetic_length_gap: 2,
            phonetic_distance: 1,
            scores: TierScores::default(),
            feedback: TierFeedback::default(),
            substitutions: SubstitutionTable::default(),
        }
    }
}

impl ScoringConfig {
    pub fn phonetic_limits(&self) -> PhoneticLimits {
        PhoneticLimits {
            max_length_gap: self.phonetic_length_gap,
            max_rewritten_distance: self.phonetic_distance,
        }
    }

    /// Check the configuration for values that would make tiers unreachable
    /// or scores nonsensical.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.overlap_ratio),
            "overlap_ratio must be between 0.0 and 1.0, got {}",
            self.overlap_ratio
        );
        anyhow::ensure!(
            self.close_distance <= self.good_distance,
            "close_distance ({}) must not exceed good_distance ({})",
            self.close_distance,
            self.good_distance
        );
        for tier in Tier::ALL {
            let score = self.scores.get(tier);
            anyhow::ensure!(
                (1..=10).contains(&score),
                "score for {tier} must be between 1 and 10, got {score}"
            );
        }
        Ok(())
    }
}

/// Score per tier, 1–10.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierScores {
    pub perfect: u8,
    pub close: u8,
    pub good: u8,
    pub partial: u8,
    pub wrong_word: u8,
    pub no_match: u8,
}

impl Default for TierScores {
    fn default() -> Self {
        Self {
            perfect: 10,
            close: 9,
            good: 7,
            partial: 5,
            wrong_word: 3,
            no_match: 1,
        }
    }
}

impl TierScores {
    pub fn get(&self, tier: Tier) -> u8 {
        match tier {
            Tier::Perfect => self.perfect,
            Tier::Close => self.close,
            Tier::Good => self.good,
            Tier::Partial => self.partial,
            Tier::WrongWord => self.wrong_word,
            Tier::NoMatch => self.no_match,
        }
    }
}

/// Feedback and tip for one tier.
///
/// `tip` may contain `{transcript}` and `{target}` placeholders, which are
/// filled with the normalized forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackText {
    pub feedback: String,
    pub tip: String,
}

impl FeedbackText {
    fn new(feedback: &str, tip: &str) -> Self {
        Self {
            feedback: feedback.to_string(),
            tip: tip.to_string(),
        }
    }

    /// Fill the tip template.
    pub fn render_tip(&self, transcript: &str, target: &str) -> String {
        self.tip
            .replace("{transcript}", transcript)
            .replace("{target}", target)
    }
}

/// Text per tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierFeedback {
    pub perfect: FeedbackText,
    pub close: FeedbackText,
    pub good: FeedbackText,
    pub partial: FeedbackText,
    pub wrong_word: FeedbackText,
    pub no_match: FeedbackText,
}

impl Default for TierFeedback {
    fn default() -> Self {
        Self {
            perfect: FeedbackText::new("Perfect pronunciation! Well done!", "Great job!"),
            close: FeedbackText::new("Very close! Almost perfect!", "You're on the right track!"),
            good: FeedbackText::new(
                "Good effort! Keep practicing!",
                "Pay attention to the exact sounds.",
            ),
            partial: FeedbackText::new(
                "Nice try! You're getting there.",
                "Listen carefully to each sound in the word.",
            ),
            wrong_word: FeedbackText::new(
                "Keep trying! You can do better.",
                "You said \"{transcript}\". Try saying \"{target}\".",
            ),
            no_match: FeedbackText::new(
                "Try again! You can do it!",
                "Say the word clearly and slowly.",
            ),
        }
    }
}

impl TierFeedback {
    pub fn get(&self, tier: Tier) -> &FeedbackText {
        match tier {
            Tier::Perfect => &self.perfect,
            Tier::Close => &self.close,
            Tier::Good => &self.good,
            Tier::Partial => &self.partial,
            Tier::WrongWord => &self.wrong_word,
            Tier::NoMatch => &self.no_match,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ScoringConfig::default();
        config.validate().unwrap();
        assert_eq!(config.overlap_ratio, 0.4);
        assert_eq!(config.scores.get(Tier::Perfect), 10);
        assert_eq!(config.scores.get(Tier::NoMatch), 1);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ScoringConfig = toml::from_str(
            r#"
overlap_ratio = 0.5

[scores]
good = 6
"#,
        )
        .unwrap();
        assert_eq!(config.overlap_ratio, 0.5);
        assert_eq!(config.scores.good, 6);
        assert_eq!(config.scores.close, 9);
        assert_eq!(config.close_distance, 1);
        assert_eq!(config.substitutions, SubstitutionTable::default());
    }

    #[test]
    fn feedback_override_from_toml() {
        let config: ScoringConfig = toml::from_str(
            r#"
[feedback.perfect]
feedback = "Perfecto!"
tip = "Muy bien."
"#,
        )
        .unwrap();
        assert_eq!(config.feedback.perfect.feedback, "Perfecto!");
        assert_eq!(
            config.feedback.close.feedback,
            "Very close! Almost perfect!"
        );
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = ScoringConfig {
            overlap_ratio: 1.5,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ScoringConfig {
            close_distance: 3,
            good_distance: 2,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.scores.perfect = 11;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("perfect"));
    }

    #[test]
    fn tip_template_renders_placeholders() {
        let text = TierFeedback::default().wrong_word;
        assert_eq!(
            text.render_tip("cat", "dog"),
            "You said \"cat\". Try saying \"dog\"."
        );
    }
}
