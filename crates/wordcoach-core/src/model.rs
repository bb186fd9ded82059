//! Lesson content and practice data model.
//!
//! A lesson is a themed bundle of vocabulary (practised by speaking) and
//! writing prompts (answered in free text and graded by a model).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A themed lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier (e.g. "animals").
    pub id: String,
    /// Human-readable title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Words to say out loud.
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
    /// Open questions to answer in writing.
    #[serde(default)]
    pub questions: Vec<QuestionItem>,
    /// Words to use in a sentence.
    #[serde(default)]
    pub sentences: Vec<SentenceItem>,
    /// Sentences with a `___` blank to fill in.
    #[serde(default)]
    pub completions: Vec<CompletionItem>,
}

/// A word practised in the speaking tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    #[serde(default)]
    pub hint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceItem {
    pub word: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub emoji: String,
}

/// A sentence with a blank and the word that belongs in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub text: String,
    #[serde(default)]
    pub answer: String,
}

/// Which practice activity an exercise belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Say a word; scored locally.
    Speaking,
    /// Answer a question in writing.
    Qa,
    /// Write a sentence using a word.
    Sentence,
    /// Fill in a blank.
    Complete,
}

impl ExerciseKind {
    /// Whether this kind is graded by a language model.
    pub fn is_writing(self) -> bool {
        !matches!(self, ExerciseKind::Speaking)
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::Speaking => write!(f, "speaking"),
            ExerciseKind::Qa => write!(f, "qa"),
            ExerciseKind::Sentence => write!(f, "sentence"),
            ExerciseKind::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "speaking" | "speak" => Ok(ExerciseKind::Speaking),
            "qa" | "question" => Ok(ExerciseKind::Qa),
            "sentence" => Ok(ExerciseKind::Sentence),
            "complete" | "completion" => Ok(ExerciseKind::Complete),
            other => Err(format!("unknown exercise kind: {other}")),
        }
    }
}

/// What the learner is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Say a word out loud; scored locally.
    Speaking { word: String },
    /// Answer in writing; graded by a model.
    Writing(WritingPrompt),
}

impl Prompt {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            Prompt::Speaking { .. } => ExerciseKind::Speaking,
            Prompt::Writing(w) => w.kind(),
        }
    }
}

/// A writing task as sent to a grader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WritingPrompt {
    Qa {
        question: String,
    },
    Sentence {
        word: String,
    },
    Complete {
        partial: String,
        /// The word that fills the blank, when known.
        #[serde(default)]
        target_word: Option<String>,
    },
}

impl WritingPrompt {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            WritingPrompt::Qa { .. } => ExerciseKind::Qa,
            WritingPrompt::Sentence { .. } => ExerciseKind::Sentence,
            WritingPrompt::Complete { .. } => ExerciseKind::Complete,
        }
    }
}

/// One unit of practice derived from a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    /// Stable id, e.g. `speak:dog`, `qa:1`, `sentence:dog`, `complete:2`.
    pub id: String,
    pub prompt: Prompt,
}

impl Lesson {
    /// All exercises of the lesson in practice order.
    ///
    /// Speaking comes first, one exercise per vocabulary item. Writing
    /// follows, interleaved per position: question, sentence, completion for
    /// index 0, then for index 1, and so on.
    pub fn exercises(&self) -> Vec<Exercise> {
        let mut exercises: Vec<Exercise> = self
            .vocabulary
            .iter()
            .map(|v| Exercise {
                id: format!("speak:{}", v.id),
                prompt: Prompt::Speaking {
                    word: v.word.clone(),
                },
            })
            .collect();

        let rounds = self
            .questions
            .len()
            .max(self.sentences.len())
            .max(self.completions.len());

        for i in 0..rounds {
            if let Some(q) = self.questions.get(i) {
                exercises.push(Exercise {
                    id: format!("qa:{}", i + 1),
                    prompt: Prompt::Writing(WritingPrompt::Qa {
                        question: q.question.clone(),
                    }),
                });
            }
            if let Some(s) = self.sentences.get(i) {
                exercises.push(Exercise {
                    id: format!("sentence:{}", s.word.to_lowercase()),
                    prompt: Prompt::Writing(WritingPrompt::Sentence {
                        word: s.word.clone(),
                    }),
                });
            }
            if let Some(c) = self.completions.get(i) {
                exercises.push(Exercise {
                    id: format!("complete:{}", i + 1),
                    prompt: Prompt::Writing(WritingPrompt::Complete {
                        partial: c.text.clone(),
                        target_word: Some(c.answer.trim())
                            .filter(|a| !a.is_empty())
                            .map(str::to_string),
                    }),
                });
            }
        }

        exercises
    }

    /// Look up an exercise by id.
    pub fn exercise(&self, id: &str) -> Option<Exercise> {
        self.exercises().into_iter().find(|e| e.id == id)
    }
}

/// A learner's answer to one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Exercise id within the lesson.
    pub exercise: String,
    /// Transcript (speaking) or typed answer (writing).
    pub answer: String,
}
