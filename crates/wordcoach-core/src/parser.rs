//! TOML lesson and attempt file parser.
//!
//! Loads lessons from TOML files and directories, validates them, and reads
//! the attempt files fed to `wordcoach practice`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Attempt, CompletionItem, Lesson, QuestionItem, SentenceItem, VocabularyItem};

/// Intermediate TOML structure for parsing lesson files.
#[derive(Debug, Deserialize)]
struct TomlLessonFile {
    lesson: TomlLessonHeader,
    #[serde(default)]
    vocabulary: Vec<TomlVocabulary>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    sentences: Vec<TomlSentence>,
    #[serde(default)]
    completions: Vec<TomlCompletion>,
}

#[derive(Debug, Deserialize)]
struct TomlLessonHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlVocabulary {
    #[serde(default)]
    id: Option<String>,
    word: String,
    #[serde(default)]
    example: String,
    #[serde(default)]
    emoji: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    question: String,
    #[serde(default)]
    hint: String,
}

#[derive(Debug, Deserialize)]
struct TomlSentence {
    word: String,
    #[serde(default)]
    example: String,
    #[serde(default)]
    emoji: String,
}

#[derive(Debug, Deserialize)]
struct TomlCompletion {
    text: String,
    #[serde(default)]
    answer: String,
}

/// Parse a single TOML file into a `Lesson`.
pub fn parse_lesson(path: &Path) -> Result<Lesson> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lesson file: {}", path.display()))?;

    parse_lesson_str(&content, path)
}

/// Parse a TOML string into a `Lesson` (useful for testing).
pub fn parse_lesson_str(content: &str, source_path: &Path) -> Result<Lesson> {
    let parsed: TomlLessonFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let vocabulary = parsed
        .vocabulary
        .into_iter()
        .map(|v| VocabularyItem {
            // Vocabulary ids default to the lowercased word.
            id: v.id.unwrap_or_else(|| v.word.trim().to_lowercase()),
            word: v.word,
            example: v.example,
            emoji: v.emoji,
        })
        .collect();

    Ok(Lesson {
        id: parsed.lesson.id,
        title: parsed.lesson.title,
        description: parsed.lesson.description,
        vocabulary,
        questions: parsed
            .questions
            .into_iter()
            .map(|q| QuestionItem {
                question: q.question,
                hint: q.hint,
            })
            .collect(),
        sentences: parsed
            .sentences
            .into_iter()
            .map(|s| SentenceItem {
                word: s.word,
                example: s.example,
                emoji: s.emoji,
            })
            .collect(),
        completions: parsed
            .completions
            .into_iter()
            .map(|c| CompletionItem {
                text: c.text,
                answer: c.answer,
            })
            .collect(),
    })
}

/// Recursively load all `.toml` lesson files from a directory.
pub fn load_lesson_directory(dir: &Path) -> Result<Vec<Lesson>> {
    let mut lessons = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            lessons.extend(load_lesson_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_lesson(&path) {
                Ok(lesson) => lessons.push(lesson),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(lessons)
}

/// Load one lesson file, or every lesson under a directory.
pub fn load_lessons(path: &Path) -> Result<Vec<Lesson>> {
    if path.is_dir() {
        load_lesson_directory(path)
    } else {
        Ok(vec![parse_lesson(path)?])
    }
}

/// A warning from lesson validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The exercise or item the warning refers to (if applicable).
    pub item: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a lesson for common authoring mistakes.
pub fn validate_lesson(lesson: &Lesson) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for item in &lesson.vocabulary {
        if !seen_ids.insert(item.id.as_str()) {
            warnings.push(ValidationWarning {
                item: Some(item.id.clone()),
                message: format!("duplicate vocabulary id: {}", item.id),
            });
        }
        if item.word.trim().is_empty() {
            warnings.push(ValidationWarning {
                item: Some(item.id.clone()),
                message: "vocabulary word is empty".into(),
            });
        }
    }

    for (i, q) in lesson.questions.iter().enumerate() {
        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                item: Some(format!("qa:{}", i + 1)),
                message: "question is empty".into(),
            });
        }
    }

    let mut seen_sentence_words = HashSet::new();
    for s in &lesson.sentences {
        if s.word.trim().is_empty() {
            warnings.push(ValidationWarning {
                item: None,
                message: "sentence word is empty".into(),
            });
        } else if !seen_sentence_words.insert(s.word.to_lowercase()) {
            warnings.push(ValidationWarning {
                item: Some(format!("sentence:{}", s.word.to_lowercase())),
                message: format!("duplicate sentence word: {}", s.word),
            });
        }
    }

    for (i, c) in lesson.completions.iter().enumerate() {
        let item = Some(format!("complete:{}", i + 1));
        if !c.text.contains("___") {
            warnings.push(ValidationWarning {
                item: item.clone(),
                message: "completion has no ___ blank".into(),
            });
        }
        if c.answer.trim().is_empty() {
            warnings.push(ValidationWarning {
                item,
                message: "completion has no answer".into(),
            });
        }
    }

    if lesson.exercises().is_empty() {
        warnings.push(ValidationWarning {
            item: None,
            message: "lesson has no exercises".into(),
        });
    }

    warnings
}

#[derive(Debug, Deserialize)]
struct TomlAttemptFile {
    #[serde(default)]
    attempts: Vec<Attempt>,
}

/// Parse a TOML file of learner attempts.
pub fn parse_attempts(path: &Path) -> Result<Vec<Attempt>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read attempts file: {}", path.display()))?;
    parse_attempts_str(&content, path)
}

/// Parse a TOML string of learner attempts.
pub fn parse_attempts_str(content: &str, source_path: &Path) -> Result<Vec<Attempt>> {
    let parsed: TomlAttemptFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(parsed.attempts)
}
