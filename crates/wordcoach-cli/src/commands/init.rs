//! The `wordcoach init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("wordcoach.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("lessons")?;
    write_if_missing(Path::new("lessons/animals.toml"), EXAMPLE_LESSON)?;

    std::fs::create_dir_all("attempts")?;
    write_if_missing(Path::new("attempts/animals.toml"), EXAMPLE_ATTEMPTS)?;

    println!("\nNext steps:");
    println!("  1. Set WORDCOACH_GEMINI_KEY (or edit wordcoach.toml) to grade writing");
    println!("  2. Run: wordcoach validate --lesson lessons/animals.toml");
    println!(
        "  3. Run: wordcoach practice --lesson lessons/animals.toml --attempts attempts/animals.toml"
    );

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# wordcoach configuration

default_provider = "gemini"
default_model = "gemini-2.0-flash"
default_temperature = 0.0
parallelism = 4

[providers.gemini]
type = "gemini"
api_key = "${WORDCOACH_GEMINI_KEY}"

# [providers.openai]
# type = "openai"
# api_key = "${OPENAI_API_KEY}"

# Speaking scorer tuning. Values shown are the defaults.
[scoring]
overlap_ratio = 0.4
close_distance = 1
good_distance = 2

[scoring.scores]
perfect = 10
close = 9
good = 7
partial = 5
wrong_word = 3
no_match = 1
"#;

const EXAMPLE_LESSON: &str = r#"[lesson]
id = "animals"
title = "Animals"
description = "Learn animal names and sounds"

[[vocabulary]]
word = "Dog"
emoji = "🐶"
example = "The dog runs in the park."

[[vocabulary]]
word = "Cat"
emoji = "🐱"
example = "The cat is sleeping on the bed."

[[vocabulary]]
word = "Bird"
emoji = "🐦"
example = "The bird sings in the morning."

[[questions]]
question = "What is your favorite animal?"
hint = "My favorite animal is..."

[[questions]]
question = "Do you have a dog or cat at home?"
hint = "I have a..."

[[questions]]
question = "Where do you see birds?"
hint = "I see birds in the..."

[[sentences]]
word = "dog"
emoji = "🐶"
example = "The dog runs fast."

[[sentences]]
word = "cat"
emoji = "🐱"
example = "The cat is cute."

[[sentences]]
word = "bird"
emoji = "🐦"
example = "The bird sings beautifully."

[[completions]]
text = "The ___ runs in the park."
answer = "dog"

[[completions]]
text = "I have a ___ at home."
answer = "cat"

[[completions]]
text = "The ___ sings a beautiful song."
answer = "bird"
"#;

const EXAMPLE_ATTEMPTS: &str = r#"# What the learner said or wrote, one entry per exercise.

[[attempts]]
exercise = "speak:dog"
answer = "dawg"

[[attempts]]
exercise = "speak:cat"
answer = "Cat!"

[[attempts]]
exercise = "speak:bird"
answer = "burd"

[[attempts]]
exercise = "qa:1"
answer = "My favorite animal is a dog."

[[attempts]]
exercise = "sentence:cat"
answer = "The cat is sleeping."
"#;
