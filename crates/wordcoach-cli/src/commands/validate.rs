//! The `wordcoach validate` command.

use std::path::PathBuf;

use anyhow::Result;

use wordcoach_core::parser;

pub fn execute(lesson_path: PathBuf) -> Result<()> {
    let lessons = parser::load_lessons(&lesson_path)?;
    anyhow::ensure!(
        !lessons.is_empty(),
        "no lessons found in {}",
        lesson_path.display()
    );

    let mut total_warnings = 0;

    for lesson in &lessons {
        println!(
            "Lesson: {} ({} exercises)",
            lesson.title,
            lesson.exercises().len()
        );

        let warnings = parser::validate_lesson(lesson);
        for w in &warnings {
            let prefix = w
                .item
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All lessons valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
