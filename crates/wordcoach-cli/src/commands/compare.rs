//! The `wordcoach compare` command.

use std::path::PathBuf;

use anyhow::Result;

use wordcoach_core::report::PracticeReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_slip: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = PracticeReport::load_json(&baseline_path)?;
    let current = PracticeReport::load_json(&current_path)?;

    let progress = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", progress.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            println!(
                "Progress: {} improved, {} slipped, {} unchanged",
                progress.improved.len(),
                progress.slipped.len(),
                progress.unchanged
            );

            if !progress.improved.is_empty() {
                println!("\nImproved:");
                for c in &progress.improved {
                    println!(
                        "  {} {} -> {} ({:+})",
                        c.exercise_id, c.baseline_score, c.current_score, c.delta
                    );
                }
            }

            if !progress.slipped.is_empty() {
                println!("\nSlipped:");
                for c in &progress.slipped {
                    println!(
                        "  {} {} -> {} ({:+})",
                        c.exercise_id, c.baseline_score, c.current_score, c.delta
                    );
                }
            }

            if progress.new_exercises > 0 {
                println!("\n{} new exercise(s)", progress.new_exercises);
            }
            if progress.skipped_exercises > 0 {
                println!("{} exercise(s) not practised this time", progress.skipped_exercises);
            }
        }
    }

    if fail_on_slip && progress.has_slipped() {
        std::process::exit(1);
    }

    Ok(())
}
