//! The `wordcoach score` command.

use std::path::PathBuf;

use anyhow::Result;

use wordcoach_core::Scorer;
use wordcoach_providers::load_config_from;

pub fn execute(
    transcript: String,
    target: String,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let scorer = Scorer::new(config.scoring);

    let verdict = scorer.classify(&transcript, &target);

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("Score: {}/10 ({})", verdict.score, verdict.tier);
        println!("{}", verdict.feedback);
        println!("Tip: {}", verdict.tip);
    }

    Ok(())
}
