//! The `wordcoach list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use wordcoach_providers::{create_provider, load_config_from};

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if provider_filter.as_ref().is_some_and(|f| f != name) {
            continue;
        }

        let provider = match create_provider(&config.providers[name]) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("skipping provider '{name}': {e:#}");
                continue;
            }
        };
        let models = provider.available_models();

        if !models.is_empty() {
            found_any = true;
            println!("Provider: {name}");
            for model in &models {
                println!(
                    "  {} — {} ({}K context, ${:.4}/{:.4} per 1K tokens)",
                    model.id,
                    model.name,
                    model.max_context / 1000,
                    model.cost_per_1k_input,
                    model.cost_per_1k_output,
                );
            }
            println!();
        }
    }

    if !found_any {
        println!("No providers configured. Run `wordcoach init` to create a config file.");
    }

    Ok(())
}
