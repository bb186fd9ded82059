//! Application configuration and grading provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wordcoach_core::traits::GradingProvider;
use wordcoach_core::ScoringConfig;

use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single grading provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
        }
    }
}

/// Top-level wordcoach configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordcoachConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider for writing exercises.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default grading model.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Default temperature (0.0 keeps grades repeatable).
    #[serde(default)]
    pub default_temperature: f64,
    /// Max retries on provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Max concurrent grading requests.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for practice reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Speaking scorer thresholds, scores, and feedback.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./wordcoach-results")
}

impl Default for WordcoachConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: 0.0,
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `wordcoach.toml` in the current directory
/// 2. `~/.config/wordcoach/config.toml`
///
/// Environment variable overrides: `WORDCOACH_GEMINI_KEY` (or
/// `AI_GATEWAY_API_KEY`), `WORDCOACH_OPENAI_KEY`.
pub fn load_config() -> Result<WordcoachConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<WordcoachConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("wordcoach.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<WordcoachConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => WordcoachConfig::default(),
    };

    apply_env_overrides(&mut config);

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    config
        .scoring
        .validate()
        .context("invalid [scoring] configuration")?;

    Ok(config)
}

fn apply_env_overrides(config: &mut WordcoachConfig) {
    let gemini_key = std::env::var("WORDCOACH_GEMINI_KEY")
        .or_else(|_| std::env::var("AI_GATEWAY_API_KEY"))
        .ok();
    if let Some(key) = gemini_key {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("WORDCOACH_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("wordcoach"))
}

/// Create a grading provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn GradingProvider>> {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            if api_key.is_empty() {
                anyhow::bail!("gemini provider has no API key (set WORDCOACH_GEMINI_KEY)");
            }
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            if api_key.is_empty() {
                anyhow::bail!("openai provider has no API key (set WORDCOACH_OPENAI_KEY)");
            }
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
            )?))
        }
    }
}
