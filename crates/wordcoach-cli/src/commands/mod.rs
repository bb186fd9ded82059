pub mod compare;
pub mod grade;
pub mod init;
pub mod list_models;
pub mod practice;
pub mod score;
pub mod validate;

use wordcoach_core::engine::GraderSpec;

/// Parse a `provider/model` string, falling back to the configured provider
/// when only a model is given.
pub fn parse_grader_spec(
    spec: Option<&str>,
    default_provider: &str,
    default_model: &str,
) -> GraderSpec {
    match spec.map(str::trim) {
        Some(s) => match s.split_once('/') {
            Some((provider, model)) => GraderSpec {
                provider: provider.to_string(),
                model: model.to_string(),
            },
            None => GraderSpec {
                provider: default_provider.to_string(),
                model: s.to_string(),
            },
        },
        None => GraderSpec {
            provider: default_provider.to_string(),
            model: default_model.to_string(),
        },
    }
}
