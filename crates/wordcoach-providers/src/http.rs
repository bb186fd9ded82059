//! HTTP plumbing shared by the graders.

use serde::Deserialize;

use wordcoach_core::error::ProviderError;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Seconds to wait when a 429 carries no usable `retry-after`.
const FALLBACK_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn build_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))
}

pub(crate) fn send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// `{"error": {"message": ...}}`, the shape both Google and OpenAI use.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turn a non-success response into the matching [`ProviderError`].
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    match status {
        429 => {
            let secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(FALLBACK_RETRY_AFTER_SECS);
            Err(ProviderError::RateLimited {
                retry_after_ms: secs * 1000,
            })
        }
        401 | 403 => Err(ProviderError::AuthenticationFailed(
            response.text().await.unwrap_or_default(),
        )),
        404 => Err(ProviderError::ModelNotFound(model.to_string())),
        400.. => {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            Err(ProviderError::ApiError { status, message })
        }
        _ => Ok(response),
    }
}

pub(crate) fn unparseable(e: reqwest::Error) -> ProviderError {
    ProviderError::ApiError {
        status: 0,
        message: format!("failed to parse response: {e}"),
    }
}
