//! Request plumbing shared by the HTTP-backed providers.

use std::time::Duration;

use anyhow::Context;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use quizgen_core::error::ProviderError;

/// Seconds to wait when a 429 carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn client(timeout_secs: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

/// Classify a failed `send()`.
pub(crate) fn send_error(err: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::NetworkError(err.to_string())
    }
}

/// Pass a 2xx response through; turn anything else into a `ProviderError`.
///
/// `api_message` pulls the human-readable message out of an error body when
/// the API wraps it in JSON.
pub(crate) async fn check_status(
    response: Response,
    model: &str,
    api_message: fn(&str) -> Option<String>,
) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after_secs * 1000,
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = api_message(&body).unwrap_or(body);
    Err(match status {
        StatusCode::UNAUTHORIZED => ProviderError::AuthenticationFailed(message),
        StatusCode::NOT_FOUND if message.is_empty() => ProviderError::ModelNotFound(model.to_string()),
        StatusCode::NOT_FOUND => ProviderError::ModelNotFound(format!("{model}: {message}")),
        _ => ProviderError::ApiError {
            status: status.as_u16(),
            message,
        },
    })
}

pub(crate) async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    response.json().await.map_err(|e| ProviderError::ApiError {
        status: 0,
        message: format!("failed to parse response: {e}"),
    })
}
