//! Error types.
//!
//! `ProviderError` describes why a completion call failed. `QuizError` is
//! the taxonomy the request handlers report; provider failures are folded
//! into `QuizError::UpstreamUnavailable`.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The API answered successfully but without any text.
    #[error("model returned an empty reply")]
    EmptyResponse,
}

/// Failure of a single generation or evaluation request.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Missing or unusable request fields. Detected before the model is called.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The completion call itself failed.
    #[error("upstream model unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The model replied, but no schema-conforming JSON could be recovered.
    /// `raw` is kept for server-side diagnosis only.
    #[error("malformed model output: {reason}")]
    MalformedModelOutput { reason: String, raw: String },
}

impl QuizError {
    /// Returns `true` if the caller sent a bad request, as opposed to a
    /// failure on the model side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QuizError::InvalidRequest(_))
    }

    /// The unparsed model reply, if this error came from extraction.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            QuizError::MalformedModelOutput { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_hides_raw_reply() {
        let err = QuizError::MalformedModelOutput {
            reason: "no JSON array found".into(),
            raw: "secret prose".into(),
        };
        assert!(!err.to_string().contains("secret prose"));
        assert_eq!(err.raw_reply(), Some("secret prose"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn invalid_request_is_client_error() {
        assert!(QuizError::InvalidRequest("missing".into()).is_client_error());
        assert!(!QuizError::UpstreamUnavailable("down".into()).is_client_error());
    }

    #[test]
    fn provider_error_messages() {
        let err = ProviderError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
        assert_eq!(
            ProviderError::EmptyResponse.to_string(),
            "model returned an empty reply"
        );
    }
}
