//! Response construction and error mapping.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use quizgen_core::QuizError;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// A request that could not be served, with the message shown to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub status: StatusCode,
    pub message: String,
    /// Method the route accepts, sent as `Allow` on a 405.
    pub allow: Option<Method>,
}

impl Failure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            allow: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found")
    }

    pub fn method_not_allowed(allowed: Method) -> Self {
        Self {
            allow: Some(allowed),
            ..Self::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a handler error onto a client response. Model-side failures get
    /// `generic` so no upstream detail or raw model text leaks out.
    pub fn from_quiz_error(err: QuizError, generic: &str) -> Self {
        match err {
            QuizError::InvalidRequest(message) => Self::bad_request(message),
            QuizError::UpstreamUnavailable(_) | QuizError::MalformedModelOutput { .. } => {
                Self::internal(generic)
            }
        }
    }

    pub fn body(&self) -> Vec<u8> {
        let body = ErrorBody {
            error: &self.message,
        };
        serde_json::to_vec(&body).unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec())
    }

    /// The JSON error response, with `Allow` set when a method was refused.
    pub fn into_response(self, request_id: Uuid) -> Response<Full<Bytes>> {
        let mut response = json_response(self.status, self.body(), request_id);
        if let Some(allow) = self.allow {
            if let Ok(value) = HeaderValue::from_str(allow.as_str()) {
                response.headers_mut().insert(ALLOW, value);
            }
        }
        response
    }
}

/// Build a JSON response tagged with `request_id`.
pub fn json_response(status: StatusCode, body: Vec<u8>, request_id: Uuid) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(id) = HeaderValue::from_str(&request_id.to_string()) {
        headers.insert(REQUEST_ID_HEADER, id);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_failures_are_generic() {
        let failure = Failure::from_quiz_error(
            QuizError::MalformedModelOutput {
                reason: "no JSON array found".into(),
                raw: "I cannot answer that.".into(),
            },
            "failed to generate quiz",
        );
        assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failure.message, "failed to generate quiz");

        let failure = Failure::from_quiz_error(
            QuizError::UpstreamUnavailable("authentication failed: sk-...".into()),
            "failed to evaluate answer",
        );
        assert_eq!(failure.message, "failed to evaluate answer");
    }

    #[test]
    fn invalid_request_keeps_detail() {
        let failure = Failure::from_quiz_error(
            QuizError::InvalidRequest("`text` must not be empty".into()),
            "unused",
        );
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.message, "`text` must not be empty");
    }

    #[test]
    fn error_body_shape() {
        let body = Failure::not_found().body();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({"error": "not found"}));
    }

    #[test]
    fn method_not_allowed_sets_allow() {
        let response = Failure::method_not_allowed(Method::POST).into_response(Uuid::new_v4());
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "POST");

        let response = Failure::not_found().into_response(Uuid::new_v4());
        assert!(!response.headers().contains_key(ALLOW));
    }

    #[test]
    fn response_headers() {
        let id = Uuid::new_v4();
        let response = json_response(StatusCode::OK, b"[]".to_vec(), id);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[REQUEST_ID_HEADER], id.to_string().as_str());
    }
}
