//! Request routing for the quiz endpoints.

use std::fmt::Display;
use std::time::Instant;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use quizgen_core::{EvaluationRequest, GenerationRequest, QuizService};

use crate::response::{json_response, Failure};

const GENERATE_FAILED: &str = "failed to generate quiz";
const EVALUATE_FAILED: &str = "failed to evaluate answer";

/// The endpoints this server knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Generate,
    Evaluate,
    Health,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/api/generate" => Some(Route::Generate),
            "/api/evaluate" => Some(Route::Evaluate),
            "/health" => Some(Route::Health),
            _ => None,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Route::Generate | Route::Evaluate => Method::POST,
            Route::Health => Method::GET,
        }
    }
}

/// Serve one HTTP request. Never fails: every error becomes a JSON
/// `{ "error": ... }` response.
pub async fn handle<B>(req: Request<B>, service: &QuizService) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Display,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let start = Instant::now();
        let response = match try_respond(req, service).await {
            Ok(body) => json_response(StatusCode::OK, body, request_id),
            Err(failure) => failure.into_response(request_id),
        };
        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );
        response
    }
    .instrument(span)
    .await
}

async fn try_respond<B>(req: Request<B>, service: &QuizService) -> Result<Vec<u8>, Failure>
where
    B: Body,
    B::Error: Display,
{
    let route = Route::from_path(req.uri().path()).ok_or_else(Failure::not_found)?;
    if req.method() != route.method() {
        return Err(Failure::method_not_allowed(route.method()));
    }

    match route {
        Route::Health => to_json(&serde_json::json!({ "status": "ok" })),
        Route::Generate => {
            let request: GenerationRequest = read_json(req).await?;
            let quiz = service
                .generate_quiz(&request)
                .await
                .map_err(|e| Failure::from_quiz_error(e, GENERATE_FAILED))?;
            to_json(&quiz)
        }
        Route::Evaluate => {
            let request: EvaluationRequest = read_json(req).await?;
            let evaluation = service
                .evaluate_answer(&request)
                .await
                .map_err(|e| Failure::from_quiz_error(e, EVALUATE_FAILED))?;
            to_json(&evaluation)
        }
    }
}

/// Collect and deserialize a JSON request body.
async fn read_json<B, T>(req: Request<B>) -> Result<T, Failure>
where
    B: Body,
    B::Error: Display,
    T: DeserializeOwned,
{
    let bytes = req
        .into_body()
        .collect()
        .await
        .map_err(|e| Failure::bad_request(format!("failed to read request body: {e}")))?
        .to_bytes();

    serde_json::from_slice(&bytes)
        .map_err(|e| Failure::bad_request(format!("invalid request body: {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, Failure> {
    serde_json::to_vec(value).map_err(|e| {
        tracing::error!("failed to serialize response: {e}");
        Failure::internal("internal error")
    })
}
