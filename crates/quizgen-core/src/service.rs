//! Request handlers for quiz generation and answer evaluation.
//!
//! Each call builds a prompt, makes exactly one completion request, and
//! pushes the reply through the extractor. Nothing is retried and nothing is
//! shared between calls beyond the immutable provider handle and config.

use std::sync::Arc;

use tracing::instrument;

use crate::error::QuizError;
use crate::extract::{extract_evaluation, extract_quiz, ExtractError};
use crate::model::{Evaluation, EvaluationRequest, GenerationRequest, QuizItem};
use crate::prompt::{evaluation_prompt, generation_prompt, PromptOptions};
use crate::traits::{CompletionRequest, LlmProvider};

/// Configuration for [`QuizService`].
#[derive(Debug, Clone)]
pub struct QuizServiceConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Max tokens for each completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Prompt template options.
    pub prompt: PromptOptions,
}

impl Default for QuizServiceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            prompt: PromptOptions::default(),
        }
    }
}

/// The quiz generator and answer evaluator.
pub struct QuizService {
    provider: Arc<dyn LlmProvider>,
    config: QuizServiceConfig,
}

impl QuizService {
    pub fn new(provider: Arc<dyn LlmProvider>, config: QuizServiceConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &QuizServiceConfig {
        &self.config
    }

    /// Generate a quiz from `request.text`.
    #[instrument(skip_all, fields(provider = %self.provider.name(), model = %self.config.model))]
    pub async fn generate_quiz(&self, request: &GenerationRequest) -> Result<Vec<QuizItem>, QuizError> {
        request.validate()?;

        let prompt = generation_prompt(&request.text, &self.config.prompt);
        let reply = self.complete(prompt).await?;
        let items = extract_quiz(&reply).map_err(|e| malformed(e, &reply))?;

        if items.is_empty() {
            tracing::error!(raw_reply = %reply, "model returned an empty quiz");
            return Err(QuizError::MalformedModelOutput {
                reason: "quiz contains no questions".into(),
                raw: reply,
            });
        }

        let expected = self.config.prompt.total_questions();
        if items.len() != expected {
            tracing::warn!(expected, got = items.len(), "question count differs from request");
        }
        for (index, item) in items.iter().enumerate() {
            if let QuizItem::Choice(q) = item {
                if q.answer_index().is_none() {
                    tracing::warn!(index, answer = %q.answer, "answer is not one of the choices");
                }
            }
        }

        tracing::info!(questions = items.len(), "quiz generated");
        Ok(items)
    }

    /// Grade a free-response answer against its reference answer.
    #[instrument(skip_all, fields(provider = %self.provider.name(), model = %self.config.model))]
    pub async fn evaluate_answer(&self, request: &EvaluationRequest) -> Result<Evaluation, QuizError> {
        request.validate()?;

        let prompt = evaluation_prompt(request, &self.config.prompt);
        let reply = self.complete(prompt).await?;
        let evaluation = extract_evaluation(&reply).map_err(|e| malformed(e, &reply))?;

        if !evaluation.score_in_range() {
            tracing::warn!(score = evaluation.score, "score outside 0..=100, passing through");
        }

        tracing::info!(score = evaluation.score, "answer evaluated");
        Ok(evaluation)
    }

    async fn complete(&self, prompt: String) -> Result<String, QuizError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self.provider.complete(&request).await.map_err(|e| {
            tracing::error!("completion request failed: {e:#}");
            QuizError::UpstreamUnavailable(format!("{e:#}"))
        })?;

        if response.content.trim().is_empty() {
            tracing::error!("completion returned an empty reply");
            return Err(QuizError::UpstreamUnavailable(
                "model returned an empty reply".into(),
            ));
        }

        tracing::debug!(
            latency_ms = response.latency_ms,
            total_tokens = response.token_usage.total_tokens,
            "completion received"
        );
        Ok(response.content)
    }
}

fn malformed(err: ExtractError, reply: &str) -> QuizError {
    tracing::error!(error = %err, raw_reply = %reply, "could not extract JSON from model reply");
    QuizError::MalformedModelOutput {
        reason: err.to_string(),
        raw: reply.to_string(),
    }
}
