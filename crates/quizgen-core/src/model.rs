//! Core data model types for quizgen.
//!
//! Every value here is built once per request, from either a client request
//! body or parsed model output, and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// One generated question.
///
/// Serialized with an explicit `"type"` discriminator (`"choice"` or
/// `"text"`). Deserialization goes through [`RawQuizItem`] so that model
/// output which omits the discriminator is still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawQuizItem")]
pub enum QuizItem {
    /// Multiple-choice question.
    Choice(ChoiceQuestion),
    /// Free-response question, graded by the evaluator.
    Text(TextQuestion),
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    pub question: String,
    /// Ordered choices, at least two.
    pub choices: Vec<String>,
    /// Should equal one element of `choices` verbatim. Not enforced.
    pub answer: String,
}

/// A free-response question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuestion {
    pub question: String,
    /// Reference answer.
    pub answer: String,
    /// Points a good answer is expected to mention.
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ChoiceQuestion {
    /// Position of `answer` within `choices`, or `None` when the model
    /// produced an answer that is not one of the choices.
    pub fn answer_index(&self) -> Option<usize> {
        self.choices.iter().position(|c| c == &self.answer)
    }
}

impl QuizItem {
    pub fn question(&self) -> &str {
        match self {
            QuizItem::Choice(q) => &q.question,
            QuizItem::Text(q) => &q.question,
        }
    }

    pub fn answer(&self) -> &str {
        match self {
            QuizItem::Choice(q) => &q.answer,
            QuizItem::Text(q) => &q.answer,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, QuizItem::Choice(_))
    }
}

/// Loosely-typed quiz item as it appears in model output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuizItem {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    question: String,
    #[serde(default)]
    choices: Option<Vec<String>>,
    answer: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl TryFrom<RawQuizItem> for QuizItem {
    type Error = String;

    fn try_from(raw: RawQuizItem) -> Result<Self, Self::Error> {
        let kind = raw.kind.as_deref().map(|k| k.trim().to_ascii_lowercase());
        let is_choice = match kind.as_deref() {
            Some("choice" | "multiple_choice" | "multiple-choice") => true,
            Some("text" | "free_response" | "free-response" | "short_answer") => false,
            Some(other) => return Err(format!("unknown question type `{other}`")),
            None => raw.choices.is_some(),
        };

        if !is_choice {
            return Ok(QuizItem::Text(TextQuestion {
                question: raw.question,
                answer: raw.answer,
                key_points: raw.key_points,
                hint: raw.hint,
            }));
        }

        let choices = raw
            .choices
            .ok_or_else(|| "multiple-choice question without `choices`".to_string())?;
        if choices.len() < 2 {
            return Err(format!(
                "multiple-choice question needs at least 2 choices, got {}",
                choices.len()
            ));
        }

        Ok(QuizItem::Choice(ChoiceQuestion {
            question: raw.question,
            choices,
            answer: raw.answer,
        }))
    }
}

/// Structured grading of a free-response answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Nominally 0..=100. Passed through unclamped.
    pub score: i64,
    pub feedback: String,
    /// Points the user's answer covered.
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Points the user's answer missed.
    #[serde(default)]
    pub missing_points: Vec<String>,
    #[serde(default)]
    pub suggestions: String,
}

impl Evaluation {
    pub const MIN_SCORE: i64 = 0;
    pub const MAX_SCORE: i64 = 100;

    pub fn score_in_range(&self) -> bool {
        (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&self.score)
    }
}

/// Body of a quiz generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Raw study material.
    pub text: String,
}

impl GenerationRequest {
    /// Reject requests that would only waste an upstream call.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.text.trim().is_empty() {
            return Err(QuizError::InvalidRequest("`text` must not be empty".into()));
        }
        Ok(())
    }
}

/// Body of an answer evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub question: String,
    /// Reference answer.
    pub answer: String,
    /// The answer the user submitted.
    pub user_answer: String,
}

impl EvaluationRequest {
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.question.trim().is_empty() {
            return Err(QuizError::InvalidRequest(
                "`question` must not be empty".into(),
            ));
        }
        if self.user_answer.trim().is_empty() {
            return Err(QuizError::InvalidRequest(
                "`userAnswer` must not be empty".into(),
            ));
        }
        Ok(())
    }
}
