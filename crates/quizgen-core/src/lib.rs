//! quizgen-core — Quiz data model, prompts, and model-output extraction.
//!
//! This crate defines the data model, the completion provider trait, the
//! prompt templates, and the extractor that turns free-form model replies
//! into typed quiz items and evaluations.

pub mod error;
pub mod extract;
pub mod model;
pub mod prompt;
pub mod service;
pub mod traits;

pub use error::{ProviderError, QuizError};
pub use model::{ChoiceQuestion, Evaluation, EvaluationRequest, GenerationRequest, QuizItem, TextQuestion};
pub use service::{QuizService, QuizServiceConfig};
