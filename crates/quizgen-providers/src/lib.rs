//! quizgen-providers — Completion-model provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI, Anthropic, and Ollama, plus
//! a mock for tests, and loads the quizgen configuration file.

pub mod anthropic;
pub mod config;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, ProviderConfig, QuizgenConfig};
pub use quizgen_core::error::ProviderError;
