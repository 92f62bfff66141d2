//! Subcommand implementations.

use anyhow::Result;
use clap::ValueEnum;

use quizgen_core::QuizService;
use quizgen_providers::config::load_config_from;
use quizgen_providers::QuizgenConfig;

use crate::ModelArgs;

pub mod evaluate;
pub mod generate;
pub mod init;
pub mod list_models;
pub mod serve;

/// How one-shot results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON, same shape as the HTTP responses
    Json,
    /// Human-readable table
    Table,
}

/// Load the config and build the handler service the flags ask for.
pub fn build_service(args: &ModelArgs) -> Result<(QuizgenConfig, QuizService)> {
    let config = load_config_from(args.config.as_deref())?;
    let provider = config.provider(args.provider.as_deref())?;
    let service = QuizService::new(provider, config.service_config(args.model.as_deref()));
    tracing::debug!(
        provider = service.provider_name(),
        model = %service.config().model,
        "service ready"
    );
    Ok((config, service))
}
