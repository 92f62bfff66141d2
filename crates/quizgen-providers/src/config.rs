//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizgen_core::prompt::PromptOptions;
use quizgen_core::traits::LlmProvider;
use quizgen_core::QuizServiceConfig;

use crate::anthropic::AnthropicProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level quizgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgenConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used when none is named explicitly.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model used when none is named explicitly.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Address the HTTP endpoints listen on.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Multiple-choice questions per generated quiz.
    #[serde(default = "default_question_count")]
    pub choice_questions: usize,
    /// Free-response questions per generated quiz.
    #[serde(default = "default_question_count")]
    pub text_questions: usize,
    /// Language the model writes questions and feedback in.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}
fn default_question_count() -> usize {
    5
}
fn default_language() -> String {
    "Japanese".to_string()
}

impl Default for QuizgenConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            bind: default_bind(),
            choice_questions: default_question_count(),
            text_questions: default_question_count(),
            language: default_language(),
        }
    }
}

impl QuizgenConfig {
    /// Handler settings derived from this configuration.
    pub fn service_config(&self, model: Option<&str>) -> QuizServiceConfig {
        QuizServiceConfig {
            model: model.unwrap_or(&self.default_model).to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            prompt: PromptOptions {
                choice_questions: self.choice_questions,
                text_questions: self.text_questions,
                language: self.language.clone(),
            },
        }
    }

    /// Instantiate the named provider, or the default one.
    pub fn provider(&self, name: Option<&str>) -> Result<Arc<dyn LlmProvider>> {
        let name = name.unwrap_or(&self.default_provider);
        let config = self.providers.get(name).with_context(|| {
            format!("provider '{name}' is not configured (set its API key or add it to quizgen.toml)")
        })?;
        Ok(Arc::from(create_provider(name, config)?))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    expand_vars(s, |name| std::env::var(name).ok())
}

/// Substitute each `${NAME}` with `lookup(NAME)`, or nothing when unset.
/// Substituted values are copied verbatim and never expanded again.
fn expand_vars(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&lookup(&rest[start + 2..start + len]).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Fill provider API keys from the environment. `lookup` returns the value of
/// an environment variable; the first variable set in each list wins.
fn apply_key_overrides(config: &mut QuizgenConfig, lookup: impl Fn(&str) -> Option<String>) {
    let first_set = |vars: &[&str]| vars.iter().find_map(|v| lookup(v).filter(|k| !k.is_empty()));

    if let Some(key) = first_set(&["QUIZGEN_OPENAI_KEY", "OPENAI_API_KEY"]) {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Some(key) = first_set(&["QUIZGEN_ANTHROPIC_KEY", "ANTHROPIC_API_KEY"]) {
        let entry = config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Anthropic { api_key, .. } = entry {
            *api_key = key;
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizgen.toml` in the current directory
/// 2. `~/.config/quizgen/config.toml`
///
/// Environment variable overrides: `QUIZGEN_OPENAI_KEY` / `OPENAI_API_KEY`,
/// `QUIZGEN_ANTHROPIC_KEY` / `ANTHROPIC_API_KEY`.
pub fn load_config() -> Result<QuizgenConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgenConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgen.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgenConfig::default(),
    };

    apply_key_overrides(&mut config, |var| std::env::var(var).ok());

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

/// Parse a TOML configuration string.
pub fn parse_config(content: &str) -> Result<QuizgenConfig> {
    Ok(toml::from_str::<QuizgenConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgen"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    tracing::debug!(provider = name, "creating provider");
    match config {
        ProviderConfig::Anthropic { api_key, base_url } => {
            Ok(Box::new(AnthropicProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Ok(Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?)),
        ProviderConfig::Ollama { base_url } => Ok(Box::new(OllamaProvider::new(base_url)?)),
    }
}
