//! quizgen CLI — serve the quiz endpoints or run one-shot generation and evaluation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "quizgen",
    version,
    about = "Generate quizzes from study material and grade free-form answers with an LLM"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that talks to a model.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Provider name from the config (default: `default_provider`)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model id (default: `default_model`)
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON endpoints until Ctrl-C
    Serve {
        /// Listen address (default: `bind` from the config)
        #[arg(long)]
        bind: Option<SocketAddr>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Generate a quiz from a material file
    Generate {
        /// Material file, or `-` for stdin
        #[arg(long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Grade a free-form answer against a reference answer
    Evaluate {
        /// The question that was asked
        #[arg(long)]
        question: String,

        /// Reference answer
        #[arg(long)]
        answer: String,

        /// The answer to grade
        #[arg(long)]
        user_answer: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizgen=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { bind, model } => commands::serve::execute(bind, model).await,
        Commands::Generate {
            input,
            format,
            model,
        } => commands::generate::execute(input, format, model).await,
        Commands::Evaluate {
            question,
            answer,
            user_answer,
            format,
            model,
        } => commands::evaluate::execute(question, answer, user_answer, format, model).await,
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
