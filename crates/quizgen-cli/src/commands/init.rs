//! The `quizgen init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_starter_config(Path::new("quizgen.toml"))?;

    println!("\nNext steps:");
    println!("  1. Set OPENAI_API_KEY (or edit quizgen.toml for another provider)");
    println!("  2. Try it: quizgen generate --input notes.txt --format table");
    println!("  3. Serve it: quizgen serve");

    Ok(())
}

fn write_starter_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, SAMPLE_CONFIG)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgen configuration

default_provider = "openai"
default_model = "gpt-4"
temperature = 0.7
max_tokens = 4096
bind = "127.0.0.1:3000"

# Questions per generated quiz
choice_questions = 5
text_questions = 5
language = "Japanese"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;
