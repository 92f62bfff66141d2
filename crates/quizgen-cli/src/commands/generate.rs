//! The `quizgen generate` command.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizgen_core::{GenerationRequest, QuizItem};

use super::OutputFormat;
use crate::ModelArgs;

pub async fn execute(input: PathBuf, format: OutputFormat, args: ModelArgs) -> Result<()> {
    let text = read_material(&input)?;
    let (_, service) = super::build_service(&args)?;

    let quiz = service
        .generate_quiz(&GenerationRequest { text })
        .await
        .context("quiz generation failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quiz)?),
        OutputFormat::Table => println!("{}", quiz_table(&quiz)),
    }
    Ok(())
}

fn read_material(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read material from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read material: {}", input.display()))
    }
}

fn quiz_table(quiz: &[QuizItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Question", "Choices", "Answer"]);

    for (i, item) in quiz.iter().enumerate() {
        let (kind, choices) = match item {
            QuizItem::Choice(q) => ("choice", q.choices.join("\n")),
            QuizItem::Text(q) => ("text", q.key_points.join("\n")),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(kind),
            Cell::new(item.question()),
            Cell::new(choices),
            Cell::new(item.answer()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::{ChoiceQuestion, TextQuestion};

    #[test]
    fn table_lists_every_item() {
        let quiz = vec![
            QuizItem::Choice(ChoiceQuestion {
                question: "Which layer routes packets?".into(),
                choices: vec!["Network".into(), "Link".into()],
                answer: "Network".into(),
            }),
            QuizItem::Text(TextQuestion {
                question: "What does TCP add over IP?".into(),
                answer: "Reliable delivery".into(),
                key_points: vec!["retransmission".into()],
                hint: None,
            }),
        ];
        let rendered = quiz_table(&quiz).to_string();
        assert!(rendered.contains("Which layer routes packets?"));
        assert!(rendered.contains("retransmission"));
        assert!(rendered.contains("choice"));
        assert!(rendered.contains("text"));
    }

    #[test]
    fn missing_material_file() {
        let err = read_material(Path::new("/nonexistent/material.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read material"));
    }
}
