//! The `quizgen evaluate` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizgen_core::{Evaluation, EvaluationRequest};

use super::OutputFormat;
use crate::ModelArgs;

pub async fn execute(
    question: String,
    answer: String,
    user_answer: String,
    format: OutputFormat,
    args: ModelArgs,
) -> Result<()> {
    let (_, service) = super::build_service(&args)?;
    let request = EvaluationRequest {
        question,
        answer,
        user_answer,
    };

    let evaluation = service
        .evaluate_answer(&request)
        .await
        .context("answer evaluation failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&evaluation)?),
        OutputFormat::Table => println!("{}", evaluation_table(&evaluation)),
    }
    Ok(())
}

fn evaluation_table(evaluation: &Evaluation) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("Score"), Cell::new(evaluation.score)]);
    table.add_row(vec![Cell::new("Feedback"), Cell::new(&evaluation.feedback)]);
    table.add_row(vec![
        Cell::new("Key points"),
        Cell::new(evaluation.key_points.join("\n")),
    ]);
    table.add_row(vec![
        Cell::new("Missing points"),
        Cell::new(evaluation.missing_points.join("\n")),
    ]);
    table.add_row(vec![
        Cell::new("Suggestions"),
        Cell::new(&evaluation.suggestions),
    ]);
    table
}
