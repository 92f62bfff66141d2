//! Recovery of structured JSON from free-form model replies.
//!
//! Models are told to answer with bare JSON but routinely wrap it in a code
//! fence, preface it with a sentence, or append commentary. Extraction runs
//! in two steps:
//!
//! 1. If the reply contains a fenced code block, its body is used
//!    (a `json`-tagged block is preferred over an untagged one).
//! 2. The first opening bracket of the expected shape and the last closing
//!    bracket are located, and the inclusive span between them is parsed.
//!    If that span does not parse, the leading value alone is tried, so
//!    brackets in trailing commentary do not spoil it.
//!
//! When the fenced body yields nothing usable, the whole reply gets the same
//! treatment: a fence further down may hold an unrelated example rather than
//! the answer.
//!
//! Parsing goes straight into the target type, so schema violations surface
//! here and never further down.

use std::fmt;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Evaluation, QuizItem};

/// The top-level JSON value a caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Array => ('[', ']'),
            JsonShape::Object => ('{', '}'),
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonShape::Array => write!(f, "array"),
            JsonShape::Object => write!(f, "object"),
        }
    }
}

/// Why no value could be recovered from a reply.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No opening/closing bracket pair of the expected shape.
    #[error("no JSON {shape} found in model reply")]
    NotFound { shape: JsonShape },

    /// A bracketed span was found but is not valid JSON of the expected schema.
    #[error("JSON {shape} in model reply is invalid: {source}")]
    Invalid {
        shape: JsonShape,
        #[source]
        source: serde_json::Error,
    },
}

/// Return the body of the most relevant fenced code block in `reply`, or
/// `reply` unchanged when it has none.
///
/// An unclosed fence (truncated reply) still yields its body.
pub fn strip_code_fences(reply: &str) -> &str {
    let mut json_block = None;
    let mut generic_block = None;
    // (body start offset, tagged json, untagged)
    let mut open: Option<(usize, bool, bool)> = None;
    let mut offset = 0;

    for line in reply.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();

        match open {
            None if trimmed.starts_with("```") => {
                let lang = trimmed.trim_start_matches('`').trim().to_ascii_lowercase();
                open = Some((offset, lang == "json", lang.is_empty()));
            }
            Some((start, is_json, is_generic)) if is_fence_close(trimmed) => {
                let body = &reply[start..line_start];
                if is_json && json_block.is_none() {
                    json_block = Some(body);
                } else if is_generic && generic_block.is_none() {
                    generic_block = Some(body);
                }
                open = None;
                if json_block.is_some() {
                    break;
                }
            }
            _ => {}
        }
    }

    if let Some((start, is_json, is_generic)) = open {
        let body = &reply[start..];
        if is_json && json_block.is_none() {
            json_block = Some(body);
        } else if is_generic && generic_block.is_none() {
            generic_block = Some(body);
        }
    }

    json_block.or(generic_block).unwrap_or(reply)
}

fn is_fence_close(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '`')
}

/// Slice from the first opening bracket of `shape` to the last closing one,
/// inclusive.
pub fn find_json_span(text: &str, shape: JsonShape) -> Option<&str> {
    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the value of `shape` at the start of `text`'s span. `None` when
/// `text` has no span at all.
fn parse_span<T: DeserializeOwned>(text: &str, shape: JsonShape) -> Option<serde_json::Result<T>> {
    let span = find_json_span(text, shape)?;
    let parsed = serde_json::from_str(span).or_else(|err| {
        match serde_json::Deserializer::from_str(span).into_iter::<T>().next() {
            Some(Ok(value)) => Ok(value),
            _ => Err(err),
        }
    });
    Some(parsed)
}

/// Extract and deserialize a single JSON value of `shape` from `reply`.
///
/// The fenced body is tried first, then the whole reply. The first parse
/// error is the one reported.
pub fn extract_json<T: DeserializeOwned>(reply: &str, shape: JsonShape) -> Result<T, ExtractError> {
    let fenced = strip_code_fences(reply);
    let candidates: &[&str] = if fenced.len() == reply.len() {
        &[reply]
    } else {
        &[fenced, reply]
    };

    let mut invalid = None;
    for text in candidates {
        match parse_span(text, shape) {
            Some(Ok(value)) => return Ok(value),
            Some(Err(source)) => {
                invalid.get_or_insert(source);
            }
            None => {}
        }
    }

    Err(match invalid {
        Some(source) => ExtractError::Invalid { shape, source },
        None => ExtractError::NotFound { shape },
    })
}

/// Extract a quiz (JSON array of items) from a generation reply.
pub fn extract_quiz(reply: &str) -> Result<Vec<QuizItem>, ExtractError> {
    extract_json(reply, JsonShape::Array)
}

/// Extract an evaluation (JSON object) from an evaluation reply.
pub fn extract_evaluation(reply: &str) -> Result<Evaluation, ExtractError> {
    extract_json(reply, JsonShape::Object)
}
