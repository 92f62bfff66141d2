//! Prompt templates.
//!
//! Both builders are pure string templates: caller content is embedded
//! verbatim and never inspected.

use crate::model::EvaluationRequest;

/// Knobs for the prompt templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    /// Number of multiple-choice questions to request.
    pub choice_questions: usize,
    /// Number of free-response questions to request.
    pub text_questions: usize,
    /// Natural language for all generated text.
    pub language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            choice_questions: 5,
            text_questions: 5,
            language: "Japanese".to_string(),
        }
    }
}

impl PromptOptions {
    /// Total number of questions a generation prompt asks for.
    pub fn total_questions(&self) -> usize {
        self.choice_questions + self.text_questions
    }
}

const GENERATION_FORMAT: &str = r#"[
  {"type": "choice", "question": "...", "choices": ["...", "...", "...", "..."], "answer": "..."},
  {"type": "text", "question": "...", "answer": "...", "keyPoints": ["...", "..."], "hint": "..."}
]"#;

const EVALUATION_FORMAT: &str = r#"{
  "score": <integer from 0 to 100>,
  "feedback": "overall feedback on the user's answer",
  "keyPoints": ["important point the answer included", "..."],
  "missingPoints": ["important point the answer missed", "..."],
  "suggestions": "advice for improving the answer"
}"#;

/// Build the prompt asking the model for a JSON array of quiz items about
/// `text`.
pub fn generation_prompt(text: &str, options: &PromptOptions) -> String {
    let mut prompt = String::new();
    prompt.push_str("Create a study quiz from the material below.\n");
    prompt.push_str(&format!(
        "Write exactly {} questions: {} multiple-choice questions followed by {} free-response questions.\n",
        options.total_questions(),
        options.choice_questions,
        options.text_questions,
    ));
    prompt.push_str(&format!(
        "Write every question, choice, answer, key point and hint in {}.\n\n",
        options.language
    ));
    prompt.push_str("Rules:\n");
    prompt.push_str("- Respond with a single JSON array and nothing else. No explanations, no Markdown.\n");
    prompt.push_str("- Multiple-choice items use \"type\": \"choice\", list at least 2 (ideally 4) \"choices\", and give an \"answer\" copied verbatim from \"choices\".\n");
    prompt.push_str("- Free-response items use \"type\": \"text\", give a model \"answer\", the \"keyPoints\" a good answer must mention, and an optional short \"hint\".\n");
    prompt.push_str("- Base every question only on the material.\n\n");
    prompt.push_str("Output format:\n");
    prompt.push_str(GENERATION_FORMAT);
    prompt.push_str("\n\nMaterial:\n");
    prompt.push_str(text);
    prompt.push('\n');
    prompt
}

/// Build the prompt asking the model to grade `request.user_answer` against
/// the reference answer, as a single JSON object.
pub fn evaluation_prompt(request: &EvaluationRequest, options: &PromptOptions) -> String {
    let mut prompt = String::new();
    prompt.push_str("Evaluate the user's answer to the question below against the reference answer.\n");
    prompt.push_str(&format!(
        "Write the feedback, key points and suggestions in {}.\n",
        options.language
    ));
    prompt.push_str("Respond with a single JSON object in exactly this format and nothing else:\n\n");
    prompt.push_str(EVALUATION_FORMAT);
    prompt.push_str("\n\n");
    prompt.push_str(&format!("Question: {}\n", request.question));
    prompt.push_str(&format!("Reference answer: {}\n", request.answer));
    prompt.push_str(&format!("User's answer: {}\n", request.user_answer));
    prompt
}
