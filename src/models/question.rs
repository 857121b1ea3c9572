// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single trivia question held by the bank.
///
/// Only constructed through bank validation, so `correct_index` always points
/// inside `choices` and there are at least two choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// The prompt shown to the player.
    pub text: String,

    /// Selectable answers, in display order.
    pub choices: Vec<String>,

    /// Position of the correct entry in `choices`.
    pub correct_index: usize,
}

impl Question {
    /// Text of the correct choice.
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.correct_index]
    }

    pub fn is_correct(&self, selected_index: usize) -> bool {
        self.correct_index == selected_index
    }
}

/// One record of the JSON question source, before validation.
///
/// `question` is required at the serde level; a record without it is a
/// structural error rather than a validation failure.
#[derive(Debug, Deserialize, Validate)]
pub struct QuestionRecord {
    pub question: String,

    #[serde(default)]
    #[validate(length(min = 2, message = "at least 2 choices are required"))]
    pub choices: Vec<String>,

    /// Kept loose so that non-integer or negative values can be reported as
    /// validation errors instead of parse errors.
    #[serde(default)]
    pub answer: Option<serde_json::Value>,
}

/// DTO for sending a question to the client (excludes the answer key).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub index: usize,
    pub text: String,
    pub choices: Vec<String>,
}

impl PublicQuestion {
    pub fn new(index: usize, question: &Question) -> Self {
        Self {
            index,
            text: question.text.clone(),
            choices: question.choices.clone(),
        }
    }
}

/// DTO for submitting an answer to the question currently on screen.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    /// Bank position previously returned by `/next`.
    #[validate(range(min = 0, max = 1_000_000))]
    pub question_index: i64,

    /// Position of the chosen entry in the question's choices.
    #[validate(range(min = 0, max = 1_000))]
    pub selected_index: i64,
}
