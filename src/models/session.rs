// src/models/session.rs

use std::collections::HashSet;

/// Per-user quiz state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub score: u32,

    /// Bank positions already presented in this session.
    pub asked: HashSet<usize>,

    /// Bank positions already graded; each asked question scores at most once.
    pub graded: HashSet<usize>,
}

/// Result of grading an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub message: String,
}

impl AnswerOutcome {
    pub fn correct(message: impl Into<String>) -> Self {
        Self {
            is_correct: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            message: message.into(),
        }
    }
}
