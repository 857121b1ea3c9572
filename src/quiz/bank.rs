// src/quiz/bank.rs

use std::path::Path;

use validator::Validate;

use crate::{
    error::BankError,
    models::question::{Question, QuestionRecord},
};

/// Immutable, ordered collection of validated questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Loads and validates a JSON array of question records from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BankError::NotFound(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let bank = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            question_count = bank.len(),
            "Question bank loaded"
        );
        Ok(bank)
    }

    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;
        Self::from_records(records)
    }

    /// Validates every record in order; the first bad one aborts construction.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self, BankError> {
        let questions = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| validate_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

fn validate_record(index: usize, record: QuestionRecord) -> Result<Question, BankError> {
    record.validate().map_err(|e| BankError::Validation {
        index,
        reason: e.to_string(),
    })?;

    let invalid_answer = || BankError::Validation {
        index,
        reason: "correct answer index is invalid".to_string(),
    };

    let correct_index = record
        .answer
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(invalid_answer)?;

    if correct_index >= record.choices.len() {
        return Err(invalid_answer());
    }

    Ok(Question {
        text: record.question,
        choices: record.choices,
        correct_index,
    })
}
