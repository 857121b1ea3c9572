// src/quiz/mod.rs

pub mod bank;
pub mod engine;
pub mod pending;

pub use bank::QuestionBank;
pub use engine::{QuizEngine, UserId};
pub use pending::PendingQuestions;
