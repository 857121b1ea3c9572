// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Duration;

use crate::{
    config::Config,
    quiz::{PendingQuestions, QuestionBank, QuizEngine},
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuizEngine>,
    pub pending: Arc<PendingQuestions>,
    pub config: Config,
}

impl AppState {
    pub fn new(bank: QuestionBank, config: Config) -> Self {
        let timeout = Duration::seconds(config.answer_timeout_secs);
        Self {
            engine: Arc::new(QuizEngine::new(bank)),
            pending: Arc::new(PendingQuestions::new(timeout)),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuizEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

impl FromRef<AppState> for Arc<PendingQuestions> {
    fn from_ref(state: &AppState) -> Self {
        state.pending.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
