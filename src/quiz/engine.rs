// src/quiz/engine.rs

use std::collections::HashMap;

use parking_lot::Mutex;
use rand::seq::IndexedRandom;

use crate::{
    models::{
        question::Question,
        session::{AnswerOutcome, Session},
    },
    quiz::bank::QuestionBank,
};

/// Platform user identifier.
pub type UserId = u64;

pub const MSG_NO_SESSION: &str = "Start a quiz first with /quiz/start.";
pub const MSG_CORRECT: &str = "Correct answer!";
pub const MSG_NOT_ISSUED: &str = "That question was not issued to you in this quiz.";
pub const MSG_ALREADY_GRADED: &str = "That question has already been answered.";

/// Owns the question bank and every user's session.
///
/// All operations are synchronous and never hold the lock across an await.
pub struct QuizEngine {
    bank: QuestionBank,
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl QuizEngine {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Creates a fresh session, discarding any previous one for this user.
    pub fn start_session(&self, user_id: UserId) {
        let replaced = self
            .sessions
            .lock()
            .insert(user_id, Session::default())
            .is_some();
        tracing::info!(user_id, replaced, "Quiz session started");
    }

    pub fn has_session(&self, user_id: UserId) -> bool {
        self.sessions.lock().contains_key(&user_id)
    }

    /// Ends the session and returns its final score, or 0 if there was none.
    pub fn stop_session(&self, user_id: UserId) -> u32 {
        match self.sessions.lock().remove(&user_id) {
            Some(session) => {
                tracing::info!(user_id, score = session.score, "Quiz session stopped");
                session.score
            }
            None => 0,
        }
    }

    pub fn current_score(&self, user_id: UserId) -> u32 {
        self.sessions
            .lock()
            .get(&user_id)
            .map_or(0, |session| session.score)
    }

    /// Draws a uniformly random question this user has not seen yet.
    ///
    /// Returns `None` when there is no session or every question was asked.
    pub fn next_question(&self, user_id: UserId) -> Option<(usize, &Question)> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(&user_id)?;

        let unseen: Vec<usize> = (0..self.bank.len())
            .filter(|index| !session.asked.contains(index))
            .collect();

        let index = *unseen.choose(&mut rand::rng())?;
        session.asked.insert(index);
        tracing::debug!(user_id, index, remaining = unseen.len() - 1, "Question drawn");

        self.bank.get(index).map(|question| (index, question))
    }

    /// Grades `selected_index` against the question at `question_index`.
    ///
    /// Only questions previously drawn for this user are graded, each once.
    pub fn check_answer(
        &self,
        user_id: UserId,
        question_index: usize,
        selected_index: usize,
    ) -> AnswerOutcome {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.get_mut(&user_id) else {
            return AnswerOutcome::rejected(MSG_NO_SESSION);
        };

        let question = match self.bank.get(question_index) {
            Some(question) if session.asked.contains(&question_index) => question,
            _ => {
                tracing::warn!(user_id, question_index, "Grade rejected: question not issued");
                return AnswerOutcome::rejected(MSG_NOT_ISSUED);
            }
        };

        if !session.graded.insert(question_index) {
            tracing::warn!(user_id, question_index, "Grade rejected: already answered");
            return AnswerOutcome::rejected(MSG_ALREADY_GRADED);
        }

        if question.is_correct(selected_index) {
            session.score += 1;
            AnswerOutcome::correct(MSG_CORRECT)
        } else {
            AnswerOutcome::rejected(format!(
                "Wrong answer. The correct choice was: {}",
                question.correct_choice()
            ))
        }
    }
}
