// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{PublicQuestion, SubmitAnswerRequest},
    quiz::{PendingQuestions, QuizEngine, pending::Issue},
    utils::jwt::AuthUser,
};

/// Starts (or restarts) the caller's quiz.
///
/// Any question left pending from a previous round is discarded.
pub async fn start_quiz(
    State(engine): State<Arc<QuizEngine>>,
    State(pending): State<Arc<PendingQuestions>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> impl IntoResponse {
    engine.start_session(user_id);
    pending.clear(user_id);

    Json(json!({
        "message": "Quiz started! Request your first question with /quiz/next.",
        "question_count": engine.bank().len(),
    }))
}

/// Sends the next unseen question.
///
/// * Refuses while a previous question is still awaiting an answer.
/// * When the bank is exhausted the session ends and the final score is returned.
pub async fn next_question(
    State(engine): State<Arc<QuizEngine>>,
    State(pending): State<Arc<PendingQuestions>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    if !engine.has_session(user_id) {
        return Err(AppError::Conflict(
            "Start a quiz first with /quiz/start.".to_string(),
        ));
    }

    let question = match pending.issue(user_id, Utc::now(), || engine.next_question(user_id)) {
        Issue::Blocked => {
            return Err(AppError::Conflict(
                "Answer your current question first.".to_string(),
            ));
        }
        Issue::Exhausted => {
            let final_score = engine.stop_session(user_id);
            return Ok(Json(json!({
                "finished": true,
                "final_score": final_score,
                "message": format!(
                    "No questions left! Your final score: {}. Use /quiz/start to play again.",
                    final_score
                ),
            })));
        }
        Issue::Issued(index, question) => PublicQuestion::new(index, question),
    };

    Ok(Json(json!({
        "finished": false,
        "question": question,
        "expires_in": pending.timeout().num_seconds(),
    })))
}

/// Grades the answer to the pending question.
///
/// The pending marker is cleared whatever the outcome.
pub async fn submit_answer(
    State(engine): State<Arc<QuizEngine>>,
    State(pending): State<Arc<PendingQuestions>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let question_index = usize::try_from(req.question_index)
        .map_err(|_| AppError::BadRequest("Invalid question index".to_string()))?;
    let selected_index = usize::try_from(req.selected_index)
        .map_err(|_| AppError::BadRequest("Invalid selected index".to_string()))?;

    if engine.has_session(user_id) {
        match pending.take(user_id) {
            Some(current) if current.is_expired(Utc::now(), pending.timeout()) => {
                return Err(AppError::Conflict(
                    "Time is up for this question. Request a new one with /quiz/next.".to_string(),
                ));
            }
            Some(current) if current.index != question_index => {
                pending.set(user_id, current.index, current.issued_at);
                return Err(AppError::Conflict(
                    "That is not the question you are answering.".to_string(),
                ));
            }
            Some(_) => {}
            None => {
                return Err(AppError::Conflict(
                    "No question is waiting for an answer. Use /quiz/next.".to_string(),
                ));
            }
        }
    }

    let outcome = engine.check_answer(user_id, question_index, selected_index);
    let score = engine.current_score(user_id);

    let mut message = outcome.message;
    if !outcome.is_correct && engine.has_session(user_id) {
        message.push_str("\nUse /quiz/next to continue.");
    }

    Ok(Json(json!({
        "correct": outcome.is_correct,
        "message": message,
        "score": score,
    })))
}

/// Returns the caller's running score (0 without a session).
pub async fn get_score(
    State(engine): State<Arc<QuizEngine>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> impl IntoResponse {
    Json(json!({
        "score": engine.current_score(user_id),
        "active": engine.has_session(user_id),
    }))
}

/// Ends the caller's quiz and reports the final score.
pub async fn stop_quiz(
    State(engine): State<Arc<QuizEngine>>,
    State(pending): State<Arc<PendingQuestions>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> impl IntoResponse {
    let final_score = engine.stop_session(user_id);
    pending.clear(user_id);

    Json(json!({
        "final_score": final_score,
        "message": format!("Quiz stopped. Your total score: {}", final_score),
    }))
}

/// Public bank summary.
pub async fn bank_info(State(engine): State<Arc<QuizEngine>>) -> impl IntoResponse {
    Json(json!({
        "question_count": engine.bank().len(),
    }))
}
