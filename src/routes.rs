// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers::quiz, state::AppState, utils::jwt::auth_middleware};

/// Assembles the main application router.
///
/// * Quiz routes require a platform-issued bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let quiz_routes = Router::new()
        .route("/start", post(quiz::start_quiz))
        .route("/next", post(quiz::next_question))
        .route("/answer", post(quiz::submit_answer))
        .route("/score", get(quiz::get_score))
        .route("/stop", post(quiz::stop_quiz))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .merge(Router::new().route("/bank", get(quiz::bank_info)));

    Router::new()
        .nest("/api/quiz", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
