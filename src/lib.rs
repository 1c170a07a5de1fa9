pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::services::{attempt_service::AttemptService, quiz_service::QuizService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub quiz_service: QuizService,
    pub attempt_service: AttemptService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let quiz_service = QuizService::new(pool.clone());
        let attempt_service = AttemptService::new(pool.clone());

        Self {
            pool,
            quiz_service,
            attempt_service,
        }
    }
}

/// Builds the full application router. Shared between `main` and the
/// integration tests so both exercise the same wiring.
pub fn build_router(state: AppState, public_rps: u32) -> Router {
    let api = Router::new()
        .route(
            "/api/quiz",
            get(routes::quiz::list_quizzes).post(routes::quiz::create_quiz),
        )
        .route("/api/quiz/import", post(routes::quiz::import_quiz))
        .route(
            "/api/quiz/:id",
            get(routes::quiz::get_quiz)
                .put(routes::quiz::update_quiz)
                .delete(routes::quiz::delete_quiz),
        )
        .route("/api/quiz/:id/submit", post(routes::quiz::submit_quiz))
        .route(
            "/api/quiz/:id/attempts",
            get(routes::quiz::list_quiz_attempts),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(api)
        .with_state(state)
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
}
