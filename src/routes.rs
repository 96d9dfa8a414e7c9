// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{host, quiz, user},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (host, user, quiz).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, config, generator).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let host_routes = Router::new()
        .route("/signup", post(host::signup))
        .route("/login", post(host::login))
        .route("/{host_id}/quizzes", get(host::list_quizzes));

    let user_routes = Router::new()
        .route("/login", post(user::login))
        .route("/{user_id}/history", get(user::history));

    let quiz_routes = Router::new()
        .route("/create", post(quiz::create))
        .route("/submit", post(quiz::submit))
        .route("/{code}", get(quiz::get_by_code));

    Router::new()
        .nest("/api/host", host_routes)
        .nest("/api/user", user_routes)
        .nest("/api/quiz", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
