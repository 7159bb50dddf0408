pub mod health;


use axum::{
    handler::Handler,
    routing::{get, post, MethodRouter},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::state::AppState;
use crate::studio::handlers as studio;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// POST-only route; every other method gets the JSON 405.
fn post_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    post(handler).fallback(method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/auth/signup", post_only(auth::handle_signup))
        .route("/api/auth/login", post_only(auth::handle_login))
        .route(
            "/api/auth/send-verification",
            post_only(auth::handle_send_verification),
        )
        .route(
            "/api/auth/verify-email",
            post_only(auth::handle_verify_email),
        )
        // Generation API
        .route(
            "/api/design/generate",
            post_only(studio::handle_design_generate),
        )
        .route(
            "/api/thumbnail/generate",
            post_only(studio::handle_thumbnail_generate),
        )
        .route(
            "/api/video/generate",
            post_only(studio::handle_video_generate),
        )
        .route("/api/video/process", post_only(studio::handle_video_process))
        .fallback(not_found)
        .with_state(state)
}
