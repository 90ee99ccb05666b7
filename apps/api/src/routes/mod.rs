pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handle_export;
use crate::screening::handlers;
use crate::state::AppState;

/// CV batches blow through axum's 2 MB default body limit.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Role API
        .route("/api/v1/roles", post(handlers::handle_save_role))
        .route("/api/v1/roles/confirm", post(handlers::handle_confirm_role))
        .route("/api/v1/roles/current", get(handlers::handle_get_role))
        // Candidate API
        .route(
            "/api/v1/candidates/process",
            post(handlers::handle_process).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/candidates/progress", get(handlers::handle_progress))
        .route("/api/v1/candidates", get(handlers::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(handlers::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/review",
            post(handlers::handle_mark_reviewed),
        )
        .route(
            "/api/v1/candidates/:id/notes",
            post(handlers::handle_submit_notes),
        )
        // Export API
        .route("/api/v1/export", get(handle_export))
        .with_state(state)
}
