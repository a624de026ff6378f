use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

/// Create routes for the comments feature (auth applied by caller)
pub fn routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route("/api/comments", post(handlers::create_comment))
        .route(
            "/api/comments/bug-report/{id}",
            get(handlers::list_report_comments),
        )
        .route("/api/comments/{id}", delete(handlers::delete_comment))
        .with_state(service)
}
