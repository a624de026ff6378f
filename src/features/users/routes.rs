use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Create routes for the users feature (protected)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/auth/users", get(handlers::list_users))
        .with_state(service)
}
