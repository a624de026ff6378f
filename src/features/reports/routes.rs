use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// Every route requires authentication; the caller applies the auth layer.
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/assigned", get(handlers::list_assigned_reports))
        .route(
            "/api/reports/assigned/open",
            get(handlers::list_assigned_open_reports),
        )
        .route(
            "/api/reports/assigned/closed",
            get(handlers::list_assigned_closed_reports),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .with_state(service)
}
