use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

use crate::core::config::AuthConfig;
use crate::core::middleware;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, JwtValidator, TokenService};
use crate::features::comments::{routes as comments_routes, CommentService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::store::Store;

/// Every service the API routes need, built over one store
#[derive(Clone)]
pub struct AppServices {
    pub jwt_validator: Arc<JwtValidator>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub reports: Arc<ReportService>,
    pub comments: Arc<CommentService>,
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>, auth_config: &AuthConfig) -> Self {
        let jwt_validator = Arc::new(JwtValidator::new(
            &auth_config.jwt_secret,
            auth_config.jwt_leeway,
        ));
        let token_service = Arc::new(TokenService::new(auth_config));
        let auth = Arc::new(AuthService::new(Arc::clone(&store), token_service));
        let users = Arc::new(UserService::new(Arc::clone(&store)));
        let reports = Arc::new(ReportService::new(Arc::clone(&store), Arc::clone(&users)));
        let comments = Arc::new(CommentService::new(store, Arc::clone(&users)));

        Self {
            jwt_validator,
            auth,
            users,
            reports,
            comments,
        }
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// API routes: public auth endpoints, the health probe, and everything else
/// behind the session token check.
pub fn api_router(services: &AppServices) -> Router {
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(users_routes::routes(Arc::clone(&services.users)))
        .merge(reports_routes::routes(Arc::clone(&services.reports)))
        .merge(comments_routes::routes(Arc::clone(&services.comments)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.jwt_validator),
            middleware::auth_middleware,
        ));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .route("/health", get(health_check));

    Router::new().merge(protected_routes).merge(public_routes)
}
