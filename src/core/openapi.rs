use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{DeletedDto, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::get_current_user,
        // Users
        users_handlers::list_users,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::list_assigned_reports,
        reports_handlers::list_assigned_open_reports,
        reports_handlers::list_assigned_closed_reports,
        reports_handlers::get_report,
        reports_handlers::update_report,
        reports_handlers::delete_report,
        // Comments
        comments_handlers::create_comment,
        comments_handlers::list_report_comments,
        comments_handlers::delete_comment,
    ),
    components(
        schemas(
            // Shared
            Meta,
            DeletedDto,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            // Users
            users_models::UserRole,
            users_dtos::UserSummaryDto,
            users_dtos::UserProfileDto,
            users_dtos::UserRef,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportSeverity,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::ReportResponseDto,
            // Comments
            comments_dtos::CreateCommentDto,
            comments_dtos::CommentResponseDto,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and the current session"),
        (name = "users", description = "Team members"),
        (name = "reports", description = "Bug reports and assignment views"),
        (name = "comments", description = "Discussion on bug reports"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Bug Tracker API",
        version = "0.1.0",
        description = "API documentation for the team bug tracker",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/user",
            "/api/auth/users",
            "/api/reports",
            "/api/reports/assigned",
            "/api/reports/assigned/open",
            "/api/reports/assigned/closed",
            "/api/reports/{id}",
            "/api/comments",
            "/api/comments/bug-report/{id}",
            "/api/comments/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Tracker".to_string(),
            version: "9.9.9".to_string(),
            description: "internal".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Tracker");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
