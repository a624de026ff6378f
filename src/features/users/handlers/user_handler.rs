use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::UserSummaryDto;
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;

/// List team members (used to pick an assignee)
#[utoipa::path(
    get,
    path = "/api/auth/users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserSummaryDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    _user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<UserSummaryDto>>>> {
    let users = service.list_users().await?;
    Ok(Json(ApiResponse::list(users)))
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::{register_user, test_server};
    use serde_json::Value;

    #[tokio::test]
    async fn test_list_users_returns_summaries() {
        let server = test_server();
        let first = register_user(&server, "tester").await;
        register_user(&server, "developer").await;

        let response = server
            .get("/api/auth/users")
            .authorization_bearer(&first.token)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        let users = body["data"].as_array().unwrap();
        assert!(users.iter().all(|u| u.get("passwordHash").is_none()
            && u.get("password_hash").is_none()));
        assert!(users.iter().any(|u| u["email"] == first.email.as_str()));
    }
}
