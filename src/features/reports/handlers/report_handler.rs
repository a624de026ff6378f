use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppJsonRejection};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{CreateReportDto, ReportResponseDto, UpdateReportDto};
use crate::features::reports::services::ReportService;
use crate::shared::constants::{MSG_REPORT_NOT_FOUND, MSG_REPORT_REMOVED};
use crate::shared::types::{ApiResponse, DeletedDto};
use crate::shared::validation::parse_resource_id;

/// File a bug report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 200, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// List every report, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "All reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_all().await?;
    Ok(Json(ApiResponse::list(reports)))
}

/// List reports assigned to the caller
#[utoipa::path(
    get,
    path = "/api/reports/assigned",
    responses(
        (status = 200, description = "Reports assigned to the caller", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_assigned_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_assigned(user.user_id).await?;
    Ok(Json(ApiResponse::list(reports)))
}

/// List open and in-progress reports assigned to the caller
#[utoipa::path(
    get,
    path = "/api/reports/assigned/open",
    responses(
        (status = 200, description = "Open reports assigned to the caller", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_assigned_open_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_assigned_open(user.user_id).await?;
    Ok(Json(ApiResponse::list(reports)))
}

/// List resolved and closed reports assigned to the caller
#[utoipa::path(
    get,
    path = "/api/reports/assigned/closed",
    responses(
        (status = 200, description = "Closed reports assigned to the caller", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_assigned_closed_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_assigned_closed(user.user_id).await?;
    Ok(Json(ApiResponse::list(reports)))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let id = parse_resource_id(&id, MSG_REPORT_NOT_FOUND)?;
    let report = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Update the fields present in the body
#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
    body: std::result::Result<AppJson<UpdateReportDto>, AppJsonRejection>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    // An unresolvable id wins over a bad body
    let id = parse_resource_id(&id, MSG_REPORT_NOT_FOUND)?;
    let AppJson(dto) = body?;
    dto.validate()?;

    let report = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete a report and its comments
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report removed", body = ApiResponse<DeletedDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    _user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    let id = parse_resource_id(&id, MSG_REPORT_NOT_FOUND)?;
    let deleted = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some(MSG_REPORT_REMOVED.to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::{create_report, register_user, report_body, test_server};
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use serde_json::{json, Value};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_report_defaults() {
        let server = test_server();
        let user = register_user(&server, "tester").await;

        let report = create_report(&server, &user, report_body("Login fails")).await;

        assert_eq!(report["title"], "Login fails");
        assert_eq!(report["status"], "open");
        assert_eq!(report["bountyAmount"], 0.0);
        assert!(report["assignedUser"].is_null());
        assert!(report["closedTimeStamp"].is_null());
    }

    #[tokio::test]
    async fn test_create_report_validation() {
        let server = test_server();
        let user = register_user(&server, "tester").await;

        let response = server
            .post("/api/reports")
            .authorization_bearer(&user.token)
            .json(&json!({ "title": "Only a title" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Description is required");
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reports_require_token() {
        let server = test_server();
        server
            .get("/api/reports")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/api/reports")
            .authorization_bearer("garbage")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_custom_token_header_accepted() {
        let server = test_server();
        let user = register_user(&server, "developer").await;

        server
            .get("/api/reports")
            .add_header(
                HeaderName::from_static("x-auth-token"),
                HeaderValue::from_str(&user.token).unwrap(),
            )
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids_are_identical() {
        let server = test_server();
        let user = register_user(&server, "tester").await;

        for id in [Uuid::now_v7().to_string(), "not-an-id".to_string()] {
            let path = format!("/api/reports/{}", id);

            let get = server.get(&path).authorization_bearer(&user.token).await;
            get.assert_status_not_found();
            assert_eq!(get.json::<Value>()["message"], "Bug report not found");

            let put = server
                .put(&path)
                .authorization_bearer(&user.token)
                .json(&json!({ "status": "closed" }))
                .await;
            put.assert_status_not_found();
            assert_eq!(put.json::<Value>()["message"], "Bug report not found");

            let delete = server.delete(&path).authorization_bearer(&user.token).await;
            delete.assert_status_not_found();
            assert_eq!(delete.json::<Value>()["message"], "Bug report not found");
        }
    }

    #[tokio::test]
    async fn test_malformed_id_beats_unparseable_body() {
        let server = test_server();
        let user = register_user(&server, "tester").await;
        let report = create_report(&server, &user, report_body("Broken footer")).await;

        let response = server
            .put("/api/reports/not-an-id")
            .authorization_bearer(&user.token)
            .text("{not json")
            .content_type("application/json")
            .await;
        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["message"], "Bug report not found");

        let response = server
            .put(&format!("/api/reports/{}", report["id"].as_str().unwrap()))
            .authorization_bearer(&user.token)
            .text("{not json")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_assignee_string_is_unassigned() {
        let server = test_server();
        let user = register_user(&server, "developer").await;

        let mut body = report_body("Sidebar overlaps");
        body["assignedUser"] = json!("");
        let report = create_report(&server, &user, body).await;
        assert!(report["assignedUser"].is_null());

        let mut body = report_body("Assigned then edited");
        body["assignedUser"] = json!(user.id);
        let assigned = create_report(&server, &user, body).await;

        let response = server
            .put(&format!("/api/reports/{}", assigned["id"].as_str().unwrap()))
            .authorization_bearer(&user.token)
            .json(&json!({ "status": "resolved", "assignedUser": "" }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["data"]["status"], "resolved");
        assert_eq!(updated["data"]["assignedUser"]["id"], user.id.to_string());
    }

    #[tokio::test]
    async fn test_oversized_bounty_is_a_validation_error() {
        let server = test_server();
        let user = register_user(&server, "manager").await;

        let mut body = report_body("Payment rounding");
        body["bountyAmount"] = json!(1e12);
        let response = server
            .post("/api/reports")
            .authorization_bearer(&user.token)
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Bounty amount must be at most 9999999999.99"
        );
    }

    #[tokio::test]
    async fn test_resolve_moves_report_between_assigned_views() {
        let server = test_server();
        let user = register_user(&server, "developer").await;

        let mut body = report_body("Login fails");
        body["assignedUser"] = json!(user.id);
        let report = create_report(&server, &user, body).await;
        let id = report["id"].as_str().unwrap().to_string();
        assert_eq!(report["assignedUser"], user.id.to_string());

        let open: Value = server
            .get("/api/reports/assigned/open")
            .authorization_bearer(&user.token)
            .await
            .json();
        assert_eq!(open["meta"]["total"], 1);
        assert_eq!(open["data"][0]["assignedUser"]["email"], user.email.as_str());

        let resolved: Value = server
            .put(&format!("/api/reports/{}", id))
            .authorization_bearer(&user.token)
            .json(&json!({ "status": "resolved" }))
            .await
            .json();
        let stamp = resolved["data"]["closedTimeStamp"].clone();
        assert!(!stamp.is_null());

        let open: Value = server
            .get("/api/reports/assigned/open")
            .authorization_bearer(&user.token)
            .await
            .json();
        assert_eq!(open["meta"]["total"], 0);

        let closed: Value = server
            .get("/api/reports/assigned/closed")
            .authorization_bearer(&user.token)
            .await
            .json();
        assert_eq!(closed["data"][0]["id"], id.as_str());

        let reopened: Value = server
            .put(&format!("/api/reports/{}", id))
            .authorization_bearer(&user.token)
            .json(&json!({ "status": "open" }))
            .await
            .json();
        assert_eq!(reopened["data"]["status"], "open");
        assert_eq!(reopened["data"]["closedTimeStamp"], stamp);
    }

    #[tokio::test]
    async fn test_update_with_unknown_assignee() {
        let server = test_server();
        let user = register_user(&server, "manager").await;
        let report = create_report(&server, &user, report_body("Flaky test")).await;

        let response = server
            .put(&format!("/api/reports/{}", report["id"].as_str().unwrap()))
            .authorization_bearer(&user.token)
            .json(&json!({ "assignedUser": Uuid::now_v7() }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Assigned user not found");
    }

    #[tokio::test]
    async fn test_delete_report_returns_marker() {
        let server = test_server();
        let user = register_user(&server, "admin").await;
        let report = create_report(&server, &user, report_body("Typo on landing page")).await;
        let path = format!("/api/reports/{}", report["id"].as_str().unwrap());

        let response = server.delete(&path).authorization_bearer(&user.token).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Bug report removed");
        assert_eq!(body["data"]["deleted"], true);
        assert_eq!(body["data"]["id"], report["id"]);

        server
            .get(&path)
            .authorization_bearer(&user.token)
            .await
            .assert_status_not_found();
    }
}
