use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::comments::services::CommentService;
use crate::shared::constants::{MSG_COMMENT_NOT_FOUND, MSG_COMMENT_REMOVED};
use crate::shared::types::{ApiResponse, DeletedDto};
use crate::shared::validation::parse_resource_id;

/// Comment on a report as the caller
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentDto,
    responses(
        (status = 200, description = "Comment created", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn create_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<Json<ApiResponse<CommentResponseDto>>> {
    dto.validate()?;

    let comment = service.create(user.user_id, dto).await?;
    Ok(Json(ApiResponse::success(Some(comment), None, None)))
}

/// List a report's comments, newest first
#[utoipa::path(
    get,
    path = "/api/comments/bug-report/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Comments on the report", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn list_report_comments(
    _user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    // a malformed report id simply has no comments
    let comments = match Uuid::parse_str(id.trim()) {
        Ok(report_id) => service.list_by_report(report_id).await?,
        Err(_) => Vec::new(),
    };
    Ok(Json(ApiResponse::list(comments)))
}

/// Delete one of the caller's own comments
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(
        ("id" = String, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment removed", body = ApiResponse<DeletedDto>),
        (status = 401, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn delete_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    let id = parse_resource_id(&id, MSG_COMMENT_NOT_FOUND)?;
    let deleted = service.delete(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some(MSG_COMMENT_REMOVED.to_string()),
        None,
    )))
}
