use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::comments::models::Comment;
use crate::features::users::dtos::UserRef;
use crate::shared::validation::not_blank;

/// Request DTO for commenting on a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentDto {
    /// Id of the report being discussed
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Bug report is required"))]
    pub bug_report: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Text is required"))]
    pub text: String,
}

/// Response DTO for comment, author expanded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub bug_report: Uuid,
    pub user: UserRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentResponseDto {
    pub fn new(c: Comment, user: UserRef) -> Self {
        Self {
            id: c.id,
            bug_report: c.bug_report_id,
            user,
            text: c.text,
            created_at: c.created_at,
        }
    }
}
