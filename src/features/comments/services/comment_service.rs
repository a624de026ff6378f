use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::comments::models::{Comment, NewComment};
use crate::features::users::UserService;
use crate::modules::store::Store;
use crate::shared::constants::{
    MSG_COMMENT_NOT_FOUND, MSG_REPORT_NOT_FOUND, MSG_USER_NOT_AUTHORIZED,
};
use crate::shared::types::DeletedDto;
use crate::shared::validation::parse_resource_id;

/// Service for report discussion threads
pub struct CommentService {
    store: Arc<dyn Store>,
    users: Arc<UserService>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>, users: Arc<UserService>) -> Self {
        Self { store, users }
    }

    /// Comment on a report as `author_id`
    pub async fn create(&self, author_id: Uuid, dto: CreateCommentDto) -> Result<CommentResponseDto> {
        let report_id = parse_resource_id(&dto.bug_report, MSG_REPORT_NOT_FOUND)?;
        if self.store.find_report(report_id).await?.is_none() {
            return Err(AppError::NotFound(MSG_REPORT_NOT_FOUND.to_string()));
        }

        let comment = self
            .store
            .insert_comment(NewComment {
                bug_report_id: report_id,
                user_id: author_id,
                text: dto.text,
            })
            .await?;

        tracing::info!("Comment {} added to report {}", comment.id, report_id);

        let mut expanded = self.expand(vec![comment]).await?;
        expanded
            .pop()
            .ok_or_else(|| AppError::Internal("Comment expansion returned nothing".to_string()))
    }

    /// Comments on a report, newest first
    pub async fn list_by_report(&self, report_id: Uuid) -> Result<Vec<CommentResponseDto>> {
        let comments = self.store.list_comments_for_report(report_id).await?;
        self.expand(comments).await
    }

    /// Remove a comment; only its author may do so
    pub async fn delete(&self, caller_id: Uuid, id: Uuid) -> Result<DeletedDto> {
        let comment = self
            .store
            .find_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_COMMENT_NOT_FOUND.to_string()))?;

        if !comment.is_authored_by(caller_id) {
            tracing::warn!("User {} tried to delete comment {} of another author", caller_id, id);
            return Err(AppError::Unauthorized(MSG_USER_NOT_AUTHORIZED.to_string()));
        }

        if !self.store.delete_comment(id).await? {
            return Err(AppError::NotFound(MSG_COMMENT_NOT_FOUND.to_string()));
        }

        tracing::info!("Comment deleted: {}", id);
        Ok(DeletedDto::new(id))
    }

    async fn expand(&self, comments: Vec<Comment>) -> Result<Vec<CommentResponseDto>> {
        let ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        let summaries = self.users.summaries(&ids).await?;

        Ok(comments
            .into_iter()
            .map(|c| {
                let user = UserService::reference(c.user_id, &summaries);
                CommentResponseDto::new(c, user)
            })
            .collect())
    }
}
