use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CommentStore, ReportStore, UserStore};
use crate::core::error::{AppError, Result};
use crate::features::comments::models::{Comment, NewComment};
use crate::features::reports::models::{NewReport, Report, ReportFilter};
use crate::features::users::models::{NewUser, User};
use crate::shared::constants::MSG_USER_EXISTS;

/// Postgres-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(MSG_USER_EXISTS.to_string())
            }
            other => {
                tracing::error!("Failed to create user: {:?}", other);
                AppError::Database(other)
            }
        })?;

        tracing::info!("Created user: {} ({})", created.id, created.role);
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by email: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get users by id: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[async_trait]
impl ReportStore for PgStore {
    async fn insert_report(&self, report: NewReport) -> Result<Report> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO bug_reports (
                id, title, description, status, severity, bounty_amount,
                reporter_email, assigned_user_id, created_time_stamp, closed_time_stamp, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $9)
            RETURNING
                id, title, description, status, severity, bounty_amount,
                reporter_email, assigned_user_id, created_time_stamp, closed_time_stamp, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&report.title)
        .bind(&report.description)
        .bind(report.status)
        .bind(report.severity)
        .bind(report.bounty_amount)
        .bind(&report.reporter_email)
        .bind(report.assigned_user_id)
        .bind(now)
        .bind(report.closed_time_stamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(created)
    }

    async fn find_report(&self, id: Uuid) -> Result<Option<Report>> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, title, description, status, severity, bounty_amount,
                reporter_email, assigned_user_id, created_time_stamp, closed_time_stamp, updated_at
            FROM bug_reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let statuses: Vec<String> = filter
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, title, description, status, severity, bounty_amount,
                reporter_email, assigned_user_id, created_time_stamp, closed_time_stamp, updated_at
            FROM bug_reports
            WHERE ($1::uuid IS NULL OR assigned_user_id = $1)
              AND (cardinality($2::text[]) = 0 OR status::text = ANY($2))
            ORDER BY created_time_stamp DESC, id DESC
            "#,
        )
        .bind(filter.assigned_to)
        .bind(statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update_report(&self, report: &Report) -> Result<Option<Report>> {
        sqlx::query_as::<_, Report>(
            r#"
            UPDATE bug_reports
            SET title = $2, description = $3, status = $4, severity = $5,
                bounty_amount = $6, assigned_user_id = $7, closed_time_stamp = $8,
                updated_at = $9
            WHERE id = $1
            RETURNING
                id, title, description, status, severity, bounty_amount,
                reporter_email, assigned_user_id, created_time_stamp, closed_time_stamp, updated_at
            "#,
        )
        .bind(report.id)
        .bind(&report.title)
        .bind(&report.description)
        .bind(report.status)
        .bind(report.severity)
        .bind(report.bounty_amount)
        .bind(report.assigned_user_id)
        .bind(report.closed_time_stamp)
        .bind(report.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn delete_report(&self, id: Uuid) -> Result<bool> {
        // comments go with the report via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM bug_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, bug_report_id, user_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, bug_report_id, user_id, text, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(comment.bug_report_id)
        .bind(comment.user_id)
        .bind(&comment.text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, bug_report_id, user_id, text, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get comment: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_comments_for_report(&self, report_id: Uuid) -> Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, bug_report_id, user_id, text, created_at
            FROM comments
            WHERE bug_report_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete comment: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
