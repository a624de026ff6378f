use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CommentStore, ReportStore, UserStore};
use crate::core::error::{AppError, Result};
use crate::features::comments::models::{Comment, NewComment};
use crate::features::reports::models::{NewReport, Report, ReportFilter};
use crate::features::users::models::{NewUser, User};
use crate::shared::constants::MSG_USER_EXISTS;

/// Process-local store with the same ordering and cascade rules as the
/// Postgres schema. Lock order is users, reports, comments.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    reports: RwLock<HashMap<Uuid, Report>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(MSG_USER_EXISTS.to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::now_v7(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());

        tracing::info!("Created user: {} ({})", created.id, created.role);
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(users)
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn insert_report(&self, report: NewReport) -> Result<Report> {
        let now = Utc::now();
        let created = Report {
            id: Uuid::now_v7(),
            title: report.title,
            description: report.description,
            status: report.status,
            severity: report.severity,
            bounty_amount: report.bounty_amount,
            reporter_email: report.reporter_email,
            assigned_user_id: report.assigned_user_id,
            created_time_stamp: now,
            closed_time_stamp: report.closed_time_stamp,
            updated_at: now,
        };
        self.reports
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_report(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.reports.read().await.get(&id).cloned())
    }

    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        reports.sort_by(|a, b| {
            b.created_time_stamp
                .cmp(&a.created_time_stamp)
                .then(b.id.cmp(&a.id))
        });
        Ok(reports)
    }

    async fn update_report(&self, report: &Report) -> Result<Option<Report>> {
        let mut reports = self.reports.write().await;
        match reports.get_mut(&report.id) {
            Some(stored) => {
                // reporter email and creation time are never rewritten
                stored.title = report.title.clone();
                stored.description = report.description.clone();
                stored.status = report.status;
                stored.severity = report.severity;
                stored.bounty_amount = report.bounty_amount;
                stored.assigned_user_id = report.assigned_user_id;
                stored.closed_time_stamp = report.closed_time_stamp;
                stored.updated_at = report.updated_at;
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_report(&self, id: Uuid) -> Result<bool> {
        let mut reports = self.reports.write().await;
        if reports.remove(&id).is_none() {
            return Ok(false);
        }
        self.comments
            .write()
            .await
            .retain(|_, c| c.bug_report_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let created = Comment {
            id: Uuid::now_v7(),
            bug_report_id: comment.bug_report_id,
            user_id: comment.user_id,
            text: comment.text,
            created_at: Utc::now(),
        };
        self.comments
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn list_comments_for_report(&self, report_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.bug_report_id == report_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        Ok(self.comments.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{ReportSeverity, ReportStatus};
    use crate::features::users::models::UserRole;
    use rust_decimal::Decimal;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Dana".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Tester,
        }
    }

    fn new_report(title: &str, assignee: Option<Uuid>, status: ReportStatus) -> NewReport {
        NewReport {
            title: title.to_string(),
            description: "details".to_string(),
            status,
            severity: ReportSeverity::Low,
            bounty_amount: Decimal::ZERO,
            reporter_email: "qa@example.com".to_string(),
            assigned_user_id: assignee,
            closed_time_stamp: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.insert_user(new_user("dana@example.com")).await.unwrap();

        let err = store
            .insert_user(new_user("dana@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_reports_newest_first_and_filtered() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("dana@example.com")).await.unwrap();

        let first = store
            .insert_report(new_report("first", Some(user.id), ReportStatus::Open))
            .await
            .unwrap();
        let second = store
            .insert_report(new_report("second", None, ReportStatus::Open))
            .await
            .unwrap();
        let third = store
            .insert_report(new_report("third", Some(user.id), ReportStatus::Closed))
            .await
            .unwrap();

        let all = store.list_reports(&ReportFilter::all()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let open = store
            .list_reports(
                &ReportFilter::assigned_to(user.id).with_statuses(&ReportStatus::ACTIVE),
            )
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, first.id);
    }

    #[tokio::test]
    async fn test_delete_report_cascades_comments() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("dana@example.com")).await.unwrap();
        let report = store
            .insert_report(new_report("r", None, ReportStatus::Open))
            .await
            .unwrap();
        store
            .insert_comment(NewComment {
                bug_report_id: report.id,
                user_id: user.id,
                text: "seen it".to_string(),
            })
            .await
            .unwrap();

        assert!(store.delete_report(report.id).await.unwrap());
        assert!(store
            .list_comments_for_report(report.id)
            .await
            .unwrap()
            .is_empty());
        assert!(!store.delete_report(report.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_report_returns_none() {
        let store = MemoryStore::new();
        let report = store
            .insert_report(new_report("r", None, ReportStatus::Open))
            .await
            .unwrap();
        store.delete_report(report.id).await.unwrap();

        assert!(store.update_report(&report).await.unwrap().is_none());
    }
}
