//! Persistence seam for users, reports and comments.
//!
//! Every mutation touches a single record. Reference expansion is not done here;
//! services join users onto reports/comments after the primary fetch.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::comments::models::{Comment, NewComment};
use crate::features::reports::models::{NewReport, Report, ReportFilter};
use crate::features::users::models::{NewUser, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Users whose id is in `ids`; unknown ids are skipped
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// All users ordered by name
    async fn list_users(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert_report(&self, report: NewReport) -> Result<Report>;

    async fn find_report(&self, id: Uuid) -> Result<Option<Report>>;

    /// Matching reports, newest first
    async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>>;

    /// Persist the mutable fields of `report`. `None` if it no longer exists.
    async fn update_report(&self, report: &Report) -> Result<Option<Report>>;

    /// Removes the report and its comments. `false` if it did not exist.
    async fn delete_report(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>>;

    /// Comments on a report, newest first
    async fn list_comments_for_report(&self, report_id: Uuid) -> Result<Vec<Comment>>;

    async fn delete_comment(&self, id: Uuid) -> Result<bool>;
}

/// Full persistence surface used by the services
pub trait Store: UserStore + ReportStore + CommentStore {}

impl<T> Store for T where T: UserStore + ReportStore + CommentStore {}
