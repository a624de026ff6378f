use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Workflow state of a bug report
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "report_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ReportStatus {
    /// Statuses shown in the "assigned open" view
    pub const ACTIVE: [ReportStatus; 2] = [ReportStatus::Open, ReportStatus::InProgress];

    /// Statuses shown in the "assigned closed" view
    pub const COMPLETED: [ReportStatus; 2] = [ReportStatus::Resolved, ReportStatus::Closed];

    /// Resolved and closed reports carry a closed timestamp
    pub fn is_completed(self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Closed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Open => "open",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report severity enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "report_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportSeverity::Low => write!(f, "low"),
            ReportSeverity::Medium => write!(f, "medium"),
            ReportSeverity::High => write!(f, "high"),
            ReportSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Database model for bug report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub severity: ReportSeverity,
    pub bounty_amount: Decimal,
    pub reporter_email: String,
    pub assigned_user_id: Option<Uuid>,
    pub created_time_stamp: DateTime<Utc>,
    pub closed_time_stamp: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub severity: ReportSeverity,
    pub bounty_amount: Decimal,
    pub reporter_email: String,
    pub assigned_user_id: Option<Uuid>,
    pub closed_time_stamp: Option<DateTime<Utc>>,
}

/// Partial update already normalised by the service: `None` means untouched
#[derive(Debug, Clone, Default)]
pub struct ReportChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
    pub bounty_amount: Option<Decimal>,
    pub assigned_user_id: Option<Uuid>,
}

impl Report {
    /// Apply a partial update at `now`.
    ///
    /// Setting a completed status stamps `closed_time_stamp` every time; any other
    /// status leaves an earlier stamp in place.
    pub fn apply(&mut self, changes: ReportChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(status) = changes.status {
            self.status = status;
            if status.is_completed() {
                self.closed_time_stamp = Some(now);
            }
        }
        if let Some(severity) = changes.severity {
            self.severity = severity;
        }
        if let Some(bounty_amount) = changes.bounty_amount {
            self.bounty_amount = bounty_amount;
        }
        if let Some(assigned_user_id) = changes.assigned_user_id {
            self.assigned_user_id = Some(assigned_user_id);
        }
        self.updated_at = now;
    }
}

/// Query filter for report lists
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub assigned_to: Option<Uuid>,
    /// Empty means any status
    pub statuses: Vec<ReportStatus>,
}

impl ReportFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn assigned_to(user_id: Uuid) -> Self {
        Self {
            assigned_to: Some(user_id),
            statuses: Vec::new(),
        }
    }

    pub fn with_statuses(mut self, statuses: &[ReportStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    pub fn matches(&self, report: &Report) -> bool {
        let assignee_ok = match self.assigned_to {
            Some(user_id) => report.assigned_user_id == Some(user_id),
            None => true,
        };
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&report.status);
        assignee_ok && status_ok
    }
}
