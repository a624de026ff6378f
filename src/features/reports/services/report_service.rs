use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{CreateReportDto, ReportResponseDto, UpdateReportDto};
use crate::features::reports::models::{
    NewReport, Report, ReportChanges, ReportFilter, ReportStatus,
};
use crate::features::users::UserService;
use crate::modules::store::Store;
use crate::shared::constants::{MSG_ASSIGNED_USER_NOT_FOUND, MSG_REPORT_NOT_FOUND};
use crate::shared::types::DeletedDto;

/// Service for bug report operations
pub struct ReportService {
    store: Arc<dyn Store>,
    users: Arc<UserService>,
}

impl ReportService {
    pub fn new(store: Arc<dyn Store>, users: Arc<UserService>) -> Self {
        Self { store, users }
    }

    /// File a new report. The assignee is returned as a bare id.
    pub async fn create(&self, dto: CreateReportDto) -> Result<ReportResponseDto> {
        if let Some(assignee) = dto.assigned_user {
            self.ensure_assignee_exists(assignee).await?;
        }

        let status = dto.status.unwrap_or_default();
        let report = self
            .store
            .insert_report(NewReport {
                title: dto.title.trim().to_string(),
                description: dto.description,
                status,
                severity: dto.severity.unwrap_or_default(),
                bounty_amount: dto.bounty_amount.unwrap_or(Decimal::ZERO),
                reporter_email: dto.reporter_email.trim().to_string(),
                assigned_user_id: dto.assigned_user,
                closed_time_stamp: status.is_completed().then(Utc::now),
            })
            .await?;

        tracing::info!("Report created: {} ({})", report.id, report.status);
        Ok(ReportResponseDto::from(report))
    }

    pub async fn list_all(&self) -> Result<Vec<ReportResponseDto>> {
        self.list(ReportFilter::all()).await
    }

    /// Reports assigned to `user_id`, any status
    pub async fn list_assigned(&self, user_id: Uuid) -> Result<Vec<ReportResponseDto>> {
        self.list(ReportFilter::assigned_to(user_id)).await
    }

    /// Reports assigned to `user_id` that are open or in progress
    pub async fn list_assigned_open(&self, user_id: Uuid) -> Result<Vec<ReportResponseDto>> {
        self.list(ReportFilter::assigned_to(user_id).with_statuses(&ReportStatus::ACTIVE))
            .await
    }

    /// Reports assigned to `user_id` that are resolved or closed
    pub async fn list_assigned_closed(&self, user_id: Uuid) -> Result<Vec<ReportResponseDto>> {
        self.list(ReportFilter::assigned_to(user_id).with_statuses(&ReportStatus::COMPLETED))
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ReportResponseDto> {
        let report = self.find(id).await?;
        self.expand_one(report).await
    }

    /// Apply the fields present in `dto`. Empty strings count as absent.
    pub async fn update(&self, id: Uuid, dto: UpdateReportDto) -> Result<ReportResponseDto> {
        let mut report = self.find(id).await?;

        if let Some(assignee) = dto.assigned_user {
            self.ensure_assignee_exists(assignee).await?;
        }

        let changes = ReportChanges {
            title: dto
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            description: dto.description.filter(|d| !d.is_empty()),
            status: dto.status,
            severity: dto.severity,
            bounty_amount: dto.bounty_amount,
            assigned_user_id: dto.assigned_user,
        };
        report.apply(changes, Utc::now());

        // the row can vanish between the read and the write
        let updated = self
            .store
            .update_report(&report)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_REPORT_NOT_FOUND.to_string()))?;

        tracing::info!("Report updated: {} ({})", updated.id, updated.status);
        self.expand_one(updated).await
    }

    /// Remove a report together with its comments
    pub async fn delete(&self, id: Uuid) -> Result<DeletedDto> {
        if !self.store.delete_report(id).await? {
            return Err(AppError::NotFound(MSG_REPORT_NOT_FOUND.to_string()));
        }

        tracing::info!("Report deleted: {}", id);
        Ok(DeletedDto::new(id))
    }

    async fn find(&self, id: Uuid) -> Result<Report> {
        self.store
            .find_report(id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_REPORT_NOT_FOUND.to_string()))
    }

    async fn list(&self, filter: ReportFilter) -> Result<Vec<ReportResponseDto>> {
        let reports = self.store.list_reports(&filter).await?;
        self.expand_many(reports).await
    }

    async fn ensure_assignee_exists(&self, user_id: Uuid) -> Result<()> {
        if !self.users.exists(user_id).await? {
            return Err(AppError::validation(MSG_ASSIGNED_USER_NOT_FOUND));
        }
        Ok(())
    }

    async fn expand_one(&self, report: Report) -> Result<ReportResponseDto> {
        let mut expanded = self.expand_many(vec![report]).await?;
        expanded
            .pop()
            .ok_or_else(|| AppError::Internal("Report expansion returned nothing".to_string()))
    }

    /// Populate `assignedUser` with user summaries in a single lookup
    async fn expand_many(&self, reports: Vec<Report>) -> Result<Vec<ReportResponseDto>> {
        let ids: Vec<Uuid> = reports.iter().filter_map(|r| r.assigned_user_id).collect();
        let summaries = self.users.summaries(&ids).await?;

        Ok(reports
            .into_iter()
            .map(|r| {
                let assigned_user = r
                    .assigned_user_id
                    .map(|id| UserService::reference(id, &summaries));
                ReportResponseDto::new(r, assigned_user)
            })
            .collect())
    }
}
