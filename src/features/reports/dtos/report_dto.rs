use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{Report, ReportSeverity, ReportStatus};
use crate::features::users::dtos::UserRef;
use crate::shared::validation::{blank_as_none_uuid, not_blank};

/// Request DTO for filing a bug report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[validate(required(message = "Severity is required"))]
    pub severity: Option<ReportSeverity>,

    #[serde(default)]
    #[validate(email(message = "Reporter email is required"))]
    pub reporter_email: String,

    /// Defaults to `open`
    pub status: Option<ReportStatus>,

    /// Defaults to 0
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "crate::shared::validation::bounty_amount"))]
    #[schema(value_type = Option<f64>)]
    pub bounty_amount: Option<Decimal>,

    /// `""` is read as unassigned
    #[serde(default, deserialize_with = "blank_as_none_uuid")]
    pub assigned_user: Option<Uuid>,
}

/// Request DTO for a partial report update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "crate::shared::validation::bounty_amount"))]
    #[schema(value_type = Option<f64>)]
    pub bounty_amount: Option<Decimal>,

    /// `""` is read as unassigned
    #[serde(default, deserialize_with = "blank_as_none_uuid")]
    pub assigned_user: Option<Uuid>,
}

/// Response DTO for report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub severity: ReportSeverity,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub bounty_amount: Decimal,
    pub reporter_email: String,
    /// Bare id straight after creation, expanded summary everywhere else
    pub assigned_user: Option<UserRef>,
    pub created_time_stamp: DateTime<Utc>,
    pub closed_time_stamp: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ReportResponseDto {
    pub fn new(r: Report, assigned_user: Option<UserRef>) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            status: r.status,
            severity: r.severity,
            bounty_amount: r.bounty_amount,
            reporter_email: r.reporter_email,
            assigned_user,
            created_time_stamp: r.created_time_stamp,
            closed_time_stamp: r.closed_time_stamp,
            updated_at: r.updated_at,
        }
    }
}

impl From<Report> for ReportResponseDto {
    /// Unexpanded form: the assignee stays a bare id
    fn from(r: Report) -> Self {
        let assigned_user = r.assigned_user_id.map(UserRef::Id);
        Self::new(r, assigned_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::collect_messages;

    #[test]
    fn test_create_defaults_from_minimal_body() {
        let dto: CreateReportDto = serde_json::from_str(
            r#"{"title":"Login fails","description":"500 on submit","severity":"high","reporterEmail":"a@x.com"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.status, None);
        assert_eq!(dto.bounty_amount, None);
        assert_eq!(dto.assigned_user, None);
    }

    #[test]
    fn test_create_missing_fields_report_every_message() {
        let dto: CreateReportDto =
            serde_json::from_str(r#"{"title":"   ","reporterEmail":"bad"}"#).unwrap();
        let messages = collect_messages(&dto.validate().unwrap_err());
        assert_eq!(
            messages,
            vec![
                "Description is required",
                "Reporter email is required",
                "Severity is required",
                "Title is required",
            ]
        );
    }

    #[test]
    fn test_negative_bounty_rejected() {
        let dto: UpdateReportDto = serde_json::from_str(r#"{"bountyAmount":-5}"#).unwrap();
        let messages = collect_messages(&dto.validate().unwrap_err());
        assert_eq!(messages, vec!["Bounty amount must be 0 or more"]);
    }

    #[test]
    fn test_bounty_must_fit_currency_column() {
        let dto: CreateReportDto = serde_json::from_str(
            r#"{"title":"t","description":"d","severity":"low","reporterEmail":"a@x.com","bountyAmount":1e12}"#,
        )
        .unwrap();
        let messages = collect_messages(&dto.validate().unwrap_err());
        assert_eq!(messages, vec!["Bounty amount must be at most 9999999999.99"]);

        let dto: UpdateReportDto = serde_json::from_str(r#"{"bountyAmount":10.125}"#).unwrap();
        let messages = collect_messages(&dto.validate().unwrap_err());
        assert_eq!(messages, vec!["Bounty amount can have at most 2 decimal places"]);

        let dto: UpdateReportDto = serde_json::from_str(r#"{"bountyAmount":250.75}"#).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_empty_assignee_means_unassigned() {
        let dto: CreateReportDto = serde_json::from_str(
            r#"{"title":"t","description":"d","severity":"low","reporterEmail":"a@x.com","assignedUser":""}"#,
        )
        .unwrap();
        assert_eq!(dto.assigned_user, None);

        let dto: UpdateReportDto =
            serde_json::from_str(r#"{"status":"resolved","assignedUser":""}"#).unwrap();
        assert_eq!(dto.assigned_user, None);
        assert_eq!(dto.status, Some(ReportStatus::Resolved));
    }

    #[test]
    fn test_unknown_severity_fails_to_parse() {
        let parsed = serde_json::from_str::<CreateReportDto>(
            r#"{"title":"t","description":"d","severity":"urgent","reporterEmail":"a@x.com"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_response_shape() {
        let now = Utc::now();
        let assignee = Uuid::now_v7();
        let report = Report {
            id: Uuid::now_v7(),
            title: "Login fails".into(),
            description: "500".into(),
            status: ReportStatus::InProgress,
            severity: ReportSeverity::High,
            bounty_amount: Decimal::new(2550, 2),
            reporter_email: "a@x.com".into(),
            assigned_user_id: Some(assignee),
            created_time_stamp: now,
            closed_time_stamp: None,
            updated_at: now,
        };

        let value = serde_json::to_value(ReportResponseDto::from(report)).unwrap();
        assert_eq!(value["status"], "in-progress");
        assert_eq!(value["bountyAmount"], 25.5);
        assert_eq!(value["assignedUser"], assignee.to_string());
        assert!(value["closedTimeStamp"].is_null());
        assert!(value.get("createdTimeStamp").is_some());
    }
}
