use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::cache::{ReportListCache, ReportView};
use super::error::{ClientError, Result};
use super::session::Session;
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::reports::dtos::{CreateReportDto, ReportResponseDto, UpdateReportDto};
use crate::features::users::dtos::{UserProfileDto, UserSummaryDto};
use crate::shared::types::{ApiResponse, DeletedDto};

/// Typed HTTP client for the bug tracker API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Use the session's token for protected calls
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = session.token().map(str::to_string);
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub async fn register(&self, dto: &RegisterRequestDto) -> Result<AuthResponseDto> {
        let request = self.request(Method::POST, "/api/auth/register").json(dto);
        self.send(request).await
    }

    pub async fn login(&self, dto: &LoginRequestDto) -> Result<AuthResponseDto> {
        let request = self.request(Method::POST, "/api/auth/login").json(dto);
        self.send(request).await
    }

    pub async fn current_user(&self) -> Result<UserProfileDto> {
        self.get("/api/auth/user").await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummaryDto>> {
        self.get("/api/auth/users").await
    }

    pub async fn create_report(&self, dto: &CreateReportDto) -> Result<ReportResponseDto> {
        self.with_body(Method::POST, "/api/reports", dto).await
    }

    pub async fn list_reports(&self, view: ReportView) -> Result<Vec<ReportResponseDto>> {
        let path = match view {
            ReportView::All => "/api/reports",
            ReportView::Assigned => "/api/reports/assigned",
            ReportView::AssignedOpen => "/api/reports/assigned/open",
            ReportView::AssignedClosed => "/api/reports/assigned/closed",
        };
        self.get(path).await
    }

    pub async fn get_report(&self, id: Uuid) -> Result<ReportResponseDto> {
        self.get(&format!("/api/reports/{}", id)).await
    }

    pub async fn update_report(&self, id: Uuid, dto: &UpdateReportDto) -> Result<ReportResponseDto> {
        self.with_body(Method::PUT, &format!("/api/reports/{}", id), dto)
            .await
    }

    pub async fn delete_report(&self, id: Uuid) -> Result<DeletedDto> {
        let request = self.authed(Method::DELETE, &format!("/api/reports/{}", id))?;
        self.send(request).await
    }

    pub async fn create_comment(&self, dto: &CreateCommentDto) -> Result<CommentResponseDto> {
        self.with_body(Method::POST, "/api/comments", dto).await
    }

    pub async fn list_comments(&self, report_id: Uuid) -> Result<Vec<CommentResponseDto>> {
        self.get(&format!("/api/comments/bug-report/{}", report_id))
            .await
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<DeletedDto> {
        let request = self.authed(Method::DELETE, &format!("/api/comments/{}", id))?;
        self.send(request).await
    }

    /// Fetch the four dashboard lists concurrently. Each successful list
    /// replaces its view; failures are returned per view and leave that view
    /// as it was.
    pub async fn load_dashboard(
        &self,
        cache: &mut ReportListCache,
    ) -> Vec<(ReportView, ClientError)> {
        let (all, assigned, open, closed) = futures::join!(
            self.list_reports(ReportView::All),
            self.list_reports(ReportView::Assigned),
            self.list_reports(ReportView::AssignedOpen),
            self.list_reports(ReportView::AssignedClosed),
        );

        let mut failures = Vec::new();
        for (view, result) in [
            (ReportView::All, all),
            (ReportView::Assigned, assigned),
            (ReportView::AssignedOpen, open),
            (ReportView::AssignedClosed, closed),
        ] {
            match result {
                Ok(reports) => cache.replace_all(view, reports),
                Err(e) => {
                    tracing::warn!("Failed to load {:?} reports: {}", view, e);
                    failures.push((view, e));
                }
            }
        }
        failures
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.authed(Method::GET, path)?;
        self.send(request).await
    }

    async fn with_body<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authed(method, path)?.json(body);
        self.send(request).await
    }

    /// Send and unwrap the response envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&bytes)
                .ok()
                .and_then(|envelope| {
                    envelope
                        .errors
                        .and_then(|errors| errors.into_iter().next())
                        .or(envelope.message)
                })
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            tracing::debug!("API error {}: {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<T> =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| ClientError::Decode("Response carried no data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{api_router, AppServices};
    use crate::features::reports::models::{ReportSeverity, ReportStatus};
    use crate::features::users::dtos::UserRef;
    use crate::features::users::models::UserRole;
    use crate::modules::store::MemoryStore;
    use crate::shared::test_helpers::test_auth_config;
    use std::sync::Arc;

    async fn spawn_api() -> String {
        let services = AppServices::new(Arc::new(MemoryStore::new()), &test_auth_config());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, api_router(&services)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn register_dto(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            name: "Quinn".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            role: Some(UserRole::Developer),
        }
    }

    #[tokio::test]
    async fn test_protected_call_without_session() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.list_users().await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_dashboard_round_trip() {
        let base_url = spawn_api().await;
        let mut client = ApiClient::new(base_url);

        let auth = client.register(&register_dto("quinn@example.com")).await.unwrap();
        let me = auth.user.id;
        let mut session = Session::default();
        session.begin(auth);
        client = client.with_session(&session);

        let created = client
            .create_report(&CreateReportDto {
                title: "Login fails".to_string(),
                description: "500 on submit".to_string(),
                severity: Some(ReportSeverity::High),
                reporter_email: "a@x.com".to_string(),
                status: None,
                bounty_amount: None,
                assigned_user: Some(me),
            })
            .await
            .unwrap();
        assert_eq!(created.assigned_user, Some(UserRef::Id(me)));

        let mut cache = ReportListCache::new();
        let failures = client.load_dashboard(&mut cache).await;
        assert!(failures.is_empty());
        assert_eq!(cache.view(ReportView::All).len(), 1);
        assert_eq!(cache.view(ReportView::AssignedOpen).len(), 1);
        assert!(cache.view(ReportView::AssignedClosed).is_empty());

        let resolved = client
            .update_report(
                created.id,
                &UpdateReportDto {
                    status: Some(ReportStatus::Resolved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(resolved.closed_time_stamp.is_some());
        assert!(matches!(resolved.assigned_user, Some(UserRef::Expanded(_))));

        cache.apply_updated(resolved);
        assert!(cache.view(ReportView::AssignedOpen).is_empty());
        assert_eq!(cache.view(ReportView::AssignedClosed)[0].id, created.id);
    }

    #[tokio::test]
    async fn test_api_errors_surface_first_message() {
        let base_url = spawn_api().await;
        let mut client = ApiClient::new(base_url);
        let auth = client.register(&register_dto("rae@example.com")).await.unwrap();
        client.set_token(Some(auth.access_token));

        let err = client.get_report(Uuid::now_v7()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Bug report not found");

        let err = client
            .create_comment(&CreateCommentDto {
                bug_report: String::new(),
                text: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Bug report is required");

        let err = client
            .register(&register_dto("rae@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
    }
}
