use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::dangerous::insecure_decode;
use serde::Deserialize;

use crate::features::auth::dtos::AuthResponseDto;
use crate::features::users::dtos::UserProfileDto;

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Read the `exp` claim without verifying the signature. The server still
/// verifies every request; this only lets the client drop dead tokens early.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let claim = insecure_decode::<ExpiryClaim>(token).ok()?.claims;
    Utc.timestamp_opt(claim.exp, 0).single()
}

/// Who the client is signed in as
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<UserProfileDto>,
}

impl Session {
    /// Rebuild a session from a persisted token. Expired or unreadable tokens
    /// are discarded and yield a signed-out session.
    pub fn restore(token: Option<String>) -> Self {
        Self::restore_at(token, Utc::now())
    }

    fn restore_at(token: Option<String>, now: DateTime<Utc>) -> Self {
        let token = token.filter(|t| matches!(token_expiry(t), Some(exp) if exp > now));
        if token.is_none() {
            tracing::debug!("No usable session token to restore");
        }
        Self { token, user: None }
    }

    /// Start a session from a register/login answer
    pub fn begin(&mut self, auth: AuthResponseDto) {
        self.token = Some(auth.access_token);
        self.user = Some(auth.user);
    }

    /// Sign out
    pub fn end(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfileDto> {
        self.user.as_ref()
    }

    /// Cache the profile fetched after a restore
    pub fn set_user(&mut self, user: UserProfileDto) {
        self.user = Some(user);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .as_deref()
            .and_then(token_expiry)
            .is_some_and(|exp| exp > Utc::now())
    }
}
