use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::TokenClaims;
use crate::features::users::models::User;
use crate::shared::constants::TOKEN_TYPE_BEARER;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Signs session tokens for authenticated users
pub struct TokenService {
    encoding_key: EncodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_secs: config.token_ttl.as_secs() as i64,
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now,
            exp: now + self.ttl_secs,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign token: {}", e);
                AppError::Internal(format!("Failed to sign token: {}", e))
            })?;

        tracing::debug!("Issued token for user {}", user.id);

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::JwtValidator;
    use crate::features::users::models::UserRole;
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn test_issued_token_validates() {
        let config = AuthConfig {
            jwt_secret: "a-test-secret-that-is-long-enough-123".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        };
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: "Rin".to_string(),
            email: "rin@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Manager,
            created_at: now,
            updated_at: now,
        };

        let issued = TokenService::new(&config).issue(&user).unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let validator = JwtValidator::new(&config.jwt_secret, config.jwt_leeway);
        let authed = validator.validate_token(&issued.access_token).unwrap();
        assert_eq!(authed.user_id, user.id);
        assert_eq!(authed.role, UserRole::Manager);
    }
}
