use super::model::{AuthenticatedUser, TokenClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use std::time::Duration;
use uuid::Uuid;

/// Verifies HS256 session tokens signed with the server secret
pub struct JwtValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        // Validate algorithm from header
        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Subject is not a user id".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "a-test-secret-that-is-long-enough-123";

    fn sign(claims: &TokenClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(sub: String, exp_offset: i64) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            sub,
            role: UserRole::Tester,
            iat: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn test_valid_token() {
        let id = Uuid::now_v7();
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let user = validator
            .validate_token(&sign(&claims(id.to_string(), 600), SECRET))
            .unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, UserRole::Tester);
    }

    #[test]
    fn test_expired_token_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let token = sign(&claims(Uuid::now_v7().to_string(), -600), SECRET);
        assert!(matches!(
            validator.validate_token(&token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let token = sign(
            &claims(Uuid::now_v7().to_string(), 600),
            "another-secret-that-is-long-enough-456",
        );
        assert!(matches!(
            validator.validate_token(&token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let token = sign(&claims("admin".to_string(), 600), SECRET);
        assert!(matches!(
            validator.validate_token(&token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        assert!(validator.validate_token("not.a.jwt").is_err());
    }
}
