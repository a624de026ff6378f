use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::password::{hash_password, verify_password};
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::dtos::UserProfileDto;
use crate::features::users::models::{NewUser, User};
use crate::modules::store::Store;
use crate::shared::constants::{MSG_INVALID_CREDENTIALS, MSG_USER_EXISTS, MSG_USER_NOT_FOUND};
use std::sync::Arc;

/// Service for authentication operations (register, login)
pub struct AuthService {
    store: Arc<dyn Store>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, token_service: Arc<TokenService>) -> Self {
        Self {
            store,
            token_service,
        }
    }

    /// Register a new user and sign them in
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(MSG_USER_EXISTS.to_string()));
        }

        let password_hash = hash_password(dto.password).await?;

        // the store still enforces uniqueness if a concurrent register wins the race
        let user = self
            .store
            .insert_user(NewUser {
                name: dto.name.trim().to_string(),
                email,
                password_hash,
                role: dto.role.unwrap_or_default(),
            })
            .await?;

        tracing::info!("User registered: {}", user.id);
        self.respond_with_token(user)
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(MSG_INVALID_CREDENTIALS.to_string()))?;

        let password_valid = verify_password(dto.password, user.password_hash.clone()).await?;
        if !password_valid {
            tracing::debug!("Rejected login for {}", user.id);
            return Err(AppError::Unauthorized(MSG_INVALID_CREDENTIALS.to_string()));
        }

        self.respond_with_token(user)
    }

    /// Profile of the token holder
    pub async fn get_current_user(&self, user: AuthenticatedUser) -> Result<UserProfileDto> {
        self.store
            .find_user(user.user_id)
            .await?
            .map(UserProfileDto::from)
            .ok_or_else(|| AppError::NotFound(MSG_USER_NOT_FOUND.to_string()))
    }

    fn respond_with_token(&self, user: User) -> Result<AuthResponseDto> {
        let token = self.token_service.issue(&user)?;
        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user: UserProfileDto::from(user),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
