//! Account creation, login, and credential verification.

use std::sync::Arc;

use haptic_models::{Identity, User};
use haptic_store::UserStore;
use tracing::info;

use crate::auth::{password, token};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Minimum accepted password length at sign-up.
const MIN_PASSWORD_LEN: usize = 8;

/// Issues and verifies end-user credentials.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    config: ApiConfig,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserStore>, config: ApiConfig) -> Self {
        Self { users, config }
    }

    /// Register a new account. The raw password is hashed and discarded;
    /// a duplicate email surfaces as a conflict.
    pub async fn sign_up(&self, email: &str, raw_password: &str) -> ApiResult<User> {
        validate_email(email)?;
        if raw_password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = password::hash_password(raw_password)
            .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))?;

        let user = self.users.create_user(email, &password_hash).await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Exchange credentials for a signed access token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, raw_password: &str) -> ApiResult<String> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

        let matches = password::verify_password(raw_password, &user.password_hash)
            .map_err(|e| ApiError::internal(format!("password verification failed: {e}")))?;
        if !matches {
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        token::generate_token(user.id, &user.email, &self.config)
            .map_err(|e| ApiError::internal(format!("token generation failed: {e}")))
    }

    /// Verify a bearer token and return the caller's identity.
    ///
    /// Fails when the signature is invalid, the token is expired, or the
    /// subject no longer exists.
    pub async fn verify_user_token(&self, bearer: &str) -> ApiResult<Identity> {
        let claims = token::validate_token(bearer, &self.config)
            .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {e}")))?;

        let user = self
            .users
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

        Ok(Identity {
            user_id: user.id,
            email: user.email,
        })
    }

}

fn validate_email(email: &str) -> ApiResult<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation("email is not valid"));
    }
    Ok(())
}
