//! Request extractors for the two caller kinds.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use haptic_models::Identity;

use crate::error::ApiError;
use crate::middleware::API_KEY_HEADER;
use crate::state::AppState;

/// Authenticated end user, extracted from a `Bearer` token.
///
/// Satisfied only by a valid, unexpired user token whose subject still
/// exists. The worker's shared secret never satisfies it.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))?;

        let identity = state.identity.verify_user_token(token).await?;
        Ok(AuthUser(identity))
    }
}

/// Trusted internal caller, extracted from the `x-api-key` header.
///
/// Satisfied only by the configured service secret; it carries no user
/// identity and a bearer token never satisfies it.
#[derive(Debug, Clone, Copy)]
pub struct ServiceCaller;

#[axum::async_trait]
impl FromRequestParts<AppState> for ServiceCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The secret is required config, but an empty comparison value must
        // never authenticate anyone.
        if state.config.service_api_key.is_empty() {
            return Err(ApiError::internal("Service API key is not configured"));
        }

        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing API key"))?;

        if provided != state.config.service_api_key {
            return Err(ApiError::unauthorized("Invalid API key"));
        }

        Ok(ServiceCaller)
    }
}
