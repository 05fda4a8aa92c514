//! Account registration and login handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use haptic_models::User;

use crate::error::ApiResult;
use crate::state::AppState;

/// Signup/login request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Login response carrying the bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// POST /auth/signup
///
/// Register a new account.
///
/// Returns:
/// - 201: The created user (password hash withheld)
/// - 400: Malformed email or too-short password
/// - 409: Email already registered
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .identity
        .sign_up(&request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
///
/// Exchange credentials for a bearer token.
///
/// Returns:
/// - 200: Access token
/// - 401: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let access_token = state
        .identity
        .login(&request.email, &request.password)
        .await?;

    info!("login email={}", request.email);
    Ok(Json(TokenResponse { access_token }))
}
