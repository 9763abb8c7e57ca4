// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const LOGIN_FAILED: &str = "Sorry, login info you submitted might not be registered. Please try registering first.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub expires_in: i64,
}

/// POST /auth/login - exchange email + password for a bearer token
///
/// Unknown email and wrong password both answer 401 with the same message.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload?;

    let user = match state.users().find_by_email(request.email.trim()).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login attempt for unknown email");
            return Err(ApiError::unauthorized(LOGIN_FAILED));
        }
    };

    let password = request.password;
    let stored = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })??;

    if !matches {
        tracing::warn!("Wrong password for user {}", user.id);
        return Err(ApiError::unauthorized(LOGIN_FAILED));
    }

    let access_token = state.tokens.issue(user.id)?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        message: "Log-in successful.".to_string(),
        access_token,
        expires_in: state.tokens.ttl_secs(),
    }))
}
