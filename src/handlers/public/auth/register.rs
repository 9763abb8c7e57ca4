// handlers/public/auth/register.rs - POST /auth/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Message};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email input"))]
    pub email: String,
    #[validate(length(min = 1, message = "Invalid input. Check email or password"))]
    pub password: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

/// POST /auth/register - create a user with a salted password hash
///
/// 201 `{ message }` on success, 409 when the email (or username) is taken,
/// 400 on malformed input.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|errors| ApiError::bad_request(validation_message(&errors)))?;

    // Argon2 is deliberately expensive; keep it off the async workers.
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })??;

    state
        .users()
        .create(request.email.trim(), request.username.trim(), &password_hash)
        .await?;

    Ok(ApiResponse::created(Message::new("Successfully registered.")))
}

pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, username: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            username: username.to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request("jeffkungu@example.com", "jeffkungu", "jeff").validate().is_ok());
    }

    #[test]
    fn bad_email_is_reported() {
        let errors = request("not-an-email", "pw", "jeff").validate().unwrap_err();
        assert_eq!(validation_message(&errors), "Invalid email input");
    }

    #[test]
    fn empty_password_is_reported() {
        let errors = request("a@x.com", "", "jeff").validate().unwrap_err();
        assert_eq!(validation_message(&errors), "Invalid input. Check email or password");
    }
}
