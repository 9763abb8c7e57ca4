// handlers/protected/auth/user.rs - DELETE /auth/user handler

use axum::extract::{Extension, State};

use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

/// DELETE /auth/user - remove the caller's account with all bucketlists and items
///
/// Tokens already issued for the account stop working on their next use.
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Message> {
    state.users().delete(auth_user.user_id).await?;
    Ok(ApiResponse::success(Message::new("Account deleted.")))
}
