// handlers/protected/auth/whoami.rs - GET /auth/whoami handler

use axum::extract::{Extension, State};
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// GET /auth/whoami - the account behind the presented token
pub async fn whoami_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<WhoAmI> {
    let user = state.users().get(auth_user.user_id).await?;

    Ok(ApiResponse::success(WhoAmI {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}
