use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::database::RepositoryError;
use crate::error::ApiError;
use crate::state::AppState;

/// The acting user, resolved from the bearer token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Guard for every protected route: resolves the bearer token to a user id
/// and injects it as `AuthUser`, or answers 401.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let user_id = state.tokens.decode(token).map_err(|e| {
        tracing::warn!("Rejected token for {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    // A token can outlive the account it was issued for.
    match state.users().get(user_id).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound(_)) => {
            tracing::warn!("Rejected token for deleted user {}", user_id);
            return Err(ApiError::unauthorized("User no longer exists. Please register again."));
        }
        Err(other) => return Err(other.into()),
    }

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// The header carries the raw token; a `Bearer ` prefix is tolerated.
fn extract_token_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Please provide an access token.")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format.")?
        .trim();

    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return Err("Please provide an access token.");
    }
    Ok(token)
}
