use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    Json,
};

use crate::database::models::BucketlistWithItems;
use crate::handlers::NameRequest;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

/// GET /bucketlists/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<BucketlistWithItems> {
    let Path(id) = id?;
    let bucketlist = state.bucketlists().get(auth_user.user_id, id).await?;
    Ok(ApiResponse::success(bucketlist))
}

/// PUT /bucketlists/:id - rename
pub async fn put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult<BucketlistWithItems> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let bucketlist = state.bucketlists().update(auth_user.user_id, id, &body.name).await?;
    Ok(ApiResponse::success(bucketlist))
}

/// DELETE /bucketlists/:id - removes the bucketlist and its items
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Message> {
    let Path(id) = id?;
    state.bucketlists().delete(auth_user.user_id, id).await?;
    Ok(ApiResponse::success(Message::new(format!("bucketlist {} was deleted.", id))))
}
