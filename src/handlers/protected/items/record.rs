use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    Json,
};

use crate::database::models::Item;
use crate::handlers::NameRequest;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

/// GET /bucketlists/:id/items/:item_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<Item> {
    let Path((bucketlist_id, item_id)) = ids?;
    let item = state.items().get(auth_user.user_id, bucketlist_id, item_id).await?;
    Ok(ApiResponse::success(item))
}

/// PUT /bucketlists/:id/items/:item_id - rename
pub async fn put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult<Item> {
    let Path((bucketlist_id, item_id)) = ids?;
    let Json(body) = payload?;
    let item = state
        .items()
        .update(auth_user.user_id, bucketlist_id, item_id, &body.name)
        .await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /bucketlists/:id/items/:item_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<Message> {
    let Path((bucketlist_id, item_id)) = ids?;
    state.items().delete(auth_user.user_id, bucketlist_id, item_id).await?;
    Ok(ApiResponse::success(Message::new("Item was successfully deleted.")))
}
