use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    Json,
};

use crate::database::models::Item;
use crate::database::PageRequest;
use crate::handlers::{ListQuery, NameRequest, PageResponse};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /bucketlists/:id/items?page&limit
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    bucketlist_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<PageResponse<Item>> {
    let Path(bucketlist_id) = bucketlist_id?;
    let Query(query) = query?;
    let request = PageRequest::new(query.page, query.limit, &state.config.pagination)?;

    let page = state.items().list(auth_user.user_id, bucketlist_id, request).await?;

    let path = format!("/bucketlists/{}/items", bucketlist_id);
    Ok(ApiResponse::success(PageResponse::from_page(page, &path, None)))
}

/// POST /bucketlists/:id/items - new item, not done
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    bucketlist_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult<Item> {
    let Path(bucketlist_id) = bucketlist_id?;
    let Json(body) = payload?;
    let item = state.items().create(auth_user.user_id, bucketlist_id, &body.name).await?;
    Ok(ApiResponse::created(item))
}
