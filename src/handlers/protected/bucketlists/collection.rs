use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query, State,
    },
    Json,
};

use crate::database::models::BucketlistWithItems;
use crate::database::PageRequest;
use crate::handlers::{ListQuery, NameRequest, PageResponse};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

const COLLECTION_PATH: &str = "/bucketlists/";

/// GET /bucketlists/?page&limit&q - one page of the caller's bucketlists
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<PageResponse<BucketlistWithItems>> {
    let Query(query) = query?;
    let request = PageRequest::new(query.page, query.limit, &state.config.pagination)?;
    let search = query.search();

    let page = state.bucketlists().list(auth_user.user_id, request, search).await?;

    Ok(ApiResponse::success(PageResponse::from_page(page, COLLECTION_PATH, search)))
}

/// POST /bucketlists/ - create a bucketlist owned by the caller
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult<BucketlistWithItems> {
    let Json(body) = payload?;

    let bucketlist = state.bucketlists().create(auth_user.user_id, &body.name).await?;

    Ok(ApiResponse::created(BucketlistWithItems::new(bucketlist, vec![])))
}
