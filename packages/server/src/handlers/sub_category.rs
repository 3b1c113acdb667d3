use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::ApiResponse;
use crate::models::sub_category::{SubCategoryDraft, SubCategoryRequest, SubCategoryResponse};
use crate::services::image::release_image;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/category/{category_id}/sub-category",
    tag = "Sub-categories",
    operation_id = "createSubCategory",
    summary = "Create a sub-category under a category",
    params(("category_id" = i32, Path, description = "Parent category ID")),
    request_body = SubCategoryRequest,
    responses(
        (status = 201, description = "Sub-category created", body = SubCategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, payload))]
pub async fn create_sub_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    AppJson(payload): AppJson<SubCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state
        .sub_categories
        .create(SubCategoryDraft::from(payload), category_id)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/sub-category/{sub_category_id}",
    tag = "Sub-categories",
    operation_id = "updateSubCategory",
    summary = "Update a sub-category",
    description = "Replaces name and description. The image reference is left as stored.",
    params(("sub_category_id" = i32, Path, description = "Sub-category ID")),
    request_body = SubCategoryRequest,
    responses(
        (status = 200, description = "Sub-category updated", body = SubCategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sub-category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, payload))]
pub async fn update_sub_category(
    State(state): State<AppState>,
    Path(sub_category_id): Path<i32>,
    AppJson(payload): AppJson<SubCategoryRequest>,
) -> Result<Json<SubCategoryResponse>, AppError> {
    let updated = state
        .sub_categories
        .update(SubCategoryDraft::from(payload), sub_category_id)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/sub-category/{sub_category_id}",
    tag = "Sub-categories",
    operation_id = "deleteSubCategory",
    summary = "Delete a sub-category",
    description = "Deletes the record, then releases its image blob best-effort.",
    params(("sub_category_id" = i32, Path, description = "Sub-category ID")),
    responses(
        (status = 200, description = "Sub-category deleted", body = ApiResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sub-category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn delete_sub_category(
    State(state): State<AppState>,
    Path(sub_category_id): Path<i32>,
) -> Result<Json<ApiResponse>, AppError> {
    let current = state.sub_categories.get_by_id(sub_category_id).await?;
    state.sub_categories.delete(sub_category_id).await?;

    if let Some(reference) = current.image_url {
        release_image(&*state.blob_store, &reference).await;
    }

    Ok(Json(ApiResponse::ok("SubCategory Deleted Successfully")))
}

#[utoipa::path(
    get,
    path = "/api/sub-categories",
    tag = "Sub-categories",
    operation_id = "listSubCategories",
    summary = "List all sub-categories",
    responses((status = 200, description = "Sub-categories ordered by id", body = Vec<SubCategoryResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_sub_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubCategoryResponse>>, AppError> {
    Ok(Json(state.sub_categories.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/sub-category/{sub_category_id}",
    tag = "Sub-categories",
    operation_id = "getSubCategory",
    summary = "Get a sub-category by id",
    params(("sub_category_id" = i32, Path, description = "Sub-category ID")),
    responses(
        (status = 200, description = "Sub-category", body = SubCategoryResponse),
        (status = 404, description = "Sub-category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_sub_category(
    State(state): State<AppState>,
    Path(sub_category_id): Path<i32>,
) -> Result<Json<SubCategoryResponse>, AppError> {
    Ok(Json(state.sub_categories.get_by_id(sub_category_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/category/{category_id}/sub-categories",
    tag = "Sub-categories",
    operation_id = "listSubCategoriesByCategory",
    summary = "List the sub-categories of one category",
    params(("category_id" = i32, Path, description = "Parent category ID")),
    responses(
        (status = 200, description = "Sub-categories ordered by id", body = Vec<SubCategoryResponse>),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_sub_categories_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<SubCategoryResponse>>, AppError> {
    Ok(Json(state.sub_categories.list_by_category(category_id).await?))
}
