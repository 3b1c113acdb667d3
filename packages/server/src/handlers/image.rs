use std::path::{Path as FsPath, PathBuf};

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State, multipart::Field};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_common::storage::{StorageError, Upload};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, ErrorBody};
use crate::models::sub_category::SubCategoryResponse;
use crate::services::image::{attach_image, open_image};
use crate::state::AppState;

/// Multipart field carrying the image bytes.
const IMAGE_FIELD: &str = "image";
/// Room for multipart boundaries and part headers on top of the blob itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

pub fn image_upload_body_limit(storage: &StorageConfig) -> DefaultBodyLimit {
    let limit = storage.max_blob_size.saturating_add(MULTIPART_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/api/sub-category/image/upload/{sub_category_id}",
    tag = "Sub-category Images",
    operation_id = "uploadSubCategoryImage",
    summary = "Attach an image to a sub-category",
    description = "Stores the `image` multipart field and records the returned reference on the \
        sub-category. Any previously attached image is released.",
    params(("sub_category_id" = i32, Path, description = "Sub-category ID")),
    request_body(content_type = "multipart/form-data", description = "Image upload in the `image` field"),
    responses(
        (status = 200, description = "Image attached", body = SubCategoryResponse),
        (status = 400, description = "Missing field, unsupported type, empty or oversized upload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sub-category not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Image storage failure (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(sub_category_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<SubCategoryResponse>, AppError> {
    // Nothing is read from the body for an id that does not exist.
    state.sub_categories.get_by_id(sub_category_id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = declared_content_type(&field);
        let spooled = spool_field(field, state.config.storage.max_blob_size).await?;

        let result = async {
            let file = tokio::fs::File::open(&spooled.path)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
            let upload = Upload::new(content_type, Some(spooled.size), Box::new(file));
            attach_image(
                &*state.sub_categories,
                &*state.blob_store,
                sub_category_id,
                upload,
            )
            .await
        }
        .await;

        discard(&spooled.path).await;

        return result.map(Json);
    }

    Err(AppError::Validation(format!("Missing '{IMAGE_FIELD}' field")))
}

#[utoipa::path(
    get,
    path = "/api/sub-category/image/{image_url}",
    tag = "Sub-category Images",
    operation_id = "getSubCategoryImage",
    summary = "Download an image by reference",
    description = "Streams the stored bytes with the content type recorded at upload. \
        References never change content, so responses are cacheable forever and \
        `If-None-Match` is honoured.",
    params(("image_url" = String, Path, description = "Image reference as returned in `image_url`")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 404, description = "Unknown reference (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers))]
pub async fn download_image(
    State(state): State<AppState>,
    Path(image_url): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let image = open_image(&*state.blob_store, &image_url).await?;

    let etag_value = format!("\"{}\"", image.key);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && etag_matches(val, &etag_value)
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let body = Body::from_stream(ReaderStream::new(image.reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type)
        .header(header::CONTENT_LENGTH, image.size.to_string())
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, IMMUTABLE_CACHE)
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Weak comparison of an `If-None-Match` list against our strong ETag.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

/// Content type of a multipart field: the part header, else a guess from the file name.
fn declared_content_type(field: &Field<'_>) -> String {
    field
        .content_type()
        .map(str::to_string)
        .or_else(|| {
            field
                .file_name()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|m| m.essence_str().to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

struct SpooledField {
    path: PathBuf,
    size: u64,
}

/// Copy a multipart field to a temp file so the store can read it as a stream.
async fn spool_field(mut field: Field<'_>, max_size: u64) -> Result<SpooledField, AppError> {
    let path = std::env::temp_dir().join(format!("catalog-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        let mut size: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            size += chunk.len() as u64;
            if size > max_size {
                return Err(StorageError::SizeLimitExceeded {
                    actual: size,
                    limit: max_size,
                }
                .into());
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
        Ok(size)
    }
    .await;

    match result {
        Ok(size) => Ok(SpooledField { path, size }),
        Err(e) => {
            discard(&path).await;
            Err(e)
        }
    }
}

/// Best-effort temp file removal.
async fn discard(path: &FsPath) {
    let _ = tokio::fs::remove_file(path).await;
}
