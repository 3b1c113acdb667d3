//! Image attach and retrieve flows.
//!
//! Attach reads the sub-category first, so a missing id never reaches the blob
//! store. If persisting the new reference fails, the freshly written blob is
//! deleted again before the error is returned.

use catalog_common::storage::{BlobKey, BlobStore, BoxReader, Upload};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::sub_category::{SubCategoryDraft, SubCategoryResponse};

use super::sub_category::SubCategoryService;

/// Served when a reference's extension maps to no known content type.
pub const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// An opened image, ready to be streamed to the client.
pub struct ImageStream {
    pub key: BlobKey,
    pub content_type: String,
    pub size: u64,
    pub reader: BoxReader,
}

/// Store `upload` and record its reference on sub-category `id`.
pub async fn attach_image(
    sub_categories: &dyn SubCategoryService,
    blob_store: &dyn BlobStore,
    id: i32,
    upload: Upload,
) -> Result<SubCategoryResponse, AppError> {
    let current = sub_categories.get_by_id(id).await?;
    let previous = current.image_url.clone();

    let stored = blob_store.put_stream(upload).await?;
    debug!(sub_category_id = id, key = %stored.key, size = stored.size, "Stored image");

    let mut draft = SubCategoryDraft::from(current);
    draft.image_url = Some(stored.key.to_string());

    let updated = match sub_categories.update(draft, id).await {
        Ok(updated) => updated,
        Err(err) => {
            warn!(
                sub_category_id = id,
                key = %stored.key,
                "Failed to persist image reference, removing stored blob"
            );
            release_blob(blob_store, &stored.key).await;
            return Err(err);
        }
    };

    if let Some(previous) = previous {
        release_image(blob_store, &previous).await;
    }

    Ok(updated)
}

/// Resolve a reference taken from a request path to a byte stream.
pub async fn open_image(
    blob_store: &dyn BlobStore,
    reference: &str,
) -> Result<ImageStream, AppError> {
    let key =
        BlobKey::parse(reference).map_err(|_| AppError::NotFound("Image not found".into()))?;

    let size = blob_store.size(&key).await?;
    let reader = blob_store.get_stream(&key).await?;
    let content_type = key
        .content_type()
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    Ok(ImageStream {
        key,
        content_type,
        size,
        reader,
    })
}

/// Best-effort removal of a blob no entity points at anymore.
pub async fn release_image(blob_store: &dyn BlobStore, reference: &str) {
    match BlobKey::parse(reference) {
        Ok(key) => release_blob(blob_store, &key).await,
        Err(_) => warn!(reference, "Image reference is not a blob key, leaving it in place"),
    }
}

async fn release_blob(blob_store: &dyn BlobStore, key: &BlobKey) {
    if let Err(e) = blob_store.delete(key).await {
        warn!(key = %key, error = %e, "Failed to release image blob");
    }
}
