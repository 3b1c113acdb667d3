use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::sub_category;
use crate::error::AppError;

use super::shared::{normalize_description, validate_description, validate_name};

/// Body of create and update requests.
///
/// The image reference is not part of it: only the upload endpoint changes it.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubCategoryRequest {
    #[schema(example = "Shoes")]
    pub name: String,
    #[schema(example = "Sneakers, boots and sandals")]
    pub description: Option<String>,
}

/// Values handed to the entity service for a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategoryDraft {
    pub name: String,
    pub description: Option<String>,
    /// `None` keeps whatever reference is stored.
    pub image_url: Option<String>,
}

impl SubCategoryDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        validate_description(self.description.as_deref())
    }
}

impl From<SubCategoryRequest> for SubCategoryDraft {
    fn from(request: SubCategoryRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            description: normalize_description(request.description),
            image_url: None,
        }
    }
}

impl From<SubCategoryResponse> for SubCategoryDraft {
    fn from(current: SubCategoryResponse) -> Self {
        Self {
            name: current.name,
            description: current.description,
            image_url: current.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct SubCategoryResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Shoes")]
    pub name: String,
    pub description: Option<String>,
    /// Reference to pass to `GET /api/sub-category/image/{image_url}`.
    #[schema(example = "0192f0c3a1b27c4e8d1f6a2b3c4d5e6f.jpg")]
    pub image_url: Option<String>,
    #[schema(example = 5)]
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<sub_category::Model> for SubCategoryResponse {
    fn from(model: sub_category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image_url: model.image_url,
            category_id: model.category_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
