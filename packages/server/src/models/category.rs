use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::category;
use crate::error::AppError;

use super::shared::{validate_description, validate_name};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Footwear")]
    pub name: String,
    #[schema(example = "Everything you wear on your feet")]
    pub description: Option<String>,
}

pub fn validate_create_category(payload: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_description(payload.description.as_deref())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Footwear")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
