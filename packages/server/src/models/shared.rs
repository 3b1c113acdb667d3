use serde::Serialize;

use crate::error::AppError;

const MAX_NAME_CHARS: usize = 128;
const MAX_DESCRIPTION_CHARS: usize = 1024;

/// Status payload for operations that have no resource to return.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ApiResponse {
    #[schema(example = "SubCategory Deleted Successfully")]
    pub message: String,
    #[schema(example = true)]
    pub success: bool,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}

/// Validate a trimmed display name (1-128 Unicode characters).
pub fn validate_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::Validation(format!(
            "Name must be 1-{MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

/// Validate an optional description (at most 1024 Unicode characters).
pub fn validate_description(description: Option<&str>) -> Result<(), AppError> {
    if let Some(description) = description
        && description.chars().count() > MAX_DESCRIPTION_CHARS
    {
        return Err(AppError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(())
}

/// Trim a description, mapping blank input to `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
