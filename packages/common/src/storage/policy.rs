use crate::config::StorageConfig;

use super::error::StorageError;

/// Admission rules applied to every upload before it is written.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size: u64,
    pub allowed_content_types: Vec<String>,
}

impl UploadPolicy {
    /// Normalize a declared content type and check it against the allow-list.
    ///
    /// Parameters such as `; charset=...` are dropped and the comparison is
    /// case-insensitive. Returns the normalized essence on success.
    pub fn check_content_type(&self, declared: &str) -> Result<String, StorageError> {
        let essence = normalize_content_type(declared);
        if essence.is_empty()
            || !self
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
        {
            return Err(StorageError::UnsupportedContentType(declared.to_string()));
        }
        Ok(essence)
    }

    /// Reject a declared length that is already known to violate the policy.
    pub fn check_declared_length(&self, length: Option<u64>) -> Result<(), StorageError> {
        match length {
            Some(0) => Err(StorageError::EmptyUpload),
            Some(actual) if actual > self.max_size => Err(StorageError::SizeLimitExceeded {
                actual,
                limit: self.max_size,
            }),
            _ => Ok(()),
        }
    }
}

impl From<&StorageConfig> for UploadPolicy {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_size: config.max_blob_size,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }
}

fn normalize_content_type(declared: &str) -> String {
    declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// File extension recorded in a blob key for the given (normalized) content type.
pub fn extension_for(content_type: &str) -> String {
    let preferred = match content_type {
        "image/jpeg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    };
    if let Some(ext) = preferred {
        return ext.to_string();
    }

    mime_guess::get_mime_extensions_str(content_type)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| "bin".to_string())
}
