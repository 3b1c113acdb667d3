use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(String),
    /// The reference string is not a key this store could have produced.
    #[error("invalid blob reference: {0}")]
    InvalidKey(String),
    /// The upload's declared content type is not accepted by the policy.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    /// The upload carried no bytes.
    #[error("upload is empty")]
    EmptyUpload,
    /// The blob exceeds the configured size limit.
    #[error("blob exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
