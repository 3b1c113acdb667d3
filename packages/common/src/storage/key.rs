use std::fmt;

use uuid::Uuid;

use super::error::StorageError;

const STEM_LEN: usize = 32;
const MAX_EXTENSION_LEN: usize = 8;

/// Reference to a stored blob: a UUIDv7 in simple hex form plus a file extension.
///
/// The extension records the content type declared at upload time, so a key
/// alone is enough to answer a download with the right `Content-Type`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlobKey {
    stem: String,
    extension: String,
}

impl BlobKey {
    /// Generate a fresh, time-ordered key with the given extension.
    pub fn generate(extension: &str) -> Result<Self, StorageError> {
        validate_extension(extension)?;
        Ok(Self {
            stem: Uuid::now_v7().simple().to_string(),
            extension: extension.to_ascii_lowercase(),
        })
    }

    /// Parse a reference string such as `0192f0c3a1b27c4e8d1f6a2b3c4d5e6f.png`.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let (stem, extension) = s
            .split_once('.')
            .ok_or_else(|| StorageError::InvalidKey(format!("missing extension in {s:?}")))?;

        if stem.len() != STEM_LEN
            || !stem
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(StorageError::InvalidKey(format!(
                "expected {STEM_LEN} lowercase hex characters before the extension in {s:?}"
            )));
        }
        if extension.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(StorageError::InvalidKey(format!(
                "extension must be lowercase in {s:?}"
            )));
        }
        validate_extension(extension)?;

        Ok(Self {
            stem: stem.to_string(),
            extension: extension.to_string(),
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Content type implied by the extension, if it is a known one.
    pub fn content_type(&self) -> Option<String> {
        mime_guess::from_ext(&self.extension)
            .first()
            .map(|m| m.essence_str().to_string())
    }

    /// First 2 hex characters, used as the shard directory.
    pub fn shard_prefix(&self) -> &str {
        &self.stem[..2]
    }

    /// File name within the shard directory.
    pub fn shard_suffix(&self) -> String {
        format!("{}.{}", &self.stem[2..], self.extension)
    }
}

fn validate_extension(extension: &str) -> Result<(), StorageError> {
    if extension.is_empty()
        || extension.len() > MAX_EXTENSION_LEN
        || !extension.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return Err(StorageError::InvalidKey(format!(
            "invalid extension {extension:?}"
        )));
    }
    Ok(())
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.stem, self.extension)
    }
}

impl fmt::Debug for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobKey({self})")
    }
}
