use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::key::BlobKey;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// A streamed upload: declared content type, optional length, and the bytes.
pub struct Upload {
    pub content_type: String,
    /// Length announced by the client, if any. The store still counts bytes.
    pub content_length: Option<u64>,
    pub reader: BoxReader,
}

impl Upload {
    pub fn new(content_type: impl Into<String>, content_length: Option<u64>, reader: BoxReader) -> Self {
        Self {
            content_type: content_type.into(),
            content_length,
            reader,
        }
    }

    /// Build an upload from an in-memory buffer.
    pub fn from_bytes(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        let len = data.len() as u64;
        Self::new(content_type, Some(len), Box::new(Cursor::new(data)))
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub key: BlobKey,
    pub size: u64,
}

/// Reference-addressed blob storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes and return the new reference.
    async fn put(&self, content_type: &str, data: &[u8]) -> Result<StoredBlob, StorageError> {
        self.put_stream(Upload::from_bytes(content_type, data.to_vec()))
            .await
    }

    /// Store an upload and return the new reference.
    ///
    /// Every call yields a fresh key, even for identical bytes.
    async fn put_stream(&self, upload: Upload) -> Result<StoredBlob, StorageError>;

    /// Retrieve all bytes for a blob.
    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve a blob as a streaming async reader.
    async fn get_stream(&self, key: &BlobKey) -> Result<BoxReader, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &BlobKey) -> Result<bool, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, key: &BlobKey) -> Result<bool, StorageError>;

    /// Get the size of a blob in bytes.
    async fn size(&self, key: &BlobKey) -> Result<u64, StorageError>;
}
