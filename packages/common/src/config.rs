use std::path::PathBuf;

use serde::Deserialize;

/// Image storage configuration shared by the server and the blob store.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory for stored blobs. Default: "./data/images".
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// Largest accepted upload in bytes. Default: 10 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
    /// MIME types accepted by the upload policy.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
}

fn default_base_path() -> PathBuf {
    PathBuf::from("./data/images")
}
fn default_max_blob_size() -> u64 {
    10 * 1024 * 1024
}
fn default_allowed_content_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/gif", "image/webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            max_blob_size: default_max_blob_size(),
            allowed_content_types: default_allowed_content_types(),
        }
    }
}
