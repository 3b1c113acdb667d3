mod error;
mod key;
mod policy;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use key::BlobKey;
pub use policy::{UploadPolicy, extension_for};
pub use filesystem::FilesystemBlobStore;
pub use traits::{BlobStore, BoxReader, StoredBlob, Upload};
