mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

pub use error::StorageError;
pub use key::{upload_key, validate_key};
pub use traits::{BlobSink, BoxReader, StoredBlob};

/// Build the blob sink selected by `config.backend`.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn BlobSink>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let sink = filesystem::FilesystemBlobSink::new(
                config.filesystem.root.clone(),
                config.filesystem.public_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(sink))
        }
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => Ok(Arc::new(s3::S3BlobSink::new(&config.s3)?)),
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "S3 storage requires the `object-storage` feature".into(),
        )),
    }
}
