use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// A blob that has been durably written to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Key the blob was stored under.
    pub key: String,
    /// Publicly retrievable address of the blob.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
}

/// Durable object storage that hands back a public URL for every write.
#[async_trait]
pub trait BlobSink: Send + Sync {
    /// Store `data` under `key` and return where it can be fetched from.
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<StoredBlob, StorageError>;

    /// Retrieve a blob as a streaming async reader.
    async fn get_stream(&self, key: &str) -> Result<BoxReader, StorageError>;

    /// Retrieve all bytes for a blob.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// The public URL a blob stored under `key` is served from.
    fn public_url(&self, key: &str) -> String;
}
