use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The blob key is malformed or unsafe.
    #[error("invalid blob key: {0}")]
    InvalidKey(String),
    /// The remote object store rejected or failed the request.
    #[error("storage backend error: {0}")]
    Backend(String),
}
