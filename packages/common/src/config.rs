use std::path::PathBuf;

use serde::Deserialize;

/// Which blob sink backs uploaded files.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
}

/// Local filesystem sink settings.
#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    /// Directory blobs are written under. Default: "./data/blobs".
    #[serde(default = "default_fs_root")]
    pub root: PathBuf,
    /// Base URL the server exposes stored blobs at. Default: "http://127.0.0.1:3000/files".
    #[serde(default = "default_fs_public_base_url")]
    pub public_base_url: String,
}

fn default_fs_root() -> PathBuf {
    PathBuf::from("./data/blobs")
}
fn default_fs_public_base_url() -> String {
    "http://127.0.0.1:3000/files".into()
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            root: default_fs_root(),
            public_base_url: default_fs_public_base_url(),
        }
    }
}

/// S3-compatible object storage settings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3StorageConfig {
    #[serde(default)]
    pub bucket: String,
    /// AWS region name, or a free-form label when `endpoint` is set.
    #[serde(default)]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...).
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub path_style: bool,
    /// Public URL prefix for stored objects. Defaults to the bucket URL.
    pub public_base_url: Option<String>,
}

/// Blob storage configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub filesystem: FilesystemStorageConfig,
    #[serde(default)]
    pub s3: S3StorageConfig,
}
