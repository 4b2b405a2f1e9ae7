use std::io::Cursor;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::key::validate_key;
use super::traits::{BlobSink, BoxReader, StoredBlob};
use crate::config::S3StorageConfig;

/// Blob sink writing to an S3-compatible bucket.
///
/// Objects are expected to be publicly readable (bucket policy), so the
/// returned URL is just `{public_base_url}/{key}`.
pub struct S3BlobSink {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3BlobSink {
    pub fn new(config: &S3StorageConfig) -> Result<Self, StorageError> {
        if config.bucket.trim().is_empty() {
            return Err(StorageError::Backend("S3 bucket name is not configured".into()));
        }

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Backend(format!("invalid S3 region: {e}")))?,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid S3 credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        let public_base_url = config
            .public_base_url
            .clone()
            .unwrap_or_else(|| bucket.url())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            bucket,
            public_base_url,
        })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl BlobSink for S3BlobSink {
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        validate_key(key)?;
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let status = response.status_code();
        if !is_success(status) {
            return Err(StorageError::Backend(format!(
                "put {key} failed with status {status}"
            )));
        }

        Ok(StoredBlob {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
        })
    }

    async fn get_stream(&self, key: &str) -> Result<BoxReader, StorageError> {
        validate_key(key)?;
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        match response.status_code() {
            404 => Err(StorageError::NotFound(key.to_string())),
            status if is_success(status) => Ok(Box::new(Cursor::new(response.bytes().to_vec()))),
            status => Err(StorageError::Backend(format!(
                "get {key} failed with status {status}"
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        match response.status_code() {
            404 => Ok(false),
            status if is_success(status) => Ok(true),
            status => Err(StorageError::Backend(format!(
                "delete {key} failed with status {status}"
            ))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
