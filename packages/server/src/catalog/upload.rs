use chrono::Utc;
use common::storage::{BlobSink, upload_key};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::entity::resource;
use crate::error::AppError;
use crate::models::upload::{UploadedFile, ValidatedMetadata};

/// Writes an admitted upload to the blob sink and records it.
///
/// If the record cannot be created the blob is deleted again, best effort.
pub struct UploadPipeline<'a, C: ConnectionTrait> {
    conn: &'a C,
    sink: &'a dyn BlobSink,
}

impl<'a, C: ConnectionTrait> UploadPipeline<'a, C> {
    pub fn new(conn: &'a C, sink: &'a dyn BlobSink) -> Self {
        Self { conn, sink }
    }

    pub async fn store(
        &self,
        file: UploadedFile,
        metadata: ValidatedMetadata,
    ) -> Result<resource::Model, AppError> {
        let key = upload_key(&file.file_name);
        let blob = self
            .sink
            .put(&key, &file.data, &file.content_type)
            .await?;
        info!(key = %blob.key, size = blob.size, "Stored upload blob");

        let record = resource::ActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(metadata.title),
            description: Set(metadata.description),
            file_name: Set(file.file_name),
            file_url: Set(blob.url),
            blob_key: Set(blob.key.clone()),
            file_type: Set(file.content_type),
            category: Set(metadata.category),
            course: Set(metadata.course),
            specialization: Set(metadata.specialization),
            created_at: Set(Utc::now()),
        };

        match record.insert(self.conn).await {
            Ok(model) => Ok(model),
            Err(e) => {
                self.discard_blob(&blob.key).await;
                Err(e.into())
            }
        }
    }

    async fn discard_blob(&self, key: &str) {
        match self.sink.delete(key).await {
            Ok(true) => warn!(key, "Removed blob after failed resource insert"),
            Ok(false) => warn!(key, "Blob already absent after failed resource insert"),
            Err(e) => error!(key, error = %e, "Failed to remove orphaned blob"),
        }
    }
}
