use std::sync::Arc;

use common::storage::BlobSink;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub blob_sink: Arc<dyn BlobSink>,
    pub config: AppConfig,
}
