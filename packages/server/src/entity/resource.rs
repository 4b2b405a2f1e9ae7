use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resource")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Original upload filename.
    pub file_name: String,
    /// Public URL returned by the blob sink. Never changes after upload.
    pub file_url: String,
    /// Key of the stored blob in the sink.
    #[sea_orm(unique)]
    pub blob_key: String,
    /// Declared MIME type.
    pub file_type: String,

    #[sea_orm(indexed)]
    pub category: String,

    // Free text on purpose: not foreign keys into course/specialization.
    pub course: Option<String>,
    pub specialization: Option<String>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
