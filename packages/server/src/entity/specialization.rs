use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "specialization")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // Same name may appear under different courses.
    #[sea_orm(unique_key = "name_course")]
    pub name: String,
    #[sea_orm(unique_key = "name_course")]
    pub course_id: i32,

    #[sea_orm(belongs_to, from = "course_id", to = "id")]
    pub course: HasOne<super::course::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
