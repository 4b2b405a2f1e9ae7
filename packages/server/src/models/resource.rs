use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::resource;

/// Query parameters accepted by the resource listing endpoints.
///
/// Blank values and the literal `All` are treated as "no filter".
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ResourceQuery {
    /// Case-insensitive substring matched against title and description.
    #[param(example = "calculus")]
    pub q: Option<String>,
    /// Exact category match.
    #[param(example = "Notes")]
    pub category: Option<String>,
    /// Exact course match.
    #[param(example = "B.Tech")]
    pub course: Option<String>,
    /// Exact specialization match.
    #[param(example = "CSE")]
    pub specialization: Option<String>,
}

/// A stored resource as returned to clients.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: Uuid,
    #[schema(example = "Calculus Notes")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "calculus-notes.pdf")]
    pub file_name: String,
    #[schema(example = "http://127.0.0.1:3000/files/0193a1e2-7c4d-7000-8000-000000000001/calculus-notes.pdf")]
    pub file_url: String,
    #[schema(example = "application/pdf")]
    pub file_type: String,
    #[schema(example = "Notes")]
    pub category: String,
    #[schema(example = "B.Tech")]
    pub course: Option<String>,
    #[schema(example = "CSE")]
    pub specialization: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<resource::Model> for ResourceResponse {
    fn from(m: resource::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            file_name: m.file_name,
            file_url: m.file_url,
            file_type: m.file_type,
            category: m.category,
            course: m.course,
            specialization: m.specialization,
            created_at: m.created_at,
        }
    }
}

/// Summary counts over a filtered resource set.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ResourceStatsResponse {
    /// Number of matching resources.
    #[schema(example = 42)]
    pub total: u64,
    /// Number of distinct categories among them.
    #[schema(example = 3)]
    pub categories: u64,
    /// How many were uploaded within the last 24 hours.
    #[schema(example = 5)]
    pub recent: u64,
}
