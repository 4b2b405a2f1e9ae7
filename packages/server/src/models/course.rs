use serde::{Deserialize, Serialize};

use super::shared::{FieldErrors, check_length};
use crate::entity::{course, specialization};
use crate::error::AppError;

pub const NAME_MIN: usize = 1;
pub const NAME_MAX: usize = 50;

/// Body of `POST /courses`, discriminated by `type`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaxonomyRequest {
    /// Create a course, or return the existing one with that name.
    Course {
        #[schema(example = "B.Tech")]
        name: String,
    },
    /// Create a specialization under a course, or return the existing one.
    Specialization {
        #[schema(example = "CSE")]
        name: String,
        #[serde(rename = "courseId")]
        #[schema(example = 1)]
        course_id: i32,
    },
}

impl TaxonomyRequest {
    pub fn name(&self) -> &str {
        match self {
            Self::Course { name } | Self::Specialization { name, .. } => name,
        }
    }

    /// Returns the trimmed name, or a validation error.
    pub fn validated_name(&self) -> Result<String, AppError> {
        let mut errors = FieldErrors::default();
        check_length(&mut errors, "name", "Name", self.name().trim(), NAME_MIN, NAME_MAX)
            .ok_or(AppError::InvalidFields(errors))
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecializationResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "CSE")]
    pub name: String,
    #[schema(example = 1)]
    pub course_id: i32,
}

impl From<specialization::Model> for SpecializationResponse {
    fn from(m: specialization::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            course_id: m.course_id,
        }
    }
}

/// A course without its specializations.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseSummary {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "B.Tech")]
    pub name: String,
}

impl From<course::Model> for CourseSummary {
    fn from(m: course::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

/// A course with its specializations nested.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "B.Tech")]
    pub name: String,
    pub specializations: Vec<SpecializationResponse>,
}

/// Entity returned by `POST /courses`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum TaxonomyItemResponse {
    Course(CourseSummary),
    Specialization(SpecializationResponse),
}
