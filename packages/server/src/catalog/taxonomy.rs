use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use thiserror::Error;

use crate::entity::{course, specialization};
use crate::error::AppError;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Course {0} does not exist")]
    UnknownCourse(i32),
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl From<TaxonomyError> for AppError {
    fn from(err: TaxonomyError) -> Self {
        match err {
            TaxonomyError::UnknownCourse(_) => AppError::Validation(err.to_string()),
            TaxonomyError::Db(e) => e.into(),
        }
    }
}

/// Result of an idempotent create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted<T> {
    pub model: T,
    /// `false` when the row already existed.
    pub created: bool,
}

/// A course together with its specializations, both sorted by name.
#[derive(Debug, Clone)]
pub struct CourseTree {
    pub course: course::Model,
    pub specializations: Vec<specialization::Model>,
}

pub struct TaxonomyService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> TaxonomyService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create a course by name, or return the existing one.
    pub async fn upsert_course(&self, name: &str) -> Result<Upserted<course::Model>, DbErr> {
        let model = course::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = course::Entity::insert(model)
            .on_conflict(
                OnConflict::column(course::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        let created = match inserted {
            Ok(rows) => rows > 0,
            Err(DbErr::RecordNotInserted) => false,
            Err(e) => return Err(e),
        };

        let model = course::Entity::find()
            .filter(course::Column::Name.eq(name))
            .one(self.conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("course '{name}' missing after upsert")))?;

        Ok(Upserted { model, created })
    }

    /// Create a specialization under `course_id`, or return the existing one
    /// with the same `(name, course_id)`.
    pub async fn upsert_specialization(
        &self,
        name: &str,
        course_id: i32,
    ) -> Result<Upserted<specialization::Model>, TaxonomyError> {
        if course::Entity::find_by_id(course_id)
            .one(self.conn)
            .await?
            .is_none()
        {
            return Err(TaxonomyError::UnknownCourse(course_id));
        }

        let model = specialization::ActiveModel {
            name: Set(name.to_string()),
            course_id: Set(course_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = specialization::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    specialization::Column::Name,
                    specialization::Column::CourseId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        let created = match inserted {
            Ok(rows) => rows > 0,
            Err(DbErr::RecordNotInserted) => false,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                return Err(TaxonomyError::UnknownCourse(course_id));
            }
            Err(e) => return Err(e.into()),
        };

        let model = specialization::Entity::find()
            .filter(specialization::Column::Name.eq(name))
            .filter(specialization::Column::CourseId.eq(course_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "specialization '{name}' of course {course_id} missing after upsert"
                ))
            })?;

        Ok(Upserted { model, created })
    }

    /// Every course sorted by name, each with its specializations.
    pub async fn list_courses(&self) -> Result<Vec<CourseTree>, DbErr> {
        let courses = course::Entity::find()
            .order_by_asc(course::Column::Name)
            .all(self.conn)
            .await?;

        let mut by_course: HashMap<i32, Vec<specialization::Model>> = HashMap::new();
        for spec in specialization::Entity::find()
            .order_by_asc(specialization::Column::Name)
            .all(self.conn)
            .await?
        {
            by_course.entry(spec.course_id).or_default().push(spec);
        }

        Ok(courses
            .into_iter()
            .map(|course| CourseTree {
                specializations: by_course.remove(&course.id).unwrap_or_default(),
                course,
            })
            .collect())
    }
}
