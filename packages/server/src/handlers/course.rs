use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::catalog::TaxonomyService;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::course::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Courses",
    operation_id = "listCourses",
    summary = "List courses with their specializations",
    description = "Every course sorted by name, each with its specializations sorted by name.",
    responses(
        (status = 200, description = "Course taxonomy", body = Vec<CourseResponse>),
        (status = 500, description = "Store unavailable (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let trees = TaxonomyService::new(&state.db).list_courses().await?;

    Ok(Json(
        trees
            .into_iter()
            .map(|tree| CourseResponse {
                id: tree.course.id,
                name: tree.course.name,
                specializations: tree
                    .specializations
                    .into_iter()
                    .map(SpecializationResponse::from)
                    .collect(),
            })
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Courses",
    operation_id = "createTaxonomyItem",
    summary = "Create a course or specialization",
    description = "Idempotent: if an item with the same name (and, for specializations, the same \
        course) already exists it is returned unchanged instead of being duplicated.",
    request_body = TaxonomyRequest,
    responses(
        (status = 200, description = "Created or existing item", body = TaxonomyItemResponse),
        (status = 400, description = "Invalid name or unknown course (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Store unavailable (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = payload.name()))]
pub async fn create_taxonomy_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TaxonomyRequest>,
) -> Result<Json<TaxonomyItemResponse>, AppError> {
    let name = payload.validated_name()?;
    let service = TaxonomyService::new(&state.db);

    let (created, item) = match payload {
        TaxonomyRequest::Course { .. } => {
            let upserted = service.upsert_course(&name).await?;
            (
                upserted.created,
                TaxonomyItemResponse::Course(upserted.model.into()),
            )
        }
        TaxonomyRequest::Specialization { course_id, .. } => {
            let upserted = service.upsert_specialization(&name, course_id).await?;
            (
                upserted.created,
                TaxonomyItemResponse::Specialization(upserted.model.into()),
            )
        }
    };

    if created {
        info!("Created taxonomy item");
    }

    Ok(Json(item))
}
