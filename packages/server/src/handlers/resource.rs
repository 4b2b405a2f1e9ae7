use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use tracing::instrument;

use crate::catalog::{ResourceFilter, ResourceService};
use crate::error::{AppError, ErrorBody};
use crate::models::resource::{ResourceQuery, ResourceResponse, ResourceStatsResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Resources",
    operation_id = "listResources",
    summary = "Search the library",
    description = "Returns every resource matching all supplied filters, newest first. \
        `q` is a case-insensitive substring matched against title and description; \
        `category`, `course` and `specialization` match exactly. Omitted, blank or `All` \
        values impose no constraint. No matches yields an empty array, not an error.",
    params(ResourceQuery),
    responses(
        (status = 200, description = "Matching resources", body = Vec<ResourceResponse>),
        (status = 500, description = "Store unavailable (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(
    skip(state, query),
    fields(
        q = query.q.as_deref(),
        category = query.category.as_deref(),
        course = query.course.as_deref(),
        specialization = query.specialization.as_deref(),
    )
)]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<ResourceResponse>>, AppError> {
    let filter = ResourceFilter::from(query);
    let resources = ResourceService::new(&state.db).search(&filter).await?;

    Ok(Json(
        resources.into_iter().map(ResourceResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Resources",
    operation_id = "resourceStats",
    summary = "Summary counts for a search",
    description = "Accepts the same filters as the listing and returns the number of matches, \
        the number of distinct categories among them and how many were added in the last 24 hours.",
    params(ResourceQuery),
    responses(
        (status = 200, description = "Counts", body = ResourceStatsResponse),
        (status = 500, description = "Store unavailable (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(
    skip(state, query),
    fields(
        q = query.q.as_deref(),
        category = query.category.as_deref(),
        course = query.course.as_deref(),
        specialization = query.specialization.as_deref(),
    )
)]
pub async fn resource_stats(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<ResourceStatsResponse>, AppError> {
    let filter = ResourceFilter::from(query);
    let stats = ResourceService::new(&state.db)
        .stats(&filter, Utc::now())
        .await?;

    Ok(Json(ResourceStatsResponse {
        total: stats.total,
        categories: stats.categories,
        recent: stats.recent,
    }))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Resources",
    operation_id = "listCategories",
    summary = "Categories in use",
    description = "Distinct categories of stored resources, sorted alphabetically.",
    responses(
        (status = 200, description = "Category names", body = Vec<String>),
        (status = 500, description = "Store unavailable (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(ResourceService::new(&state.db).categories().await?))
}
