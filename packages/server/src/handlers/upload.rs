use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use tracing::{info, instrument};

use crate::catalog::UploadPipeline;
use crate::config::UploadConfig;
use crate::error::{AppError, ErrorBody};
use crate::models::resource::ResourceResponse;
use crate::models::upload::{
    FileRejection, UploadMetadata, UploadResponse, UploadedFile, admit_file,
};
use crate::state::AppState;
use crate::utils::filename::client_file_name;

/// Room left for the text fields and multipart framing on top of the file.
const FORM_OVERHEAD: u64 = 1024 * 1024;

pub fn upload_body_limit(config: &UploadConfig) -> DefaultBodyLimit {
    let limit = config.max_file_size.saturating_add(FORM_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Upload",
    operation_id = "uploadResource",
    summary = "Upload a resource",
    description = "Multipart form with a `file` part and the text fields `title`, `description`, \
        `category`, `course` and `specialization`. The file is checked first (presence, \
        10 MiB ceiling, PDF/JPEG/PNG/WEBP only); then every metadata field is validated and all \
        failures are reported together under `details`. On success the file is stored and the \
        new resource is returned.",
    request_body(content_type = "multipart/form-data", description = "File and resource metadata"),
    responses(
        (status = 200, description = "Resource stored", body = UploadResponse),
        (status = 400, description = "File rejected or invalid metadata (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (STORAGE_ERROR, DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart), fields(title, category, file_name))]
pub async fn upload_resource(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload_config = &state.config.upload;
    let mut metadata = UploadMetadata::default();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "file" => file = read_file_field(field, upload_config.max_file_size).await?,
            "title" => metadata.title = Some(read_text(field).await?),
            "description" => metadata.description = Some(read_text(field).await?),
            "category" => metadata.category = Some(read_text(field).await?),
            "course" => metadata.course = Some(read_text(field).await?),
            "specialization" => metadata.specialization = Some(read_text(field).await?),
            _ => {} // Ignore unknown fields.
        }
    }

    let span = tracing::Span::current();
    span.record("title", metadata.title.as_deref());
    span.record("category", metadata.category.as_deref());

    let file = admit_file(file, upload_config)?;
    span.record("file_name", file.file_name.as_str());

    let validated = metadata
        .validate(upload_config.require_taxonomy)
        .map_err(AppError::InvalidFields)?;

    let model = UploadPipeline::new(&state.db, &*state.blob_sink)
        .store(file, validated)
        .await?;
    info!(resource_id = %model.id, "Resource uploaded");

    Ok(Json(UploadResponse {
        success: true,
        resource: ResourceResponse::from(model),
    }))
}

/// Buffers the file part, discarding it once it outgrows `max_size`.
///
/// A part with neither a file name nor content counts as no file at all,
/// which is what browsers send for an empty file input.
async fn read_file_field(
    mut field: Field<'_>,
    max_size: u64,
) -> Result<Option<UploadedFile>, AppError> {
    let raw_name = field.file_name().map(str::to_owned);
    let declared_type = field.content_type().map(str::to_owned);

    let mut data = Vec::new();
    let mut oversized = false;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        // Consume the whole part before answering.
        if oversized || (data.len() + chunk.len()) as u64 > max_size {
            oversized = true;
            data.clear();
            continue;
        }
        data.extend_from_slice(&chunk);
    }
    if oversized {
        return Err(FileRejection::TooLarge { limit: max_size }.into());
    }

    let raw_name = raw_name.unwrap_or_default();
    if raw_name.trim().is_empty() && data.is_empty() {
        return Ok(None);
    }

    let file_name =
        client_file_name(&raw_name).map_err(|e| AppError::Validation(e.message().into()))?;
    let content_type = declared_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| {
            mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string()
        });

    Ok(Some(UploadedFile {
        file_name,
        content_type,
        data,
    }))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Validation("Upload exceeds the maximum request size".into());
    }
    AppError::Validation(format!("Multipart error: {}", err.body_text()))
}

