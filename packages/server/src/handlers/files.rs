use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::entity::resource;
use crate::error::AppError;
use crate::state::AppState;

/// Streams a stored blob back by key.
///
/// Keys are immutable once written, so responses may be cached for a long time.
#[instrument(skip(state))]
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let reader = state.blob_sink.get_stream(&key).await?;

    let file_name = key.rsplit('/').next().unwrap_or(key.as_str());
    let content_type = stored_content_type(&state.db, &key)
        .await?
        .unwrap_or_else(|| {
            mime_guess::from_path(file_name)
                .first_or_octet_stream()
                .to_string()
        });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(file_name),
        )
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

fn owner_of(key: &str) -> Select<resource::Entity> {
    resource::Entity::find().filter(resource::Column::BlobKey.eq(key))
}

/// MIME type recorded when the blob was uploaded, if a resource owns it.
async fn stored_content_type<C: ConnectionTrait>(
    db: &C,
    key: &str,
) -> Result<Option<String>, DbErr> {
    Ok(owner_of(key).one(db).await?.map(|r| r.file_type))
}

/// `inline` disposition with an ASCII fallback plus the RFC 5987 form.
fn content_disposition_value(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii = if ascii.is_empty() {
        "download".to_string()
    } else {
        ascii
    };

    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();

    format!("inline; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}
