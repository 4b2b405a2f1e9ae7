use serde::Serialize;

use super::resource::ResourceResponse;
use super::shared::{FieldErrors, check_length, non_empty};
use crate::config::UploadConfig;
use crate::error::AppError;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const CATEGORY_MIN: usize = 2;
pub const CATEGORY_MAX: usize = 50;
pub const TAXONOMY_MIN: usize = 1;
pub const TAXONOMY_MAX: usize = 50;

/// The file part of an upload, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// MIME type as declared by the client.
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Raw text fields of an upload form, before validation.
#[derive(Debug, Default, Clone)]
pub struct UploadMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub course: Option<String>,
    pub specialization: Option<String>,
}

/// Upload metadata that passed validation, kept as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMetadata {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub course: Option<String>,
    pub specialization: Option<String>,
}

/// Why a file was refused before any metadata was looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRejection {
    Missing,
    TooLarge { limit: u64 },
    UnsupportedType(String),
}

impl FileRejection {
    pub fn message(&self) -> String {
        match self {
            Self::Missing => "No file uploaded".into(),
            Self::TooLarge { limit } => {
                format!("File size exceeds {} limit", human_size(*limit))
            }
            Self::UnsupportedType(_) => {
                "Invalid file type. Only PDF and images are allowed.".into()
            }
        }
    }
}

impl From<FileRejection> for AppError {
    fn from(rejection: FileRejection) -> Self {
        AppError::Validation(rejection.message())
    }
}

fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// First gate: presence, size ceiling and MIME allow-list.
pub fn admit_file(
    file: Option<UploadedFile>,
    config: &UploadConfig,
) -> Result<UploadedFile, FileRejection> {
    let mut file = file.ok_or(FileRejection::Missing)?;

    if file.data.len() as u64 > config.max_file_size {
        return Err(FileRejection::TooLarge {
            limit: config.max_file_size,
        });
    }

    // Drop parameters such as `; charset=binary`.
    let essence = file
        .content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !config
        .allowed_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
    {
        return Err(FileRejection::UnsupportedType(file.content_type));
    }
    file.content_type = essence;

    Ok(file)
}

impl UploadMetadata {
    /// Second gate: every field is checked and all failures are reported together.
    pub fn validate(&self, require_taxonomy: bool) -> Result<ValidatedMetadata, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = check_length(
            &mut errors,
            "title",
            "Title",
            self.title.as_deref().unwrap_or_default(),
            TITLE_MIN,
            TITLE_MAX,
        );

        let description = self
            .description
            .clone()
            .filter(|d| !d.trim().is_empty());
        if let Some(desc) = &description
            && desc.chars().count() > DESCRIPTION_MAX
        {
            errors.add(
                "description",
                format!("Description must be at most {DESCRIPTION_MAX} characters"),
            );
        }

        let category = check_length(
            &mut errors,
            "category",
            "Category",
            self.category.as_deref().unwrap_or_default(),
            CATEGORY_MIN,
            CATEGORY_MAX,
        );

        let course = taxonomy_field(
            &mut errors,
            "course",
            "Course",
            &self.course,
            require_taxonomy,
        );
        let specialization = taxonomy_field(
            &mut errors,
            "specialization",
            "Specialization",
            &self.specialization,
            require_taxonomy,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        match (title, category) {
            (Some(title), Some(category)) => Ok(ValidatedMetadata {
                title,
                description,
                category,
                course,
                specialization,
            }),
            // check_length only returns None after recording an error.
            _ => Err(errors),
        }
    }
}

fn taxonomy_field(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &Option<String>,
    required: bool,
) -> Option<String> {
    match non_empty(value.clone()) {
        Some(v) => check_length(errors, field, label, &v, TAXONOMY_MIN, TAXONOMY_MAX),
        None if required => {
            errors.add(field, format!("{label} is required"));
            None
        }
        None => None,
    }
}

/// Successful upload response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = true)]
    pub success: bool,
    pub resource: ResourceResponse,
}
