use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::client::UploadFields;

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const ALLOWED_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png", "image/webp"];

/// Check a file before sending it and return the MIME type to declare.
pub fn check_file(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a file", path.display());
    }
    if meta.len() > MAX_FILE_SIZE {
        bail!("File size exceeds 10MB limit");
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let mime = mime.essence_str();
    if !ALLOWED_TYPES.contains(&mime) {
        bail!("Invalid file type. Only PDF and images are allowed.");
    }
    Ok(mime.to_string())
}

fn length_problem(label: &str, value: &str, min: usize, max: usize) -> Option<String> {
    let len = value.chars().count();
    if len < min {
        Some(if min == 1 {
            format!("{label} is required")
        } else {
            format!("{label} must be at least {min} characters")
        })
    } else if len > max {
        Some(format!("{label} must be at most {max} characters"))
    } else {
        None
    }
}

/// Every field problem the server would report, in form order.
pub fn check_fields(fields: &UploadFields) -> Vec<String> {
    let mut problems = Vec::new();
    problems.extend(length_problem("Title", &fields.title, 3, 100));
    if let Some(desc) = fields.description.as_ref().filter(|d| !d.trim().is_empty()) {
        problems.extend(length_problem("Description", desc, 0, 500));
    }
    problems.extend(length_problem("Category", &fields.category, 2, 50));
    problems.extend(length_problem(
        "Course",
        fields.course.as_deref().unwrap_or_default(),
        1,
        50,
    ));
    problems.extend(length_problem(
        "Specialization",
        fields.specialization.as_deref().unwrap_or_default(),
        1,
        50,
    ));
    problems
}
