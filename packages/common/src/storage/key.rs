use uuid::Uuid;

use super::error::StorageError;

const MAX_KEY_LEN: usize = 512;

/// Build a fresh, collision-free key for an uploaded file.
///
/// The key has the shape `{uuid-v7}/{name}` where `name` keeps only
/// `[A-Za-z0-9._-]` from the original file name; anything else becomes `_`.
pub fn upload_key(file_name: &str) -> String {
    let mut name: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = name.trim_start_matches('.');
    if trimmed.is_empty() {
        name = "file".to_string();
    } else if trimmed.len() != name.len() {
        name = trimmed.to_string();
    }
    if name.len() > 200 {
        name.truncate(200);
    }

    format!("{}/{}", Uuid::now_v7(), name)
}

/// Reject keys that could escape the sink's namespace.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = |msg: &str| Err(StorageError::InvalidKey(format!("{msg}: {key:?}")));

    if key.is_empty() {
        return invalid("key is empty");
    }
    if key.len() > MAX_KEY_LEN {
        return invalid("key is too long");
    }
    if key.contains('\0') || key.contains('\\') {
        return invalid("key contains forbidden characters");
    }
    if key.starts_with('/') {
        return invalid("key must be relative");
    }
    for segment in key.split('/') {
        if segment.is_empty() {
            return invalid("key contains an empty segment");
        }
        if segment.starts_with('.') {
            return invalid("key segments must not start with '.'");
        }
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
    {
        return invalid("key contains invalid characters");
    }
    Ok(())
}
