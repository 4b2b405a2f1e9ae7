/// Longest file name, in characters, recorded for a resource.
pub const MAX_FILENAME_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// Nothing usable is left once directories are dropped.
    Empty,
    /// Contains NUL or other ASCII control characters.
    ControlCharacter,
    /// Starts with a dot.
    Hidden,
    TooLong,
}

impl FilenameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "File name cannot be empty",
            Self::ControlCharacter => "Invalid file name: control characters are not allowed",
            Self::Hidden => "Invalid file name: hidden files (starting with '.') are not allowed",
            Self::TooLong => "Invalid file name: at most 255 characters are allowed",
        }
    }
}

/// Reduces a client-supplied file name to its last path component and checks it.
///
/// Some browsers send the full local path (`C:\fakepath\notes.pdf`); only the
/// final segment is kept.
pub fn client_file_name(raw: &str) -> Result<String, FilenameError> {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == ".." {
        return Err(FilenameError::Empty);
    }

    // Would otherwise end up in Content-Disposition.
    if base.chars().any(|c| c.is_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if base.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    if base.chars().count() > MAX_FILENAME_CHARS {
        return Err(FilenameError::TooLong);
    }

    Ok(base.to_string())
}
