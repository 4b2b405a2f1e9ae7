use std::collections::BTreeMap;

use serde::Serialize;

/// Sentinel the library UI sends for "no filter".
pub const ALL_SENTINEL: &str = "All";

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Per-field validation messages, collected rather than failing on the first.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Check that the length of `value` in characters lies in `[min, max]`.
///
/// The value is measured as given. Returns it when it passes; records a
/// message otherwise.
pub fn check_length(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Option<String> {
    let len = value.chars().count();
    if len < min {
        if min == 1 {
            errors.add(field, format!("{label} is required"));
        } else {
            errors.add(field, format!("{label} must be at least {min} characters"));
        }
        None
    } else if len > max {
        errors.add(field, format!("{label} must be at most {max} characters"));
        None
    } else {
        Some(value.to_string())
    }
}

/// An empty parameter counts as absent. Anything else is kept verbatim.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
