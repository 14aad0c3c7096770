//! Blob key construction.

use chrono::{DateTime, Utc};

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Leading dots are stripped so a name can never resolve to `.` or `..`;
/// a name with nothing left becomes `file`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the blob key `{owner}/{unix_millis}_{sanitised name}`.
pub fn object_key(owner: &str, file_name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}/{}_{}",
        sanitize_filename(owner),
        at.timestamp_millis(),
        sanitize_filename(file_name)
    )
}
