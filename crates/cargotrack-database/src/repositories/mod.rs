//! PostgreSQL implementations of the store traits.

pub mod file_upload;
pub mod notification;
pub mod order;
pub mod profile;

pub use file_upload::FileUploadRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use profile::ProfileRepository;

use cargotrack_core::error::{AppError, ErrorKind};

/// Map an insert/update failure, turning unique violations into conflicts.
pub(crate) fn write_error(e: sqlx::Error, context: &str, conflict: impl Into<String>) -> AppError {
    let unique = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if unique {
        AppError::with_source(ErrorKind::Conflict, conflict, e)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), e)
    }
}

/// An `ILIKE ... ESCAPE '\\'` pattern matching `query` as a literal substring.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
