//! Core error types

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors surfaced by mutation and query operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// A uniqueness constraint would be (or was) violated
    #[error("A {entity} with {field} '{value}' already exists.")]
    Conflict {
        entity: &'static str,
        field: String,
        value: String,
    },

    /// Referenced row does not exist
    #[error("{0} not found.")]
    NotFound(&'static str),

    /// Malformed input reaching this layer (primary validation is upstream)
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// JSON error
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other failure, surfaced without internal detail
    #[error("{0}")]
    Unexpected(String),
}

/// Result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Map a database error raised while inserting `entity`, turning a
    /// uniqueness violation into a named `Conflict`. The colliding value is
    /// not recoverable from the driver message, so `candidates` supplies
    /// the attempted value per unique field.
    pub fn from_insert_err(
        entity: &'static str,
        candidates: &[(&str, &str)],
        err: DbErr,
    ) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                let field = unique_violation_fields(&msg);
                let value = candidates
                    .iter()
                    .find(|(name, _)| field.contains(name))
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_default();
                CoreError::Conflict { entity, field, value }
            }
            _ => CoreError::Database(err),
        }
    }
}

/// Extract the violated column names from a driver uniqueness error.
///
/// SQLite reports `UNIQUE constraint failed: table.col[, table.col...]`;
/// the table qualifiers are stripped so messages name bare fields.
pub(crate) fn unique_violation_fields(message: &str) -> String {
    let tail = message
        .rsplit("UNIQUE constraint failed:")
        .next()
        .unwrap_or(message);
    let fields: Vec<&str> = tail
        .split(',')
        .map(|part| part.rsplit('.').next().unwrap_or(part).trim())
        .filter(|part| !part.is_empty())
        .collect();
    if fields.is_empty() {
        "unique field".to_string()
    } else {
        fields.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_column_violation() {
        let msg = "error returned from database: (code: 2067) UNIQUE constraint failed: users.email";
        assert_eq!(unique_violation_fields(msg), "email");
    }

    #[test]
    fn parses_composite_violation() {
        let msg = "UNIQUE constraint failed: attendance.user_id, attendance.date";
        assert_eq!(unique_violation_fields(msg), "user_id, date");
    }

    #[test]
    fn falls_back_on_unrecognized_message() {
        assert_eq!(unique_violation_fields(""), "unique field");
    }
}
