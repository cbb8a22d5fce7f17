//! Errors raised while assembling or running statements.

use thiserror::Error;
use tokio_postgres::error::SqlState;

pub type QolaResult<T> = Result<T, QolaError>;

#[derive(Debug, Error)]
pub enum QolaError {
    /// A mode name other than `select`, `insert`, `update` or `delete`.
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// The SQL text and the bound parameters disagree on how many values there are.
    #[error("Parameter mismatch: {placeholders} placeholder(s) but {params} parameter(s)")]
    ParamMismatch { placeholders: usize, params: usize },

    /// The builder state cannot produce a runnable statement.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// Any database error without a more specific variant.
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A statement that must return a row returned none.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// A result column could not be turned into a [`Value`](crate::Value).
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl QolaError {
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_unsupported_mode(&self) -> bool {
        matches!(self, Self::UnsupportedMode(_))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Classify a driver error by SQLSTATE.
    ///
    /// Constraint violations get their own variants (message prefixed with the
    /// constraint name); everything else stays a [`QolaError::Query`].
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let classified = err.as_db_error().and_then(|db| {
            let detail = || format!("{}: {}", db.constraint().unwrap_or("unknown"), db.message());
            match db.code() {
                c if *c == SqlState::UNIQUE_VIOLATION => Some(Self::UniqueViolation(detail())),
                c if *c == SqlState::FOREIGN_KEY_VIOLATION => {
                    Some(Self::ForeignKeyViolation(detail()))
                }
                c if *c == SqlState::CHECK_VIOLATION => Some(Self::CheckViolation(detail())),
                _ => None,
            }
        });
        classified.unwrap_or(Self::Query(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_mode_message_names_the_mode() {
        let err = QolaError::UnsupportedMode("upsert".to_string());
        assert!(err.is_unsupported_mode());
        assert_eq!(err.to_string(), "Unsupported mode: upsert");
    }

    #[test]
    fn param_mismatch_message() {
        let err = QolaError::ParamMismatch {
            placeholders: 2,
            params: 1,
        };
        assert_eq!(
            err.to_string(),
            "Parameter mismatch: 2 placeholder(s) but 1 parameter(s)"
        );
    }

    #[test]
    fn predicates_match_their_variant_only() {
        let missing = QolaError::not_found("users where id = 9");
        assert!(missing.is_not_found());
        assert!(!missing.is_unique_violation());
        assert_eq!(missing.to_string(), "Not found: users where id = 9");
        assert!(!QolaError::validation("empty").is_not_found());
    }
}
