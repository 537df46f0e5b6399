//! Error types for dbwalker

use crate::client::DbError;
use thiserror::Error;

/// Result type alias for dbwalker operations
pub type WalkerResult<T> = Result<T, WalkerError>;

/// Errors raised while assembling or running a statement.
///
/// Every assembly error is returned before any SQL text is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkerError {
    /// A required input is absent (table, INSERT/UPDATE data, DELETE where, join constraint).
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// A condition entry is not a string, object or array, or names an unknown operator.
    #[error("Unsupported condition shape: {0}")]
    UnsupportedConditionShape(String),

    /// A condition (or join) carries more than one operator key.
    #[error("Ambiguous operator keys: {0}")]
    AmbiguousOperatorKey(String),

    /// An identifier string has no usable table segment.
    #[error("Invalid identifier '{raw}': {reason}")]
    InvalidIdentifier { raw: String, reason: String },

    /// A join descriptor is neither a tuple nor an object, or names an unknown join type.
    #[error("Unsupported join shape: {0}")]
    UnsupportedJoinShape(String),

    /// A projection entry cannot be rendered.
    #[error("Unsupported column shape: {0}")]
    UnsupportedColumnShape(String),

    /// A value cannot be encoded (non-finite number, unknown function, bad limit...).
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// An INSERT row does not match the column set of the first row.
    #[error("Row {row} does not match the insert columns: {detail}")]
    RowShapeMismatch { row: usize, detail: String },

    /// The database client rejected the statement.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl WalkerError {
    /// Create a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField(field.into())
    }

    /// Create an unsupported condition shape error
    pub fn condition_shape(message: impl Into<String>) -> Self {
        Self::UnsupportedConditionShape(message.into())
    }

    /// Create an ambiguous operator error
    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::AmbiguousOperatorKey(message.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Check if this is a missing field error
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingRequiredField(_))
    }

    /// Check if this error came from the database client
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
