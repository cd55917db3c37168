//! Error types for the coaching core.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Field-level input errors. Always recoverable: the caller can fix the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

/// Data store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transient backend failure; safe to retry.
    #[error("Database unavailable during {operation}: {reason}")]
    Unavailable { operation: String, reason: String },

    /// Persisted record failed structural checks. Never retried.
    #[error("Data integrity violation in {record}: {reason}")]
    Integrity { record: String, reason: String },

    #[error("Rejected write: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Whether the operation may succeed if attempted again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Session lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session expired, was ended, or never existed.
    #[error("Session {session_id} is no longer active")]
    Timeout { session_id: String },

    #[error("Session {session_id} is already active")]
    AlreadyActive { session_id: String },
}

/// Result type alias for the coaching core.
pub type Result<T> = std::result::Result<T, Error>;
