//! Error handling module.
//!
//! Library operations return [`AppError`]; the generator itself only ever fails
//! at construction time with a [`ConfigurationError`].

/// Invalid generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid generator configuration: {0}")]
pub struct ConfigurationError(pub String);

impl ConfigurationError {
    /// Create a configuration error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A field failed validation before persistence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed for `{field}`: {message}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every save attempt collided with an existing store code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to save {entity} instance after {attempts} tries")]
pub struct SaveFailedError {
    /// Entity type that could not be saved.
    pub entity: &'static str,
    /// Number of attempts made.
    pub attempts: u32,
}

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Generator configuration is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Application configuration could not be loaded.
    #[error("Configuration load failed: {0}")]
    Config(#[from] config::ConfigError),

    /// An entity or store code failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Retries exhausted while saving.
    #[error(transparent)]
    SaveFailed(#[from] SaveFailedError),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Storage-specific error type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A record with the same key already exists.
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed.
    #[error("Failed to acquire lock: {0}")]
    LockFailed(String),

    /// File I/O error.
    #[error("File I/O error: {0}")]
    FileIO(String),

    /// Data not found.
    #[error("Data not found: {0}")]
    NotFound(String),

    /// Backend not available.
    #[error("Storage backend unavailable")]
    Unavailable,
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::FileIO(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias using `StorageError`.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
