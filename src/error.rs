//! Error handling module for planboard
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library operations return these types; the binary wraps them in `anyhow`.

use thiserror::Error;

/// Main error type for planboard
#[derive(Error, Debug)]
pub enum PlanboardError {
    /// IO errors (storage files, terminal, exports)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog errors (malformed entries, duplicate ids)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Validation errors (unknown scene or subset, bad user input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Durable storage errors (unavailable, write refused)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Layout export errors
    #[error("Export error: {0}")]
    Export(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for planboard operations
pub type Result<T> = std::result::Result<T, PlanboardError>;

// Convenient error constructors
impl PlanboardError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create an export error
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanboardError::validation("unknown subset 'z'");
        assert_eq!(err.to_string(), "Validation error: unknown subset 'z'");

        let err = PlanboardError::storage("quota exceeded");
        assert_eq!(err.to_string(), "Storage error: quota exceeded");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlanboardError = io_err.into();
        assert!(matches!(err, PlanboardError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: PlanboardError = json_err.into();
        assert!(matches!(err, PlanboardError::Json(_)));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(PlanboardError::catalog("x"), PlanboardError::Catalog(_)));
        assert!(matches!(PlanboardError::export("x"), PlanboardError::Export(_)));
        assert!(matches!(PlanboardError::config("x"), PlanboardError::Config(_)));
        assert!(matches!(PlanboardError::terminal("x"), PlanboardError::Terminal(_)));
    }
}
