//! Error types for cadastre
//!
//! Each error type has a corresponding error code for programmatic handling.

use thiserror::Error;

/// Result type alias for cadastre operations
pub type Result<T> = std::result::Result<T, CadastreError>;

/// Main error type for all cadastre operations
#[derive(Debug, Error)]
pub enum CadastreError {
    /// No .cadastre data directory found
    #[error("Data store not found: {0}")]
    StoreNotFound(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Schema validation failed
    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A record looked up by id or code does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Login failed. Unknown email and wrong password are deliberately indistinguishable.
    #[error("Incorrect email or password")]
    AuthenticationFailed,

    /// No session is active
    #[error("Not logged in")]
    Unauthenticated,

    /// The session's role may not perform the requested action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input rejected before any state change
    #[error("Validation error: {0}")]
    Validation(String),

    /// Workflow state transition error
    #[error("State transition error: {0}")]
    StateTransition(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl CadastreError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CadastreError::StoreNotFound(_) => "STORE_NOT_FOUND",
            CadastreError::InvalidJson(_) => "INVALID_JSON",
            CadastreError::SchemaValidation(_) => "SCHEMA_VALIDATION",
            CadastreError::FileNotFound(_) => "FILE_NOT_FOUND",
            CadastreError::ConfigError(_) => "CONFIG_ERROR",
            CadastreError::NotFound { .. } => "NOT_FOUND",
            CadastreError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            CadastreError::Unauthenticated => "UNAUTHENTICATED",
            CadastreError::Forbidden(_) => "FORBIDDEN",
            CadastreError::Validation(_) => "VALIDATION",
            CadastreError::StateTransition(_) => "STATE_TRANSITION",
            CadastreError::Io(_) => "IO_ERROR",
            CadastreError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// Shorthand for a `NotFound` error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CadastreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        CadastreError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

/// Convert an error to an appropriate exit code (sysexits.h values where one fits)
pub fn to_exit_code(error: &CadastreError) -> i32 {
    match error {
        CadastreError::NotFound { .. } => 66,
        CadastreError::AuthenticationFailed
        | CadastreError::Unauthenticated
        | CadastreError::Forbidden(_) => 77,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CadastreError::StoreNotFound("x".into()).code(), "STORE_NOT_FOUND");
        assert_eq!(CadastreError::InvalidJson("x".into()).code(), "INVALID_JSON");
        assert_eq!(CadastreError::not_found("Permit", "PM-1").code(), "NOT_FOUND");
        assert_eq!(CadastreError::AuthenticationFailed.code(), "AUTHENTICATION_FAILED");
        assert_eq!(CadastreError::Unauthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(CadastreError::Forbidden("x".into()).code(), "FORBIDDEN");
        assert_eq!(CadastreError::Validation("x".into()).code(), "VALIDATION");
        assert_eq!(CadastreError::StateTransition("x".into()).code(), "STATE_TRANSITION");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(to_exit_code(&CadastreError::not_found("Procedure", "PR-2025-001")), 66);
        assert_eq!(to_exit_code(&CadastreError::Forbidden("decide".into())), 77);
        assert_eq!(to_exit_code(&CadastreError::AuthenticationFailed), 77);
        assert_eq!(to_exit_code(&CadastreError::Validation("x".into())), 1);
    }

    #[test]
    fn test_not_found_message() {
        let err = CadastreError::not_found("Permit", "PM-2025-999");
        assert_eq!(err.to_string(), "Permit not found: PM-2025-999");
    }

    #[test]
    fn test_authentication_message_is_generic() {
        assert_eq!(
            CadastreError::AuthenticationFailed.to_string(),
            "Incorrect email or password"
        );
    }

    #[test]
    fn test_wrap_error() {
        let wrapped = CadastreError::wrap("inner error", "outer context");
        assert_eq!(wrapped.code(), "WRAPPED_ERROR");
        assert!(wrapped.to_string().contains("outer context"));
        assert!(wrapped.to_string().contains("inner error"));
    }
}
