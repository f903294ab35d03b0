//! Application error types for SkinConsult
//!
//! Provides a unified error model across all commands with:
//! - Stable error codes for frontend handling
//! - User-friendly messages
//! - Optional internal details for logging
//! - Retry hints for UI

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories for grouping and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Input validation errors (missing fields, bad URLs)
    Validation,
    /// Network errors (connection, timeout, remote API)
    Network,
    /// File I/O errors (export writes)
    Io,
    /// Local database errors
    Database,
    /// Resource not found
    NotFound,
    /// Internal errors (unexpected state, bugs)
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Network => write!(f, "network"),
            Self::Io => write!(f, "io"),
            Self::Database => write!(f, "database"),
            Self::NotFound => write!(f, "not_found"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Stable error codes for frontend handling
/// Format: CATEGORY_SPECIFIC_ERROR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub String);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_REQUIRED_FIELD: &'static str = "VALIDATION_REQUIRED_FIELD";
    pub const VALIDATION_INPUT_TOO_LARGE: &'static str = "VALIDATION_INPUT_TOO_LARGE";
    pub const VALIDATION_INVALID_URL: &'static str = "VALIDATION_INVALID_URL";
    pub const VALIDATION_HTTPS_REQUIRED: &'static str = "VALIDATION_HTTPS_REQUIRED";

    // Network errors
    pub const NETWORK_CONNECTION_FAILED: &'static str = "NETWORK_CONNECTION_FAILED";
    pub const NETWORK_TIMEOUT: &'static str = "NETWORK_TIMEOUT";
    pub const NETWORK_RATE_LIMITED: &'static str = "NETWORK_RATE_LIMITED";
    pub const NETWORK_AUTH_FAILED: &'static str = "NETWORK_AUTH_FAILED";
    pub const NETWORK_NOT_CONFIGURED: &'static str = "NETWORK_NOT_CONFIGURED";

    // I/O errors
    pub const IO_WRITE_ERROR: &'static str = "IO_WRITE_ERROR";
    pub const IO_READ_ERROR: &'static str = "IO_READ_ERROR";

    // Database errors
    pub const DB_NOT_INITIALIZED: &'static str = "DB_NOT_INITIALIZED";
    pub const DB_QUERY_FAILED: &'static str = "DB_QUERY_FAILED";
    pub const DB_INTEGRITY_ERROR: &'static str = "DB_INTEGRITY_ERROR";

    // Not found errors
    pub const NOT_FOUND_RECORD: &'static str = "NOT_FOUND_RECORD";

    // Export errors
    pub const EXPORT_NO_RECORDS: &'static str = "EXPORT_NO_RECORDS";

    // Internal errors
    pub const INTERNAL_ERROR: &'static str = "INTERNAL_ERROR";
    pub const INTERNAL_LOCK_FAILED: &'static str = "INTERNAL_LOCK_FAILED";
    pub const SAVE_IN_PROGRESS: &'static str = "SAVE_IN_PROGRESS";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application error type for all commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppError {
    /// Stable error code for frontend handling
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional internal details for logging (not shown to user)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Error category for grouping
    pub category: ErrorCategory,
}

impl AppError {
    /// Create a new application error
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        category: ErrorCategory,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail: None,
            retryable: false,
            category,
        }
    }

    /// Add internal detail for logging
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Mark as retryable
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    // =========================================================================
    // Convenience constructors for common errors
    // =========================================================================

    /// Validation error: required field missing
    pub fn required_field(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::VALIDATION_REQUIRED_FIELD,
            message,
            ErrorCategory::Validation,
        )
    }

    /// Validation error: invalid URL
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::VALIDATION_INVALID_URL,
            message,
            ErrorCategory::Validation,
        )
    }

    /// Validation error: HTTPS required for remote connections
    pub fn https_required() -> Self {
        Self::new(
            ErrorCode::VALIDATION_HTTPS_REQUIRED,
            "HTTPS is required for remote connections",
            ErrorCategory::Validation,
        )
    }

    /// Database error: not initialized
    pub fn db_not_initialized() -> Self {
        Self::new(
            ErrorCode::DB_NOT_INITIALIZED,
            "Local store not initialized",
            ErrorCategory::Database,
        )
    }

    /// Database error: query failed
    pub fn db_query_failed(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DB_QUERY_FAILED,
            "Local store operation failed",
            ErrorCategory::Database,
        )
        .with_detail(detail)
    }

    /// Not found error: record
    pub fn record_not_found(id: i64) -> Self {
        Self::new(
            ErrorCode::NOT_FOUND_RECORD,
            format!("Record not found: {}", id),
            ErrorCategory::NotFound,
        )
    }

    /// Network error: connection failed
    pub fn connection_failed(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NETWORK_CONNECTION_FAILED,
            "Connection to remote table failed",
            ErrorCategory::Network,
        )
        .with_detail(detail)
        .retryable()
    }

    /// Export error: nothing to export
    pub fn export_no_records() -> Self {
        Self::new(
            ErrorCode::EXPORT_NO_RECORDS,
            "No records to export",
            ErrorCategory::Validation,
        )
    }

    /// A save is already in flight
    pub fn save_in_progress() -> Self {
        Self::new(
            ErrorCode::SAVE_IN_PROGRESS,
            "A save is already in progress",
            ErrorCategory::Internal,
        )
        .retryable()
    }

    /// Lock error
    pub fn lock_failed(what: &str) -> Self {
        Self::new(
            ErrorCode::INTERNAL_LOCK_FAILED,
            format!("Failed to acquire lock on {}", what),
            ErrorCategory::Internal,
        )
        .retryable()
    }

    /// Internal error
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::INTERNAL_ERROR,
            "An internal error occurred",
            ErrorCategory::Internal,
        )
        .with_detail(detail)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

// Convert from common error types
impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        Self::db_query_failed(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => Self::new(
                ErrorCode::IO_WRITE_ERROR,
                "Permission denied",
                ErrorCategory::Io,
            )
            .with_detail(e.to_string()),
            _ => Self::new(ErrorCode::IO_READ_ERROR, "I/O error", ErrorCategory::Io)
                .with_detail(e.to_string()),
        }
    }
}

impl From<crate::validation::ValidationError> for AppError {
    fn from(e: crate::validation::ValidationError) -> Self {
        use crate::validation::ValidationError;
        match e {
            ValidationError::RequiredField(_) => Self::required_field(e.to_string()),
            ValidationError::FieldTooLarge { .. } => Self::new(
                ErrorCode::VALIDATION_INPUT_TOO_LARGE,
                e.to_string(),
                ErrorCategory::Validation,
            ),
            ValidationError::InvalidUrl(msg) => Self::invalid_url(msg),
        }
    }
}

impl From<crate::store::StoreError> for AppError {
    fn from(e: crate::store::StoreError) -> Self {
        use crate::store::StoreError;
        match e {
            StoreError::Corruption => Self::new(
                ErrorCode::DB_INTEGRITY_ERROR,
                "Local store corruption detected",
                ErrorCategory::Database,
            ),
            other => Self::db_query_failed(other.to_string()),
        }
    }
}

impl From<crate::sync::SyncError> for AppError {
    fn from(e: crate::sync::SyncError) -> Self {
        use crate::sync::SyncError;
        match e {
            SyncError::AuthFailed => Self::new(
                ErrorCode::NETWORK_AUTH_FAILED,
                e.to_string(),
                ErrorCategory::Network,
            )
            .retryable(),
            SyncError::RateLimited => Self::new(
                ErrorCode::NETWORK_RATE_LIMITED,
                e.to_string(),
                ErrorCategory::Network,
            )
            .retryable(),
            SyncError::Timeout => Self::new(
                ErrorCode::NETWORK_TIMEOUT,
                e.to_string(),
                ErrorCategory::Network,
            )
            .retryable(),
            SyncError::NotConfigured => Self::new(
                ErrorCode::NETWORK_NOT_CONFIGURED,
                e.to_string(),
                ErrorCategory::Network,
            ),
            other => Self::connection_failed(other.to_string()),
        }
    }
}

impl From<crate::exports::ExportError> for AppError {
    fn from(e: crate::exports::ExportError) -> Self {
        use crate::exports::ExportError;
        match e {
            ExportError::NoRecords => Self::export_no_records(),
            ExportError::Io(io) => io.into(),
            other => Self::new(
                ErrorCode::IO_WRITE_ERROR,
                "Failed to write export file",
                ErrorCategory::Io,
            )
            .with_detail(other.to_string()),
        }
    }
}
