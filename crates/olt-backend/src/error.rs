//! Backend status codes and error handling.
//!
//! Backends report failures as a [`BackendStatus`]; the chassis model passes
//! the resulting [`BackendError`] through to its caller unchanged.

use std::fmt;
use thiserror::Error;

/// Status codes a provisioning backend may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendStatus {
    Success,
    Failure,
    Timeout,
    Unavailable,
    Rejected,
    NotFound,
    AlreadyExists,
    InvalidParameter,
}

impl BackendStatus {
    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == BackendStatus::Success
    }

    /// Returns true if the same request may succeed when sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendStatus::Timeout | BackendStatus::Unavailable)
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self, operation: &str) -> BackendResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(BackendError::status(operation, self))
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendStatus::Success => "SUCCESS",
            BackendStatus::Failure => "FAILURE",
            BackendStatus::Timeout => "TIMEOUT",
            BackendStatus::Unavailable => "UNAVAILABLE",
            BackendStatus::Rejected => "REJECTED",
            BackendStatus::NotFound => "NOT_FOUND",
            BackendStatus::AlreadyExists => "ALREADY_EXISTS",
            BackendStatus::InvalidParameter => "INVALID_PARAMETER",
        };
        write!(f, "{}", s)
    }
}

/// Error type for backend operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("backend {operation} failed: {status}")]
    Status {
        operation: String,
        status: BackendStatus,
    },

    /// The hostname could not be resolved to an address.
    #[error("cannot resolve hostname {hostname}")]
    Resolve { hostname: String },
}

impl BackendError {
    /// Creates a status error.
    pub fn status(operation: impl Into<String>, status: BackendStatus) -> Self {
        BackendError::Status {
            operation: operation.into(),
            status,
        }
    }

    /// Creates a resolution error.
    pub fn resolve(hostname: impl Into<String>) -> Self {
        BackendError::Resolve {
            hostname: hostname.into(),
        }
    }

    /// Returns the backend status, if the error carries one.
    pub fn backend_status(&self) -> Option<BackendStatus> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error indicates a transient condition.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Status { status, .. } => status.is_retryable(),
            BackendError::Resolve { .. } => false,
        }
    }
}

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_into_result() {
        assert!(BackendStatus::Success.into_result("activate_ont").is_ok());

        let err = BackendStatus::Rejected.into_result("activate_ont").unwrap_err();
        assert_eq!(err.backend_status(), Some(BackendStatus::Rejected));
        assert_eq!(err.to_string(), "backend activate_ont failed: REJECTED");
    }

    #[test]
    fn test_is_retryable() {
        assert!(BackendError::status("x", BackendStatus::Timeout).is_retryable());
        assert!(BackendError::status("x", BackendStatus::Unavailable).is_retryable());

        assert!(!BackendError::status("x", BackendStatus::Rejected).is_retryable());
        assert!(!BackendError::resolve("olt1").is_retryable());
    }
}
