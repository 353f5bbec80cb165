//! Task processing status and result types.

use olt_chassis::ChassisError;
use thiserror::Error;

/// Result of processing a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Task completed successfully
    Success,
    /// Task failed due to invalid input or ONT state
    InvalidEntry,
    /// Task failed (generic)
    Failed,
    /// Task should be retried later
    NeedRetry,
}

impl TaskStatus {
    /// Returns true if the task completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    /// Returns true if the task should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskStatus::NeedRetry)
    }

    /// Returns true if the task failed permanently.
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::InvalidEntry | TaskStatus::Failed)
    }
}

/// Error type for task processing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The request can never succeed as written
    #[error("Invalid entry: {message}")]
    InvalidEntry { message: String },

    /// A transient backend failure
    #[error("Retry needed: {reason}")]
    NeedRetry { reason: String },

    /// Any other failure
    #[error("Failed: {message}")]
    Failed { message: String },
}

impl TaskError {
    pub fn invalid_entry(message: impl Into<String>) -> Self {
        TaskError::InvalidEntry {
            message: message.into(),
        }
    }

    pub fn need_retry(reason: impl Into<String>) -> Self {
        TaskError::NeedRetry {
            reason: reason.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        TaskError::Failed {
            message: message.into(),
        }
    }

    /// Converts this error to a TaskStatus.
    pub fn to_status(&self) -> TaskStatus {
        match self {
            TaskError::InvalidEntry { .. } => TaskStatus::InvalidEntry,
            TaskError::NeedRetry { .. } => TaskStatus::NeedRetry,
            TaskError::Failed { .. } => TaskStatus::Failed,
        }
    }
}

impl From<ChassisError> for TaskError {
    fn from(err: ChassisError) -> Self {
        match &err {
            ChassisError::Validation(_)
            | ChassisError::OntInUse { .. }
            | ChassisError::OntNotProvisioned { .. }
            | ChassisError::OntNotPreProvisioned { .. }
            | ChassisError::SerialMismatch { .. } => TaskError::invalid_entry(err.to_string()),
            _ if err.is_retryable() => TaskError::need_retry(err.to_string()),
            _ => TaskError::failed(err.to_string()),
        }
    }
}

/// Result type for task processing.
pub type TaskResult<T> = Result<T, TaskError>;

/// Extension trait for converting TaskResult to TaskStatus.
pub trait TaskResultExt {
    fn to_status(&self) -> TaskStatus;
}

impl<T> TaskResultExt for TaskResult<T> {
    fn to_status(&self) -> TaskStatus {
        match self {
            Ok(_) => TaskStatus::Success,
            Err(e) => e.to_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olt_backend::{BackendError, BackendStatus};
    use olt_types::{Clli, Coordinate, OntAddress, ParseError};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_status_classification() {
        assert!(TaskStatus::Success.is_success());
        assert!(!TaskStatus::Failed.is_success());

        assert!(TaskStatus::NeedRetry.is_retryable());
        assert!(!TaskStatus::Success.is_retryable());

        assert!(TaskStatus::Failed.is_failure());
        assert!(TaskStatus::InvalidEntry.is_failure());
        assert!(!TaskStatus::NeedRetry.is_failure());
    }

    #[test]
    fn test_chassis_error_classification() {
        let invalid = TaskError::from(ChassisError::Validation(ParseError::InvalidCoordinate {
            coordinate: Coordinate::Slot,
            value: 17,
        }));
        assert_eq!(
            invalid,
            TaskError::invalid_entry("invalid slot number 17 (must be 1-16)")
        );

        let in_use = TaskError::from(ChassisError::OntInUse {
            address: OntAddress::new(1, 1, 1),
            serial_number: "ABC123".to_string(),
        });
        assert_eq!(in_use.to_status(), TaskStatus::InvalidEntry);

        let timeout = TaskError::from(ChassisError::Backend(BackendError::status(
            "activate_ont",
            BackendStatus::Timeout,
        )));
        assert_eq!(timeout.to_status(), TaskStatus::NeedRetry);

        let rejected = TaskError::from(ChassisError::Backend(BackendError::status(
            "activate_ont",
            BackendStatus::Rejected,
        )));
        assert_eq!(rejected.to_status(), TaskStatus::Failed);

        let unprovisioned = TaskError::from(ChassisError::UnprovisionedSlot {
            clli: Clli::new("NYCMNY01").unwrap(),
            slot_number: 5,
        });
        assert_eq!(unprovisioned.to_status(), TaskStatus::Failed);
        assert_eq!(TaskError::from(ChassisError::OutOfPorts).to_status(), TaskStatus::Failed);
    }

    #[test]
    fn test_task_result_ext() {
        let ok: TaskResult<()> = Ok(());
        assert_eq!(ok.to_status(), TaskStatus::Success);

        let err: TaskResult<()> = Err(TaskError::need_retry("test"));
        assert_eq!(err.to_status(), TaskStatus::NeedRetry);
    }
}
