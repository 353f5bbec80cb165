//! Error types for chassis operations.

use olt_backend::BackendError;
use olt_types::{Clli, Coordinate, OntAddress, ParseError};
use thiserror::Error;

/// Result type alias for chassis operations.
pub type ChassisResult<T> = Result<T, ChassisError>;

/// Errors returned by the abstract and physical chassis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChassisError {
    /// The port allocator has handed out every port. Permanent.
    #[error("Abstract chassis out of ports")]
    OutOfPorts,

    /// A slot, port or ONT number is outside its bounds.
    #[error(transparent)]
    Validation(#[from] ParseError),

    /// A physical slot holds no line card.
    #[error("SlotNumber {slot_number} in Chassis {clli} is currently unprovisioned")]
    UnprovisionedSlot { clli: Clli, slot_number: u32 },

    /// Every line-card position of the physical chassis is occupied.
    #[error("Chassis {clli} has no free line-card slot")]
    ChassisFull { clli: Clli },

    /// A PON port number does not exist on the addressed line card.
    #[error("PON port {pon_port} not found on {olt_hostname}")]
    PonPortNotFound { olt_hostname: String, pon_port: u32 },

    /// The ONT is active and cannot be re-provisioned.
    #[error("ONT {address} is already active with serial {serial_number:?}")]
    OntInUse {
        address: OntAddress,
        serial_number: String,
    },

    /// The ONT slot holds no provisioned ONT.
    #[error("ONT {address} is not provisioned")]
    OntNotProvisioned { address: OntAddress },

    /// A serial number was bound to an ONT that was never pre-provisioned.
    #[error("ONT {address} must be pre-provisioned before a serial can be activated")]
    OntNotPreProvisioned { address: OntAddress },

    /// The serial number given for deletion does not match the ONT.
    #[error("ONT {address} serial mismatch: provisioned {expected:?}, requested {actual:?}")]
    SerialMismatch {
        address: OntAddress,
        expected: String,
        actual: String,
    },

    /// The backend refused or failed the request.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ChassisError {
    /// Returns the offending axis and value of a coordinate validation error.
    pub fn invalid_coordinate(&self) -> Option<(Coordinate, u32)> {
        match self {
            ChassisError::Validation(ParseError::InvalidCoordinate { coordinate, value }) => {
                Some((*coordinate, *value))
            }
            _ => None,
        }
    }

    /// Returns true if the request was rejected before reaching any state.
    pub fn is_validation(&self) -> bool {
        matches!(self, ChassisError::Validation(_))
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChassisError::Backend(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olt_backend::BackendStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unprovisioned_slot_message() {
        let err = ChassisError::UnprovisionedSlot {
            clli: Clli::new("STLSMO09DS0").unwrap(),
            slot_number: 5,
        };
        assert_eq!(
            err.to_string(),
            "SlotNumber 5 in Chassis STLSMO09DS0 is currently unprovisioned"
        );
    }

    #[test]
    fn test_invalid_coordinate_accessor() {
        let err: ChassisError = Coordinate::Slot.to_index(17).unwrap_err().into();
        assert!(err.is_validation());
        assert_eq!(err.invalid_coordinate(), Some((Coordinate::Slot, 17)));
        assert_eq!(err.to_string(), "invalid slot number 17 (must be 1-16)");

        assert_eq!(ChassisError::OutOfPorts.invalid_coordinate(), None);
    }

    #[test]
    fn test_backend_errors_pass_through() {
        let backend = BackendError::status("activate_ont", BackendStatus::Timeout);
        let err: ChassisError = backend.clone().into();
        assert_eq!(err.to_string(), backend.to_string());
        assert!(err.is_retryable());
        assert!(!ChassisError::OutOfPorts.is_retryable());
    }
}
