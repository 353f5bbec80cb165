//! Verification helpers for chassis state and backend traffic

use olt_backend::{BackendOp, RecordingBackend};
use olt_chassis::{Ont, Topology};
use olt_types::OntAddress;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("ONT {0} does not exist")]
    NoSuchOnt(OntAddress),

    #[error("ONT {address}: expected {expected}, found {actual}")]
    Mismatch {
        address: OntAddress,
        expected: String,
        actual: String,
    },

    #[error("backend {op}: expected {expected} call(s), found {actual}")]
    CallCount {
        op: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type VerificationResult = Result<(), VerificationError>;

/// Assertions over the abstract chassis of a topology.
pub struct OntVerifier<'a> {
    topology: &'a Topology,
}

impl<'a> OntVerifier<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    fn ont(&self, address: OntAddress) -> Result<&'a Ont, VerificationError> {
        self.topology
            .abstract_chassis()
            .ont(address)
            .ok_or(VerificationError::NoSuchOnt(address))
    }

    /// The ONT is active with the given serial number.
    pub fn assert_active(&self, address: OntAddress, serial_number: &str) -> VerificationResult {
        let ont = self.ont(address)?;
        if !ont.active || ont.serial_number != serial_number {
            return Err(VerificationError::Mismatch {
                address,
                expected: format!("active with serial {serial_number:?}"),
                actual: describe(ont),
            });
        }
        Ok(())
    }

    /// The ONT is reserved but not active.
    pub fn assert_pre_provisioned(&self, address: OntAddress) -> VerificationResult {
        let ont = self.ont(address)?;
        if !ont.is_pre_provisioned() {
            return Err(VerificationError::Mismatch {
                address,
                expected: "pre-provisioned".to_string(),
                actual: describe(ont),
            });
        }
        Ok(())
    }

    /// The ONT slot is unused.
    pub fn assert_empty(&self, address: OntAddress) -> VerificationResult {
        let ont = self.ont(address)?;
        if ont.is_provisioned() {
            return Err(VerificationError::Mismatch {
                address,
                expected: "empty".to_string(),
                actual: describe(ont),
            });
        }
        Ok(())
    }

    /// Number of provisioned ONTs across the abstract chassis.
    pub fn provisioned_count(&self) -> usize {
        self.topology
            .abstract_chassis()
            .ports()
            .map(|port| port.provisioned_onts().count())
            .sum()
    }
}

fn describe(ont: &Ont) -> String {
    if !ont.is_provisioned() {
        "empty".to_string()
    } else if ont.active {
        format!("active with serial {:?}", ont.serial_number)
    } else {
        "pre-provisioned".to_string()
    }
}

/// Asserts how many times the backend saw `op`.
pub fn assert_call_count(
    backend: &RecordingBackend,
    op: BackendOp,
    expected: usize,
) -> VerificationResult {
    let actual = backend.count(op);
    if actual != expected {
        return Err(VerificationError::CallCount {
            op: op.as_str(),
            expected,
            actual,
        });
    }
    Ok(())
}
