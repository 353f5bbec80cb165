//! Backend that records every call and can be told to fail.
//!
//! This stands in for real equipment in tests: it keeps the ordered list of
//! calls it received and returns injected statuses for selected operations.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Mutex, MutexGuard};

use olt_types::Clli;

use crate::api::{
    OntDeleteRequest, OntProvisionRequest, PhysicalOntRequest, ProvisioningBackend,
};
use crate::error::{BackendResult, BackendStatus};

/// Backend operation kinds, used to target failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    AddOlt,
    ActivateOlt,
    PreProvisionOnt,
    ActivateOnt,
    DeleteOnt,
    ProvisionPhysicalOnt,
}

impl BackendOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendOp::AddOlt => "add_olt",
            BackendOp::ActivateOlt => "activate_olt",
            BackendOp::PreProvisionOnt => "pre_provision_ont",
            BackendOp::ActivateOnt => "activate_ont",
            BackendOp::DeleteOnt => "delete_ont",
            BackendOp::ProvisionPhysicalOnt => "provision_physical_ont",
        }
    }
}

/// A call received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    AddOlt {
        clli: Clli,
        hostname: String,
        address: SocketAddr,
    },
    ActivateOlt {
        hostname: String,
    },
    PreProvisionOnt(OntProvisionRequest),
    ActivateOnt(OntProvisionRequest),
    DeleteOnt(OntDeleteRequest),
    ProvisionPhysicalOnt(PhysicalOntRequest),
}

impl BackendCall {
    pub fn op(&self) -> BackendOp {
        match self {
            BackendCall::AddOlt { .. } => BackendOp::AddOlt,
            BackendCall::ActivateOlt { .. } => BackendOp::ActivateOlt,
            BackendCall::PreProvisionOnt(_) => BackendOp::PreProvisionOnt,
            BackendCall::ActivateOnt(_) => BackendOp::ActivateOnt,
            BackendCall::DeleteOnt(_) => BackendOp::DeleteOnt,
            BackendCall::ProvisionPhysicalOnt(_) => BackendOp::ProvisionPhysicalOnt,
        }
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<BackendCall>,
    one_shot: HashMap<BackendOp, VecDeque<BackendStatus>>,
    persistent: HashMap<BackendOp, BackendStatus>,
}

/// Test double recording calls and injecting failures.
///
/// Failed calls are recorded too, so tests can assert that a request reached
/// the backend even when it was refused.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    state: Mutex<RecordingState>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        // A panicking test thread must not hide the calls recorded so far.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes the next call of `op` fail with `status`.
    pub fn fail_next(&self, op: BackendOp, status: BackendStatus) {
        self.state().one_shot.entry(op).or_default().push_back(status);
    }

    /// Makes every call of `op` fail with `status` until [`Self::clear_failures`].
    pub fn fail_always(&self, op: BackendOp, status: BackendStatus) {
        self.state().persistent.insert(op, status);
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.one_shot.clear();
        state.persistent.clear();
    }

    /// Returns a copy of every call received, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    /// Returns the number of calls of `op` received.
    pub fn count(&self, op: BackendOp) -> usize {
        self.state().calls.iter().filter(|c| c.op() == op).count()
    }

    fn record(&self, call: BackendCall) -> BackendResult<()> {
        let op = call.op();
        let mut state = self.state();
        state.calls.push(call);

        let one_shot = state.one_shot.get_mut(&op).and_then(|queue| queue.pop_front());
        let injected = one_shot.or_else(|| state.persistent.get(&op).copied());

        injected
            .unwrap_or(BackendStatus::Success)
            .into_result(op.as_str())
    }
}

impl ProvisioningBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn add_olt(&self, clli: &Clli, hostname: &str, address: SocketAddr) -> BackendResult<()> {
        self.record(BackendCall::AddOlt {
            clli: clli.clone(),
            hostname: hostname.to_string(),
            address,
        })
    }

    fn activate_olt(&self, hostname: &str) -> BackendResult<()> {
        self.record(BackendCall::ActivateOlt {
            hostname: hostname.to_string(),
        })
    }

    fn pre_provision_ont(&self, request: &OntProvisionRequest) -> BackendResult<()> {
        self.record(BackendCall::PreProvisionOnt(request.clone()))
    }

    fn activate_ont(&self, request: &OntProvisionRequest) -> BackendResult<()> {
        self.record(BackendCall::ActivateOnt(request.clone()))
    }

    fn delete_ont(&self, request: &OntDeleteRequest) -> BackendResult<()> {
        self.record(BackendCall::DeleteOnt(request.clone()))
    }

    fn provision_physical_ont(&self, request: &PhysicalOntRequest) -> BackendResult<()> {
        self.record(BackendCall::ProvisionPhysicalOnt(request.clone()))
    }
}
