//! Provisioning orchestration for the abstract OLT.
//!
//! This crate drives the chassis model from queued northbound requests:
//!
//! - [`Orch`]: base trait for orchestration agents
//! - [`Consumer`]: per-key FIFO queue of pending requests with retry
//! - [`ProvisionRequest`]: serde-readable provisioning intents
//! - [`ProvisionOrch`]: applies requests to a [`Topology`] and classifies
//!   the outcome as a [`TaskStatus`]
//!
//! # Example
//!
//! ```ignore
//! use olt_orch::{Orch, ProvisionOrch, ProvisionRequest};
//!
//! let mut orch = ProvisionOrch::new(topology, ProvisionOrchConfig::default());
//! orch.add_requests(requests);
//! while orch.has_pending_tasks() {
//!     orch.do_task().await;
//! }
//! ```
//!
//! [`Topology`]: olt_chassis::Topology

mod consumer;
mod orch;
mod provision_orch;
mod request;
mod task;

pub use consumer::{Consumer, ConsumerConfig, Task};
pub use orch::Orch;
pub use provision_orch::{ProvisionOrch, ProvisionOrchConfig, ProvisionOrchStats};
pub use request::ProvisionRequest;
pub use task::{TaskError, TaskResult, TaskResultExt, TaskStatus};
