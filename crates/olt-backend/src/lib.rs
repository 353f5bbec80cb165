//! Backend provisioning API abstraction.
//!
//! The abstract chassis never talks to real OLT hardware itself. Every
//! provisioning, activation and deletion it accepts is forwarded to a
//! [`ProvisioningBackend`], and real chassis are located through a
//! [`HostResolver`]. This crate defines those seams plus the request
//! records that cross them.
//!
//! - [`api`]: the backend trait and request types
//! - [`error`]: backend status codes and error types
//! - [`logging`]: a backend that only logs what it would have done
//! - [`recording`]: a backend that records calls and injects failures
//! - [`resolver`]: hostname to address resolution
//!
//! # Example
//!
//! ```
//! use olt_backend::{LoggingBackend, ProvisioningBackend};
//!
//! let backend = LoggingBackend::new();
//! assert!(backend.activate_olt("olt1.lab").is_ok());
//! ```

pub mod api;
pub mod error;
pub mod logging;
pub mod recording;
pub mod resolver;

pub use api::{
    OntDeleteRequest, OntProvisionRequest, PhysicalOntRequest, PonPortRef, ProvisioningBackend,
};
pub use error::{BackendError, BackendResult, BackendStatus};
pub use logging::LoggingBackend;
pub use recording::{BackendCall, BackendOp, RecordingBackend};
pub use resolver::{HostResolver, StaticResolver};
