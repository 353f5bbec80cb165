//! Abstract OLT provisioning daemon.
//!
//! Reads a topology file, builds the abstract and physical chassis, binds
//! configured OLTs onto the abstract chassis and applies provisioning
//! requests through [`ProvisionOrch`](olt_orch::ProvisionOrch).

pub mod config;
pub mod daemon;

pub use config::{load_requests, ConfigError, OltMgrConfig};
pub use daemon::{dump_onts, run_until_idle, OntRecord};
