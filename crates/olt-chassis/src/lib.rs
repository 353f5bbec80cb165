//! Abstract and physical OLT chassis model.
//!
//! The abstract chassis presents up to 256 PON ports spread over many real
//! OLT chassis as a single 16-slot, 16-port virtual chassis. Northbound
//! provisioning calls address ONTs by 1-based `(slot, port, ont)` numbers;
//! the chassis validates them, stages the new ONT state on the addressed
//! port and forwards the request to a [`ProvisioningBackend`] before
//! committing it.
//!
//! # Architecture
//!
//! ```text
//!   northbound request (slot, port, ont)
//!          │
//!          ▼
//!   AbstractChassis ──validate──> Slot[16] ──> Port[16] ──> Ont[64]
//!          │                                     │
//!          │ next_port()                         └──> ProvisioningBackend
//!          ▼
//!     Topology ──add_olt()──> PhysicalChassis ──> Olt (line card) ──> PonPort
//! ```
//!
//! - [`AbstractChassis`]: port allocator and provisioning dispatcher
//! - [`PhysicalChassis`]: real line cards, slot activation
//! - [`Topology`]: binds physical PON ports to allocated abstract ports
//!
//! [`ProvisioningBackend`]: olt_backend::ProvisioningBackend

pub mod abstract_chassis;
pub mod error;
pub mod ont;
pub mod physical;
pub mod topology;

pub use abstract_chassis::{
    AbstractChassis, OntProfile, Port, PortAllocationInfo, Slot, SubscriberInfo,
};
pub use error::{ChassisError, ChassisResult};
pub use ont::{Ont, OntOwner};
pub use physical::{DataSwitch, Olt, PhysicalChassis, PonPort, SimpleOlt};
pub use topology::Topology;
