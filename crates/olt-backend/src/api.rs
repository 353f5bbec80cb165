//! Backend provisioning API.
//!
//! [`ProvisioningBackend`] is the capability the chassis model delegates to
//! once a request has passed validation. Methods take `&self`; backends that
//! keep state use interior mutability so a single instance can be shared
//! between the abstract and physical chassis.

use std::fmt::Debug;
use std::net::SocketAddr;

use olt_types::{Clli, OntAddress};
use serde::{Deserialize, Serialize};

use crate::error::BackendResult;

/// Reference to a PON port on a real OLT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PonPortRef {
    /// Hostname of the OLT carrying the port.
    pub olt_hostname: String,
    /// 1-based PON port number on that OLT.
    pub pon_port: u32,
}

impl PonPortRef {
    pub fn new(olt_hostname: impl Into<String>, pon_port: u32) -> Self {
        Self {
            olt_hostname: olt_hostname.into(),
            pon_port,
        }
    }
}

/// Provisioning or activation of an ONT on the abstract chassis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntProvisionRequest {
    /// Abstract chassis address of the ONT.
    pub address: OntAddress,
    /// Physical port the abstract port is bound to, if any.
    pub pon_port: Option<PonPortRef>,
    pub serial_number: String,
    pub s_tag: u32,
    pub c_tag: u32,
    pub nas_port_id: String,
    pub circuit_id: String,
    pub tech_profile: String,
    pub speed_profile: String,
}

/// Removal of an ONT from the abstract chassis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntDeleteRequest {
    pub address: OntAddress,
    pub pon_port: Option<PonPortRef>,
    pub serial_number: String,
}

/// Provisioning of an ONT record held by the physical chassis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalOntRequest {
    pub clli: Clli,
    /// PON port the ONT hangs off.
    pub pon_port: PonPortRef,
    /// 1-based ONT number on that PON port.
    pub ont: u32,
    pub serial_number: String,
    pub s_vlan: u32,
    pub c_vlan: u32,
}

/// Capability for forwarding provisioning intents to real equipment.
pub trait ProvisioningBackend: Debug + Send + Sync {
    /// Returns the backend name (for logging).
    fn name(&self) -> &str;

    /// Registers a new OLT chassis with the backend.
    fn add_olt(&self, clli: &Clli, hostname: &str, address: SocketAddr) -> BackendResult<()>;

    /// Activates the OLT occupying a physical chassis slot.
    fn activate_olt(&self, hostname: &str) -> BackendResult<()>;

    /// Reserves an ONT with its tags and profiles, without activating it.
    fn pre_provision_ont(&self, request: &OntProvisionRequest) -> BackendResult<()>;

    /// Provisions (if needed) and activates an ONT.
    fn activate_ont(&self, request: &OntProvisionRequest) -> BackendResult<()>;

    /// Deactivates and removes an ONT.
    fn delete_ont(&self, request: &OntDeleteRequest) -> BackendResult<()>;

    /// Pushes S/C VLANs and serial number of a physical ONT record.
    fn provision_physical_ont(&self, request: &PhysicalOntRequest) -> BackendResult<()>;
}

