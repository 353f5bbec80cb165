//! Provisioning requests accepted by [`ProvisionOrch`](crate::ProvisionOrch).
//!
//! Requests are tagged by `op` so they read naturally from JSON or YAML:
//!
//! ```json
//! { "op": "activate", "slot": 1, "port": 1, "ont": 1, "serial_number": "ABC123" }
//! ```

use std::fmt;

use olt_chassis::{OntProfile, SubscriberInfo};
use olt_types::OntAddress;
use serde::{Deserialize, Serialize};

/// A northbound provisioning intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProvisionRequest {
    /// Reserve an ONT with tags and profiles, without activating it.
    PreProvision {
        slot: u32,
        port: u32,
        ont: u32,
        #[serde(default)]
        s_tag: u32,
        #[serde(default)]
        c_tag: u32,
        #[serde(default)]
        nas_port_id: String,
        #[serde(default)]
        circuit_id: String,
        #[serde(default)]
        tech_profile: String,
        #[serde(default)]
        speed_profile: String,
    },

    /// Bind a serial number to a pre-provisioned ONT and activate it.
    ActivateSerial {
        slot: u32,
        port: u32,
        ont: u32,
        serial_number: String,
    },

    /// Provision and activate an ONT with its subscriber attributes.
    ActivateFull {
        slot: u32,
        port: u32,
        ont: u32,
        serial_number: String,
        #[serde(default)]
        s_tag: u32,
        #[serde(default)]
        c_tag: u32,
        #[serde(default)]
        nas_port_id: String,
        #[serde(default)]
        circuit_id: String,
    },

    /// Provision and activate an ONT knowing only its serial number.
    Activate {
        slot: u32,
        port: u32,
        ont: u32,
        serial_number: String,
    },

    /// Deactivate and remove an ONT.
    Delete {
        slot: u32,
        port: u32,
        ont: u32,
        serial_number: String,
    },

    /// Activate the line card in a physical chassis slot.
    ActivateSlot { slot: u32 },

    /// Push an ONT record to a PON port of a physical line card.
    ProvisionPhysical {
        slot: u32,
        pon_port: u32,
        ont: u32,
        serial_number: String,
        #[serde(default)]
        s_vlan: u32,
        #[serde(default)]
        c_vlan: u32,
    },
}

impl ProvisionRequest {
    /// Returns the operation name as written in request files.
    pub fn op_name(&self) -> &'static str {
        match self {
            ProvisionRequest::PreProvision { .. } => "pre_provision",
            ProvisionRequest::ActivateSerial { .. } => "activate_serial",
            ProvisionRequest::ActivateFull { .. } => "activate_full",
            ProvisionRequest::Activate { .. } => "activate",
            ProvisionRequest::Delete { .. } => "delete",
            ProvisionRequest::ActivateSlot { .. } => "activate_slot",
            ProvisionRequest::ProvisionPhysical { .. } => "provision_physical",
        }
    }

    /// Abstract chassis address of ONT requests.
    pub fn address(&self) -> Option<OntAddress> {
        match *self {
            ProvisionRequest::PreProvision { slot, port, ont, .. }
            | ProvisionRequest::ActivateSerial { slot, port, ont, .. }
            | ProvisionRequest::ActivateFull { slot, port, ont, .. }
            | ProvisionRequest::Activate { slot, port, ont, .. }
            | ProvisionRequest::Delete { slot, port, ont, .. } => {
                Some(OntAddress::new(slot, port, ont))
            }
            ProvisionRequest::ActivateSlot { .. } | ProvisionRequest::ProvisionPhysical { .. } => {
                None
            }
        }
    }

    /// Consumer key: requests sharing a key are applied in order.
    ///
    /// Abstract ONT requests use `slot|port|ont`, slot activation uses the
    /// slot number and physical ONT records use `olt<slot>|pon<port>|ont`.
    pub fn key(&self) -> String {
        match self {
            ProvisionRequest::ActivateSlot { slot } => slot.to_string(),
            ProvisionRequest::ProvisionPhysical {
                slot, pon_port, ont, ..
            } => format!("olt{slot}|pon{pon_port}|{ont}"),
            _ => self
                .address()
                .map(|address| address.to_string())
                .unwrap_or_default(),
        }
    }

    /// Profile carried by a pre-provisioning request.
    pub fn profile(&self) -> Option<OntProfile> {
        match self {
            ProvisionRequest::PreProvision {
                s_tag,
                c_tag,
                nas_port_id,
                circuit_id,
                tech_profile,
                speed_profile,
                ..
            } => Some(
                OntProfile::new(
                    SubscriberInfo::new(*s_tag, *c_tag)
                        .with_nas_port_id(nas_port_id.as_str())
                        .with_circuit_id(circuit_id.as_str()),
                )
                .with_tech_profile(tech_profile.as_str())
                .with_speed_profile(speed_profile.as_str()),
            ),
            _ => None,
        }
    }

    /// Subscriber attributes carried by a full activation.
    pub fn subscriber(&self) -> Option<SubscriberInfo> {
        match self {
            ProvisionRequest::ActivateFull {
                s_tag,
                c_tag,
                nas_port_id,
                circuit_id,
                ..
            } => Some(
                SubscriberInfo::new(*s_tag, *c_tag)
                    .with_nas_port_id(nas_port_id.as_str())
                    .with_circuit_id(circuit_id.as_str()),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for ProvisionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op_name(), self.key())
    }
}
