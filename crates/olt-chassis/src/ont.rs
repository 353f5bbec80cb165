//! ONT record shared by the abstract and physical models.
//!
//! The serialized form keeps the field names northbound consumers already
//! know (`Svlan`, `SerialNumber`, `NasPortID`, ...) and omits every field
//! that is empty, zero or false. The owner back-reference is never
//! serialized.

use olt_backend::PonPortRef;
use serde::{Deserialize, Serialize};

/// Where an ONT record lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OntOwner {
    /// Port of the abstract chassis (0-based indices).
    Abstract { slot: usize, port: usize },
    /// PON port of a real OLT.
    Pon(PonPortRef),
}

/// A single ONT/ONU connected through a splitter to a port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ont {
    /// 1-based ONT number; 0 while the slot is unused.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub number: u32,

    /// Outer (service) VLAN tag.
    #[serde(rename = "Svlan", default, skip_serializing_if = "is_zero")]
    pub s_tag: u32,

    /// Inner (customer) VLAN tag.
    #[serde(rename = "Cvlan", default, skip_serializing_if = "is_zero")]
    pub c_tag: u32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub serial_number: String,

    #[serde(skip)]
    pub owner: Option<OntOwner>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub active: bool,

    #[serde(rename = "NasPortID", default, skip_serializing_if = "String::is_empty")]
    pub nas_port_id: String,

    #[serde(rename = "CircuitID", default, skip_serializing_if = "String::is_empty")]
    pub circuit_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tech_profile: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub speed_profile: String,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Ont {
    /// Creates an unused ONT slot belonging to `owner`.
    pub fn empty(owner: OntOwner) -> Self {
        Self {
            owner: Some(owner),
            ..Default::default()
        }
    }

    /// Returns true once the slot holds a pre-provisioned or active ONT.
    pub fn is_provisioned(&self) -> bool {
        self.number != 0
    }

    /// Returns true if the ONT is pre-provisioned but not yet active.
    pub fn is_pre_provisioned(&self) -> bool {
        self.is_provisioned() && !self.active
    }

    /// Clears every attribute, keeping only the owner.
    pub fn reset(&mut self) {
        let owner = self.owner.take();
        *self = Self {
            owner,
            ..Default::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_ont_serializes_to_empty_object() {
        let ont = Ont::empty(OntOwner::Abstract { slot: 0, port: 0 });
        assert_eq!(serde_json::to_string(&ont).unwrap(), "{}");
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let ont = Ont {
            number: 3,
            s_tag: 100,
            serial_number: "ALPHe3d1cfde".to_string(),
            active: true,
            nas_port_id: "PON 1/1/3/1".to_string(),
            owner: Some(OntOwner::Pon(PonPortRef::new("olt1", 1))),
            ..Default::default()
        };

        let json = serde_json::to_value(&ont).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Number": 3,
                "Svlan": 100,
                "SerialNumber": "ALPHe3d1cfde",
                "Active": true,
                "NasPortID": "PON 1/1/3/1",
            })
        );
    }

    #[test]
    fn test_deserialize_missing_fields_default() {
        let ont: Ont = serde_json::from_str(r#"{"Number":7,"Cvlan":42}"#).unwrap();
        assert_eq!(ont.number, 7);
        assert_eq!(ont.c_tag, 42);
        assert!(!ont.active);
        assert!(ont.owner.is_none());
        assert!(ont.is_pre_provisioned());
    }

    #[test]
    fn test_reset_keeps_owner() {
        let owner = OntOwner::Abstract { slot: 1, port: 2 };
        let mut ont = Ont {
            number: 1,
            serial_number: "ABC123".to_string(),
            active: true,
            owner: Some(owner.clone()),
            ..Default::default()
        };

        ont.reset();
        assert_eq!(ont, Ont::empty(owner));
        assert!(!ont.is_provisioned());
    }
}
