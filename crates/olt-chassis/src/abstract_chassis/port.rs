//! Abstract port and its ONT state transitions.
//!
//! Every transition follows the same shape: check the current ONT state,
//! build the staged record, forward it to the backend, and only then store
//! it. A backend failure therefore leaves the port untouched.

use olt_backend::{OntDeleteRequest, OntProvisionRequest, PonPortRef, ProvisioningBackend};
use olt_types::{Coordinate, OntAddress, MAX_ONTS};
use tracing::{debug, info};

use crate::error::{ChassisError, ChassisResult};
use crate::ont::{Ont, OntOwner};

/// Subscriber attributes carried by a full activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberInfo {
    pub s_tag: u32,
    pub c_tag: u32,
    pub nas_port_id: String,
    pub circuit_id: String,
}

impl SubscriberInfo {
    pub fn new(s_tag: u32, c_tag: u32) -> Self {
        Self {
            s_tag,
            c_tag,
            ..Default::default()
        }
    }

    pub fn with_nas_port_id(mut self, nas_port_id: impl Into<String>) -> Self {
        self.nas_port_id = nas_port_id.into();
        self
    }

    pub fn with_circuit_id(mut self, circuit_id: impl Into<String>) -> Self {
        self.circuit_id = circuit_id.into();
        self
    }
}

/// Everything a pre-provisioning reserves: subscriber tags plus profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OntProfile {
    pub subscriber: SubscriberInfo,
    pub tech_profile: String,
    pub speed_profile: String,
}

impl OntProfile {
    pub fn new(subscriber: SubscriberInfo) -> Self {
        Self {
            subscriber,
            ..Default::default()
        }
    }

    pub fn with_tech_profile(mut self, tech_profile: impl Into<String>) -> Self {
        self.tech_profile = tech_profile.into();
        self
    }

    pub fn with_speed_profile(mut self, speed_profile: impl Into<String>) -> Self {
        self.speed_profile = speed_profile.into();
        self
    }
}

/// A port of the abstract chassis with room for 64 ONTs.
#[derive(Debug, Clone)]
pub struct Port {
    slot_index: usize,
    index: usize,
    onts: Vec<Ont>,
    pon_port: Option<PonPortRef>,
}

impl Port {
    pub(crate) fn new(slot_index: usize, index: usize) -> Self {
        let owner = OntOwner::Abstract {
            slot: slot_index,
            port: index,
        };
        Self {
            slot_index,
            index,
            onts: vec![Ont::empty(owner); MAX_ONTS],
            pon_port: None,
        }
    }

    /// 0-based index of the owning slot.
    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    /// 0-based port index within the slot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based (slot, port) numbers.
    pub fn numbers(&self) -> (u32, u32) {
        (self.slot_index as u32 + 1, self.index as u32 + 1)
    }

    pub fn onts(&self) -> &[Ont] {
        &self.onts
    }

    /// Looks up an ONT by its 1-based number.
    pub fn ont(&self, ont_number: u32) -> Option<&Ont> {
        let index = Coordinate::Ont.to_index(ont_number).ok()?;
        self.onts.get(index)
    }

    /// Iterates over ONTs that are pre-provisioned or active.
    pub fn provisioned_onts(&self) -> impl Iterator<Item = &Ont> {
        self.onts.iter().filter(|ont| ont.is_provisioned())
    }

    /// Physical PON port this abstract port is bound to.
    pub fn pon_port(&self) -> Option<&PonPortRef> {
        self.pon_port.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.pon_port.is_some()
    }

    /// Binds this port to a physical PON port, replacing any earlier binding.
    pub fn bind(&mut self, pon_port: PonPortRef) {
        debug!(
            "binding abstract port {:?} to {}/pon{}",
            self.numbers(),
            pon_port.olt_hostname,
            pon_port.pon_port
        );
        self.pon_port = Some(pon_port);
    }

    fn address(&self, ont_index: usize) -> OntAddress {
        let (slot, port) = self.numbers();
        OntAddress::new(slot, port, ont_index as u32 + 1)
    }

    fn provision_request(&self, ont_index: usize, ont: &Ont) -> OntProvisionRequest {
        OntProvisionRequest {
            address: self.address(ont_index),
            pon_port: self.pon_port.clone(),
            serial_number: ont.serial_number.clone(),
            s_tag: ont.s_tag,
            c_tag: ont.c_tag,
            nas_port_id: ont.nas_port_id.clone(),
            circuit_id: ont.circuit_id.clone(),
            tech_profile: ont.tech_profile.clone(),
            speed_profile: ont.speed_profile.clone(),
        }
    }

    fn ensure_inactive(&self, ont_index: usize) -> ChassisResult<()> {
        let current = &self.onts[ont_index];
        if current.active {
            return Err(ChassisError::OntInUse {
                address: self.address(ont_index),
                serial_number: current.serial_number.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn pre_provision_ont(
        &mut self,
        ont_index: usize,
        profile: &OntProfile,
        backend: &dyn ProvisioningBackend,
    ) -> ChassisResult<()> {
        self.ensure_inactive(ont_index)?;

        let staged = Ont {
            number: ont_index as u32 + 1,
            s_tag: profile.subscriber.s_tag,
            c_tag: profile.subscriber.c_tag,
            nas_port_id: profile.subscriber.nas_port_id.clone(),
            circuit_id: profile.subscriber.circuit_id.clone(),
            tech_profile: profile.tech_profile.clone(),
            speed_profile: profile.speed_profile.clone(),
            serial_number: String::new(),
            active: false,
            owner: self.onts[ont_index].owner.clone(),
        };

        backend.pre_provision_ont(&self.provision_request(ont_index, &staged))?;
        info!("pre-provisioned ONT {}", self.address(ont_index));
        self.onts[ont_index] = staged;
        Ok(())
    }

    pub(crate) fn activate_serial(
        &mut self,
        ont_index: usize,
        serial_number: &str,
        backend: &dyn ProvisioningBackend,
    ) -> ChassisResult<()> {
        if !self.onts[ont_index].is_provisioned() {
            return Err(ChassisError::OntNotPreProvisioned {
                address: self.address(ont_index),
            });
        }
        self.ensure_inactive(ont_index)?;

        let mut staged = self.onts[ont_index].clone();
        staged.serial_number = serial_number.to_string();
        staged.active = true;

        self.commit_activation(ont_index, staged, backend)
    }

    pub(crate) fn provision_ont_full(
        &mut self,
        ont_index: usize,
        serial_number: &str,
        subscriber: &SubscriberInfo,
        backend: &dyn ProvisioningBackend,
    ) -> ChassisResult<()> {
        self.ensure_inactive(ont_index)?;

        let mut staged = self.onts[ont_index].clone();
        staged.number = ont_index as u32 + 1;
        staged.serial_number = serial_number.to_string();
        staged.s_tag = subscriber.s_tag;
        staged.c_tag = subscriber.c_tag;
        staged.nas_port_id = subscriber.nas_port_id.clone();
        staged.circuit_id = subscriber.circuit_id.clone();
        staged.active = true;

        self.commit_activation(ont_index, staged, backend)
    }

    pub(crate) fn provision_ont(
        &mut self,
        ont_index: usize,
        serial_number: &str,
        backend: &dyn ProvisioningBackend,
    ) -> ChassisResult<()> {
        self.ensure_inactive(ont_index)?;

        let mut staged = self.onts[ont_index].clone();
        staged.number = ont_index as u32 + 1;
        staged.serial_number = serial_number.to_string();
        staged.active = true;

        self.commit_activation(ont_index, staged, backend)
    }

    fn commit_activation(
        &mut self,
        ont_index: usize,
        staged: Ont,
        backend: &dyn ProvisioningBackend,
    ) -> ChassisResult<()> {
        backend.activate_ont(&self.provision_request(ont_index, &staged))?;
        info!(
            "activated ONT {} with serial {}",
            self.address(ont_index),
            staged.serial_number
        );
        self.onts[ont_index] = staged;
        Ok(())
    }

    pub(crate) fn delete_ont(
        &mut self,
        ont_index: usize,
        serial_number: &str,
        backend: &dyn ProvisioningBackend,
    ) -> ChassisResult<()> {
        let address = self.address(ont_index);
        let current = &self.onts[ont_index];
        if !current.is_provisioned() {
            return Err(ChassisError::OntNotProvisioned { address });
        }
        // A pre-provisioned ONT has no serial bound yet; any serial deletes it.
        if !current.serial_number.is_empty() && current.serial_number != serial_number {
            return Err(ChassisError::SerialMismatch {
                address,
                expected: current.serial_number.clone(),
                actual: serial_number.to_string(),
            });
        }

        backend.delete_ont(&OntDeleteRequest {
            address,
            pon_port: self.pon_port.clone(),
            serial_number: serial_number.to_string(),
        })?;
        info!("deleted ONT {} (serial {:?})", address, serial_number);
        self.onts[ont_index].reset();
        Ok(())
    }
}
