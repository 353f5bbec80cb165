//! The abstract 16-slot chassis.
//!
//! Two independent paths reach the same port array:
//!
//! 1. [`AbstractChassis::next_port`] hands out ports in a fixed sequence and
//!    is used when binding real PON ports to abstract ones.
//! 2. The provisioning dispatcher (`pre_provision_ont`, `activate_*`,
//!    `delete_ont`) addresses any port directly by number, whether or not
//!    the allocator has reached it.

mod allocator;
mod port;
mod slot;

pub use allocator::PortAllocationInfo;
pub use port::{OntProfile, Port, SubscriberInfo};
pub use slot::Slot;

use std::sync::Arc;

use olt_backend::{LoggingBackend, ProvisioningBackend};
use olt_types::{Clli, Coordinate, OntAddress, MAX_SLOTS};
use tracing::{debug, instrument, warn};

use crate::error::{ChassisError, ChassisResult};
use crate::ont::Ont;

/// Virtual chassis aggregating several real OLT chassis.
#[derive(Debug, Clone)]
pub struct AbstractChassis {
    clli: Clli,
    rack: u32,
    shelf: u32,
    slots: Vec<Slot>,
    alloc_info: PortAllocationInfo,
    backend: Arc<dyn ProvisioningBackend>,
}

impl AbstractChassis {
    /// Creates a chassis with 16 empty slots and a logging backend.
    pub fn new(clli: Clli, rack: u32, shelf: u32) -> Self {
        Self {
            clli,
            rack,
            shelf,
            slots: (0..MAX_SLOTS).map(Slot::new).collect(),
            alloc_info: PortAllocationInfo::new(),
            backend: Arc::new(LoggingBackend::new()),
        }
    }

    /// Replaces the backend provisioning requests are forwarded to.
    pub fn with_backend(mut self, backend: Arc<dyn ProvisioningBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn clli(&self) -> &Clli {
        &self.clli
    }

    pub fn rack(&self) -> u32 {
        self.rack
    }

    pub fn shelf(&self) -> u32 {
        self.shelf
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn alloc_info(&self) -> &PortAllocationInfo {
        &self.alloc_info
    }

    /// Looks up a slot by its 1-based number.
    pub fn slot(&self, slot_number: u32) -> Option<&Slot> {
        let index = Coordinate::Slot.to_index(slot_number).ok()?;
        self.slots.get(index)
    }

    /// Looks up a port by 1-based slot and port numbers.
    pub fn port(&self, slot_number: u32, port_number: u32) -> Option<&Port> {
        self.slot(slot_number)?.port(port_number)
    }

    /// Looks up an ONT by its 1-based address.
    pub fn ont(&self, address: OntAddress) -> Option<&Ont> {
        self.port(address.slot, address.port)?.ont(address.ont)
    }

    /// Iterates over every port in allocation order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.slots.iter().flat_map(|slot| slot.ports())
    }

    /// Hands out the next unallocated port.
    ///
    /// # Errors
    ///
    /// Returns [`ChassisError::OutOfPorts`] once all 256 ports have been
    /// handed out, and on every call after that.
    pub fn next_port(&mut self) -> ChassisResult<&mut Port> {
        let Some((slot, port)) = self.alloc_info.take_next() else {
            warn!("abstract chassis {} out of ports", self.clli);
            return Err(ChassisError::OutOfPorts);
        };
        debug!("allocated abstract port slot {} port {}", slot, port);
        Ok(self.slots[slot].port_mut(port))
    }

    /// Validates the address and runs `op` against the addressed port.
    fn dispatch<F>(&mut self, address: OntAddress, op: F) -> ChassisResult<()>
    where
        F: FnOnce(&mut Port, usize, &dyn ProvisioningBackend) -> ChassisResult<()>,
    {
        let index = address.validate().map_err(|e| {
            warn!("rejecting request for {}: {}", address, e);
            ChassisError::from(e)
        })?;
        let backend = self.backend.as_ref();
        let port = self.slots[index.slot()].port_mut(index.port());
        op(port, index.ont(), backend)
    }

    /// Reserves an ONT with tags and profiles without activating it.
    #[instrument(skip(self, profile), fields(clli = %self.clli))]
    pub fn pre_provision_ont(
        &mut self,
        slot_number: u32,
        port_number: u32,
        ont_number: u32,
        profile: &OntProfile,
    ) -> ChassisResult<()> {
        let address = OntAddress::new(slot_number, port_number, ont_number);
        self.dispatch(address, |port, ont, backend| {
            port.pre_provision_ont(ont, profile, backend)
        })
    }

    /// Binds a serial number to a pre-provisioned ONT and activates it.
    #[instrument(skip(self), fields(clli = %self.clli))]
    pub fn activate_serial(
        &mut self,
        slot_number: u32,
        port_number: u32,
        ont_number: u32,
        serial_number: &str,
    ) -> ChassisResult<()> {
        let address = OntAddress::new(slot_number, port_number, ont_number);
        self.dispatch(address, |port, ont, backend| {
            port.activate_serial(ont, serial_number, backend)
        })
    }

    /// Provisions and activates an ONT with serial, tags, NAS-Port-ID and Circuit-ID.
    #[instrument(skip(self, subscriber), fields(clli = %self.clli))]
    pub fn activate_ont_full(
        &mut self,
        slot_number: u32,
        port_number: u32,
        ont_number: u32,
        serial_number: &str,
        subscriber: &SubscriberInfo,
    ) -> ChassisResult<()> {
        let address = OntAddress::new(slot_number, port_number, ont_number);
        self.dispatch(address, |port, ont, backend| {
            port.provision_ont_full(ont, serial_number, subscriber, backend)
        })
    }

    /// Provisions and activates an ONT knowing only its serial number.
    #[instrument(skip(self), fields(clli = %self.clli))]
    pub fn activate_ont(
        &mut self,
        slot_number: u32,
        port_number: u32,
        ont_number: u32,
        serial_number: &str,
    ) -> ChassisResult<()> {
        let address = OntAddress::new(slot_number, port_number, ont_number);
        self.dispatch(address, |port, ont, backend| {
            port.provision_ont(ont, serial_number, backend)
        })
    }

    /// Deactivates an ONT and clears its slot, checking the serial number.
    #[instrument(skip(self), fields(clli = %self.clli))]
    pub fn delete_ont(
        &mut self,
        slot_number: u32,
        port_number: u32,
        ont_number: u32,
        serial_number: &str,
    ) -> ChassisResult<()> {
        let address = OntAddress::new(slot_number, port_number, ont_number);
        self.dispatch(address, |port, ont, backend| {
            port.delete_ont(ont, serial_number, backend)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olt_backend::{BackendOp, BackendStatus, RecordingBackend};
    use olt_types::{MAX_PORTS, MAX_SLOTS};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn chassis() -> (AbstractChassis, Arc<RecordingBackend>) {
        let backend = Arc::new(RecordingBackend::new());
        let chassis = AbstractChassis::new(Clli::new("STLSMO09DS0").unwrap(), 1, 1)
            .with_backend(backend.clone());
        (chassis, backend)
    }

    #[test]
    fn test_next_port_is_sequential_and_unique() {
        let (mut chassis, _) = chassis();
        let mut seen = HashSet::new();
        let mut order = Vec::new();

        for _ in 0..MAX_SLOTS * MAX_PORTS {
            let port = chassis.next_port().unwrap();
            let key = (port.slot_index(), port.index());
            assert!(seen.insert(key), "port {:?} handed out twice", key);
            order.push(key);
        }

        let expected: Vec<_> = (0..MAX_SLOTS)
            .flat_map(|slot| (0..MAX_PORTS).map(move |port| (slot, port)))
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_next_port_exhaustion_latches() {
        let (mut chassis, _) = chassis();
        for _ in 0..256 {
            chassis.next_port().unwrap();
        }

        for _ in 0..3 {
            let err = chassis.next_port().unwrap_err();
            assert_eq!(err, ChassisError::OutOfPorts);
            assert_eq!(err.to_string(), "Abstract chassis out of ports");
        }
        assert!(chassis.alloc_info().is_out_of_ports());
    }

    #[test]
    fn test_pre_provision_rejects_slot_17() {
        let (mut chassis, backend) = chassis();
        let profile = OntProfile::new(SubscriberInfo::new(100, 200));

        let err = chassis.pre_provision_ont(17, 1, 1, &profile).unwrap_err();
        assert_eq!(err.invalid_coordinate(), Some((Coordinate::Slot, 17)));
        assert!(err.to_string().contains("slot"));
        assert!(err.to_string().contains("17"));

        assert!(backend.calls().is_empty());
        assert!(chassis.ports().all(|p| p.provisioned_onts().count() == 0));
    }

    #[test]
    fn test_rejects_each_axis_including_zero() {
        let (mut chassis, _) = chassis();

        let err = chassis.activate_ont(0, 1, 1, "ABC123").unwrap_err();
        assert_eq!(err.invalid_coordinate(), Some((Coordinate::Slot, 0)));

        let err = chassis.activate_ont(1, 17, 1, "ABC123").unwrap_err();
        assert_eq!(err.invalid_coordinate(), Some((Coordinate::Port, 17)));

        let err = chassis.activate_ont(1, 1, 65, "ABC123").unwrap_err();
        assert_eq!(err.invalid_coordinate(), Some((Coordinate::Ont, 65)));

        let err = chassis.delete_ont(1, 1, 0, "ABC123").unwrap_err();
        assert_eq!(err.invalid_coordinate(), Some((Coordinate::Ont, 0)));
    }

    #[test]
    fn test_activate_ont_on_fresh_chassis() {
        let (mut chassis, backend) = chassis();

        chassis.activate_ont(1, 1, 1, "ABC123").unwrap();

        let ont = chassis.ont(OntAddress::new(1, 1, 1)).unwrap();
        assert!(ont.active);
        assert_eq!(ont.serial_number, "ABC123");
        assert_eq!(backend.count(BackendOp::ActivateOnt), 1);
    }

    #[test]
    fn test_dispatch_translates_to_zero_based() {
        let (mut chassis, _) = chassis();
        chassis.activate_ont(16, 16, 64, "EDGE0001").unwrap();

        let port = &chassis.slots()[15].ports()[15];
        assert!(port.onts()[63].active);
        assert_eq!(port.provisioned_onts().count(), 1);
    }

    #[test]
    fn test_dispatcher_ignores_allocator() {
        let (mut chassis, _) = chassis();
        chassis.activate_ont(3, 1, 1, "ABC123").unwrap();

        assert_eq!(chassis.alloc_info().allocated(), 0);
        assert!(!chassis.port(3, 1).unwrap().is_bound());
    }

    #[test]
    fn test_backend_error_propagates_unchanged() {
        let (mut chassis, backend) = chassis();
        backend.fail_next(BackendOp::PreProvisionOnt, BackendStatus::Unavailable);
        let profile = OntProfile::new(SubscriberInfo::new(100, 200));

        let err = chassis.pre_provision_ont(1, 1, 1, &profile).unwrap_err();
        assert_eq!(
            err,
            ChassisError::Backend(olt_backend::BackendError::status(
                "pre_provision_ont",
                BackendStatus::Unavailable
            ))
        );
        assert!(err.is_retryable());
        assert!(!chassis.ont(OntAddress::new(1, 1, 1)).unwrap().is_provisioned());
    }

    #[test]
    fn test_double_delete_is_not_idempotent() {
        let (mut chassis, backend) = chassis();
        chassis.activate_ont(1, 1, 1, "ABC123").unwrap();

        chassis.delete_ont(1, 1, 1, "ABC123").unwrap();
        let err = chassis.delete_ont(1, 1, 1, "ABC123").unwrap_err();

        assert_eq!(
            err,
            ChassisError::OntNotProvisioned {
                address: OntAddress::new(1, 1, 1)
            }
        );
        assert_eq!(backend.count(BackendOp::DeleteOnt), 1);
    }

    #[test]
    fn test_lookup_helpers() {
        let (chassis, _) = chassis();
        assert_eq!(chassis.slots().len(), 16);
        assert_eq!(chassis.ports().count(), 256);
        assert!(chassis.slot(0).is_none());
        assert!(chassis.port(16, 16).is_some());
        assert!(chassis.ont(OntAddress::new(1, 1, 65)).is_none());
        assert_eq!((chassis.rack(), chassis.shelf()), (1, 1));
    }
}
