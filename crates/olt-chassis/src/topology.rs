//! Binding of real PON ports onto the abstract chassis.

use std::net::SocketAddr;
use std::sync::Arc;

use olt_backend::{HostResolver, PonPortRef};
use tracing::{info, instrument, warn};

use crate::abstract_chassis::{AbstractChassis, Port};
use crate::error::{ChassisError, ChassisResult};
use crate::physical::{Olt, PhysicalChassis, SimpleOlt};

/// Abstract chassis plus the physical chassis whose PON ports back it.
#[derive(Debug)]
pub struct Topology {
    abstract_chassis: AbstractChassis,
    physical_chassis: PhysicalChassis,
    resolver: Option<Arc<dyn HostResolver>>,
}

impl Topology {
    pub fn new(abstract_chassis: AbstractChassis, physical_chassis: PhysicalChassis) -> Self {
        Self {
            abstract_chassis,
            physical_chassis,
            resolver: None,
        }
    }

    /// Sets the resolver used for OLTs added without an address.
    pub fn with_resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn abstract_chassis(&self) -> &AbstractChassis {
        &self.abstract_chassis
    }

    pub fn abstract_chassis_mut(&mut self) -> &mut AbstractChassis {
        &mut self.abstract_chassis
    }

    pub fn physical_chassis(&self) -> &PhysicalChassis {
        &self.physical_chassis
    }

    pub fn physical_chassis_mut(&mut self) -> &mut PhysicalChassis {
        &mut self.physical_chassis
    }

    /// Installs an OLT in the physical chassis and binds each of its PON
    /// ports to the next free abstract port. Returns the physical slot number.
    ///
    /// # Errors
    ///
    /// Fails if the physical chassis is full or the backend rejects the OLT.
    /// If the allocator is already exhausted the OLT is not installed. If it
    /// runs out partway, bindings already made are kept and
    /// [`ChassisError::OutOfPorts`] is returned.
    #[instrument(skip(self, olt), fields(hostname = olt.hostname()))]
    pub fn add_olt(&mut self, olt: Box<dyn Olt>) -> ChassisResult<u32> {
        if self.abstract_chassis.alloc_info().is_out_of_ports() {
            warn!("not adding {}: abstract chassis out of ports", olt.hostname());
            return Err(ChassisError::OutOfPorts);
        }
        let hostname = olt.hostname().to_string();
        let pon_numbers: Vec<u32> = olt.pon_ports().iter().map(|p| p.number()).collect();
        let slot_number = self.physical_chassis.add_olt_chassis(olt)?;

        for pon_number in pon_numbers {
            let pon_ref = PonPortRef::new(hostname.clone(), pon_number);
            let port = self.abstract_chassis.next_port().map_err(|e| {
                warn!("cannot bind {}/pon{}: {}", hostname, pon_number, e);
                e
            })?;
            let (slot, port_number) = port.numbers();
            port.bind(pon_ref);
            info!(
                "Bound {}/pon{} to abstract slot {} port {}",
                hostname, pon_number, slot, port_number
            );
        }
        Ok(slot_number)
    }

    /// Adds a [`SimpleOlt`], resolving its address when none is given.
    pub fn add_simple_olt(
        &mut self,
        hostname: &str,
        address: Option<SocketAddr>,
        pon_ports: u32,
    ) -> ChassisResult<u32> {
        let address = match address {
            Some(address) => address,
            None => self.resolve(hostname)?,
        };
        self.add_olt(Box::new(SimpleOlt::new(hostname, address, pon_ports)))
    }

    fn resolve(&self, hostname: &str) -> ChassisResult<SocketAddr> {
        match &self.resolver {
            Some(resolver) => Ok(resolver.resolve(hostname)?),
            None => Err(olt_backend::BackendError::resolve(hostname).into()),
        }
    }

    /// Finds the abstract port bound to a physical PON port.
    pub fn abstract_port_for(&self, pon_port: &PonPortRef) -> Option<&Port> {
        self.abstract_chassis
            .ports()
            .find(|port| port.pon_port() == Some(pon_port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physical::DataSwitch;
    use olt_backend::{BackendError, BackendOp, RecordingBackend, StaticResolver};
    use olt_types::Clli;
    use pretty_assertions::assert_eq;

    fn topology(backend: Arc<RecordingBackend>) -> Topology {
        let abstract_chassis =
            AbstractChassis::new(Clli::new("ABSTRACT1").unwrap(), 1, 1).with_backend(backend.clone());
        let physical_chassis = PhysicalChassis::new(
            Clli::new("NYCMNY01").unwrap(),
            "10.0.0.1:9191".parse().unwrap(),
            DataSwitch::new("switch1.lab"),
        )
        .with_backend(backend);
        Topology::new(abstract_chassis, physical_chassis)
    }

    #[test]
    fn test_add_olt_binds_consecutive_ports() {
        let backend = Arc::new(RecordingBackend::new());
        let mut topology = topology(backend.clone());

        let slot = topology
            .add_simple_olt("olt1.lab", Some("10.0.0.5:9191".parse().unwrap()), 3)
            .unwrap();
        assert_eq!(slot, 1);
        topology
            .add_simple_olt("olt2.lab", Some("10.0.0.6:9191".parse().unwrap()), 2)
            .unwrap();

        let bound: Vec<((u32, u32), PonPortRef)> = topology
            .abstract_chassis()
            .ports()
            .filter_map(|p| p.pon_port().map(|r| (p.numbers(), r.clone())))
            .collect();
        assert_eq!(
            bound,
            vec![
                ((1, 1), PonPortRef::new("olt1.lab", 1)),
                ((1, 2), PonPortRef::new("olt1.lab", 2)),
                ((1, 3), PonPortRef::new("olt1.lab", 3)),
                ((1, 4), PonPortRef::new("olt2.lab", 1)),
                ((1, 5), PonPortRef::new("olt2.lab", 2)),
            ]
        );
        assert_eq!(topology.abstract_chassis().alloc_info().allocated(), 5);
        assert_eq!(backend.count(BackendOp::AddOlt), 2);
    }

    #[test]
    fn test_abstract_port_for() {
        let mut topology = topology(Arc::new(RecordingBackend::new()));
        topology
            .add_simple_olt("olt1.lab", Some("10.0.0.5:9191".parse().unwrap()), 2)
            .unwrap();

        let port = topology
            .abstract_port_for(&PonPortRef::new("olt1.lab", 2))
            .unwrap();
        assert_eq!(port.numbers(), (1, 2));
        assert!(topology
            .abstract_port_for(&PonPortRef::new("olt9.lab", 1))
            .is_none());
    }

    #[test]
    fn test_allocator_exhaustion_is_propagated() {
        let mut topology = topology(Arc::new(RecordingBackend::new()));
        // 15 OLTs with 16 PON ports each use 240 of 256 abstract ports.
        for i in 0..15 {
            topology
                .add_simple_olt(&format!("olt{i}"), Some("10.0.0.5:9191".parse().unwrap()), 16)
                .unwrap();
        }

        let err = topology
            .add_simple_olt("big", Some("10.0.0.9:9191".parse().unwrap()), 20)
            .unwrap_err();
        assert_eq!(err, ChassisError::OutOfPorts);
        // The first 16 PON ports of the last OLT stay bound.
        assert!(topology
            .abstract_port_for(&PonPortRef::new("big", 16))
            .is_some());
        assert!(topology
            .abstract_port_for(&PonPortRef::new("big", 17))
            .is_none());
        assert!(topology.abstract_chassis().alloc_info().is_out_of_ports());
    }

    #[test]
    fn test_add_olt_when_out_of_ports_installs_nothing() {
        let backend = Arc::new(RecordingBackend::new());
        let mut topology = topology(backend.clone());
        for i in 0..8 {
            topology
                .add_simple_olt(&format!("olt{i}"), Some("10.0.0.5:9191".parse().unwrap()), 32)
                .unwrap();
        }
        assert!(topology.abstract_chassis().alloc_info().is_out_of_ports());

        for _ in 0..2 {
            let err = topology
                .add_simple_olt("late.lab", Some("10.0.0.9:9191".parse().unwrap()), 4)
                .unwrap_err();
            assert_eq!(err, ChassisError::OutOfPorts);
        }
        assert_eq!(topology.physical_chassis().olt_count(), 8);
        assert_eq!(backend.count(BackendOp::AddOlt), 8);
    }

    #[test]
    fn test_dispatcher_reaches_unbound_port() {
        let mut topology = topology(Arc::new(RecordingBackend::new()));
        topology
            .abstract_chassis_mut()
            .activate_ont(9, 9, 1, "ABC123")
            .unwrap();

        let port = topology.abstract_chassis().port(9, 9).unwrap();
        assert!(!port.is_bound());
        assert!(port.ont(1).unwrap().active);
    }

    #[test]
    fn test_resolves_missing_address() {
        let resolver = StaticResolver::new().with_host("olt1.lab", "10.0.0.5:9191".parse().unwrap());
        let mut topology = topology(Arc::new(RecordingBackend::new())).with_resolver(Arc::new(resolver));

        topology.add_simple_olt("olt1.lab", None, 1).unwrap();
        assert_eq!(
            topology.physical_chassis().linecard(1).unwrap().address(),
            "10.0.0.5:9191".parse().unwrap()
        );
    }

    #[test]
    fn test_unresolvable_host() {
        let mut topology = topology(Arc::new(RecordingBackend::new()));
        let err = topology.add_simple_olt("ghost.lab", None, 1).unwrap_err();
        assert_eq!(err, ChassisError::Backend(BackendError::resolve("ghost.lab")));
        assert_eq!(topology.physical_chassis().olt_count(), 0);
    }
}
