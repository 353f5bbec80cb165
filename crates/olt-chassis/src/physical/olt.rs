//! OLT line cards.

use std::fmt::Debug;
use std::net::SocketAddr;

use olt_backend::ProvisioningBackend;
use tracing::info;

use super::pon_port::PonPort;
use crate::error::ChassisResult;

/// A real OLT chassis occupying one slot of the physical chassis.
pub trait Olt: Debug + Send + Sync {
    fn hostname(&self) -> &str;

    /// Address of the OLT management API.
    fn address(&self) -> SocketAddr;

    fn pon_ports(&self) -> &[PonPort];

    fn pon_ports_mut(&mut self) -> &mut [PonPort];

    fn is_active(&self) -> bool;

    /// Brings the line card into service.
    fn activate(&mut self, backend: &dyn ProvisioningBackend) -> ChassisResult<()>;
}

/// An OLT with a fixed number of PON ports and no vendor specifics.
#[derive(Debug, Clone)]
pub struct SimpleOlt {
    hostname: String,
    address: SocketAddr,
    pon_ports: Vec<PonPort>,
    active: bool,
}

impl SimpleOlt {
    /// Creates an inactive OLT with PON ports numbered `1..=pon_port_count`.
    pub fn new(hostname: impl Into<String>, address: SocketAddr, pon_port_count: u32) -> Self {
        let hostname = hostname.into();
        let pon_ports = (1..=pon_port_count)
            .map(|number| PonPort::new(hostname.clone(), number))
            .collect();
        Self {
            hostname,
            address,
            pon_ports,
            active: false,
        }
    }
}

impl Olt for SimpleOlt {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn address(&self) -> SocketAddr {
        self.address
    }

    fn pon_ports(&self) -> &[PonPort] {
        &self.pon_ports
    }

    fn pon_ports_mut(&mut self) -> &mut [PonPort] {
        &mut self.pon_ports
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self, backend: &dyn ProvisioningBackend) -> ChassisResult<()> {
        backend.activate_olt(&self.hostname)?;
        self.active = true;
        info!("OLT {} activated", self.hostname);
        Ok(())
    }
}
