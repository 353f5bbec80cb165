//! The physical chassis: 16 line-card positions holding real OLTs.

use std::net::SocketAddr;
use std::sync::Arc;

use olt_backend::{LoggingBackend, PhysicalOntRequest, ProvisioningBackend};
use olt_types::{Clli, Coordinate, MAX_SLOTS};
use tracing::{info, instrument};

use super::data_switch::DataSwitch;
use super::olt::Olt;
use crate::error::{ChassisError, ChassisResult};
use crate::ont::Ont;

/// A real chassis with a vCore controller, a data switch and OLT line cards.
#[derive(Debug)]
pub struct PhysicalChassis {
    clli: Clli,
    vcore_address: SocketAddr,
    data_switch: DataSwitch,
    linecards: Vec<Option<Box<dyn Olt>>>,
    backend: Arc<dyn ProvisioningBackend>,
}

impl PhysicalChassis {
    /// Creates a chassis with every line-card position empty.
    pub fn new(clli: Clli, vcore_address: SocketAddr, data_switch: DataSwitch) -> Self {
        Self {
            clli,
            vcore_address,
            data_switch,
            linecards: (0..MAX_SLOTS).map(|_| None).collect(),
            backend: Arc::new(LoggingBackend::new()),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn ProvisioningBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn clli(&self) -> &Clli {
        &self.clli
    }

    pub fn vcore_address(&self) -> SocketAddr {
        self.vcore_address
    }

    pub fn data_switch(&self) -> &DataSwitch {
        &self.data_switch
    }

    /// Returns the line card in a 1-based slot, if one is installed.
    pub fn linecard(&self, slot_number: u32) -> Option<&dyn Olt> {
        let index = Coordinate::Slot.to_index(slot_number).ok()?;
        self.linecards[index].as_deref()
    }

    pub fn linecard_mut(&mut self, slot_number: u32) -> Option<&mut (dyn Olt + 'static)> {
        let index = Coordinate::Slot.to_index(slot_number).ok()?;
        self.linecards[index].as_deref_mut()
    }

    /// Iterates over installed line cards with their 1-based slot numbers.
    pub fn linecards(&self) -> impl Iterator<Item = (u32, &dyn Olt)> {
        self.linecards
            .iter()
            .enumerate()
            .filter_map(|(index, card)| card.as_deref().map(|olt| (index as u32 + 1, olt)))
    }

    /// Number of occupied line-card positions.
    pub fn olt_count(&self) -> usize {
        self.linecards.iter().filter(|card| card.is_some()).count()
    }

    /// Installs an OLT in the first free position and registers it with the
    /// backend. Returns the 1-based slot number.
    #[instrument(skip(self, olt), fields(clli = %self.clli, hostname = olt.hostname()))]
    pub fn add_olt_chassis(&mut self, olt: Box<dyn Olt>) -> ChassisResult<u32> {
        let Some(index) = self.linecards.iter().position(Option::is_none) else {
            return Err(ChassisError::ChassisFull {
                clli: self.clli.clone(),
            });
        };

        self.backend
            .add_olt(&self.clli, olt.hostname(), olt.address())?;

        let slot_number = index as u32 + 1;
        info!(
            "Added OLT {} ({}) to chassis {} slot {}",
            olt.hostname(),
            olt.address(),
            self.clli,
            slot_number
        );
        self.linecards[index] = Some(olt);
        Ok(slot_number)
    }

    /// Activates the line card in a 1-based slot.
    #[instrument(skip(self), fields(clli = %self.clli))]
    pub fn activate_slot(&mut self, slot_number: u32) -> ChassisResult<()> {
        let index = Coordinate::Slot.to_index(slot_number)?;
        let Some(olt) = self.linecards[index].as_deref_mut() else {
            return Err(ChassisError::UnprovisionedSlot {
                clli: self.clli.clone(),
                slot_number,
            });
        };
        olt.activate(self.backend.as_ref())
    }

    /// Pushes a physical ONT record to the backend and stores it on the
    /// addressed PON port of the line card in `slot_number`.
    #[instrument(skip(self, ont), fields(clli = %self.clli, ont = ont.number))]
    pub fn provision_ont(
        &mut self,
        slot_number: u32,
        pon_port: u32,
        ont: Ont,
    ) -> ChassisResult<()> {
        let index = Coordinate::Slot.to_index(slot_number)?;
        Coordinate::Ont.to_index(ont.number)?;
        let Some(olt) = self.linecards[index].as_deref_mut() else {
            return Err(ChassisError::UnprovisionedSlot {
                clli: self.clli.clone(),
                slot_number,
            });
        };
        let hostname = olt.hostname().to_string();
        let Some(port) = olt
            .pon_ports_mut()
            .iter_mut()
            .find(|port| port.number() == pon_port)
        else {
            return Err(ChassisError::PonPortNotFound {
                olt_hostname: hostname,
                pon_port,
            });
        };

        let request = PhysicalOntRequest {
            clli: self.clli.clone(),
            pon_port: port.reference().clone(),
            ont: ont.number,
            serial_number: ont.serial_number.clone(),
            s_vlan: ont.s_tag,
            c_vlan: ont.c_tag,
        };
        self.backend.provision_physical_ont(&request)?;

        info!(
            "Provisioned ONT {} serial {:?} on {}/pon{} svlan {} cvlan {}",
            ont.number, ont.serial_number, hostname, pon_port, ont.s_tag, ont.c_tag
        );
        port.store(ont)
    }
}
