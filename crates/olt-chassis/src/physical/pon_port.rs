//! PON port of a real OLT.

use olt_backend::PonPortRef;
use olt_types::{Coordinate, MAX_ONTS};

use crate::error::ChassisResult;
use crate::ont::{Ont, OntOwner};

/// A PON port on a real OLT with room for 64 ONTs.
#[derive(Debug, Clone)]
pub struct PonPort {
    reference: PonPortRef,
    onts: Vec<Ont>,
}

impl PonPort {
    pub fn new(olt_hostname: impl Into<String>, number: u32) -> Self {
        let reference = PonPortRef::new(olt_hostname, number);
        let owner = OntOwner::Pon(reference.clone());
        Self {
            reference,
            onts: vec![Ont::empty(owner); MAX_ONTS],
        }
    }

    /// 1-based PON port number.
    pub fn number(&self) -> u32 {
        self.reference.pon_port
    }

    pub fn reference(&self) -> &PonPortRef {
        &self.reference
    }

    pub fn onts(&self) -> &[Ont] {
        &self.onts
    }

    /// Looks up an ONT by its 1-based number.
    pub fn ont(&self, ont_number: u32) -> Option<&Ont> {
        let index = Coordinate::Ont.to_index(ont_number).ok()?;
        self.onts.get(index)
    }

    /// Stores `ont` at the position given by its number, taking ownership of it.
    pub(crate) fn store(&mut self, mut ont: Ont) -> ChassisResult<()> {
        let index = Coordinate::Ont.to_index(ont.number)?;
        ont.owner = Some(OntOwner::Pon(self.reference.clone()));
        self.onts[index] = ont;
        Ok(())
    }
}
