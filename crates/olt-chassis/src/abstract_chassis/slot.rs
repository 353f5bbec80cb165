//! Abstract chassis slot.

use olt_types::{Coordinate, MAX_PORTS};

use super::port::Port;

/// A slot of the abstract chassis holding exactly 16 ports.
#[derive(Debug, Clone)]
pub struct Slot {
    index: usize,
    ports: Vec<Port>,
}

impl Slot {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            ports: (0..MAX_PORTS).map(|port| Port::new(index, port)).collect(),
        }
    }

    /// 0-based slot index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based slot number.
    pub fn number(&self) -> u32 {
        self.index as u32 + 1
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Looks up a port by its 1-based number.
    pub fn port(&self, port_number: u32) -> Option<&Port> {
        let index = Coordinate::Port.to_index(port_number).ok()?;
        self.ports.get(index)
    }

    pub(crate) fn port_mut(&mut self, index: usize) -> &mut Port {
        &mut self.ports[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_has_sixteen_ports() {
        let slot = Slot::new(4);
        assert_eq!(slot.number(), 5);
        assert_eq!(slot.ports().len(), 16);
        assert!(slot.ports().iter().all(|p| p.slot_index() == 4));
    }

    #[test]
    fn test_port_lookup_is_one_based() {
        let slot = Slot::new(0);
        assert_eq!(slot.port(1).unwrap().index(), 0);
        assert_eq!(slot.port(16).unwrap().index(), 15);
        assert!(slot.port(0).is_none());
        assert!(slot.port(17).is_none());
    }
}
