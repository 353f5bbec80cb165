//! Chassis coordinate axes and their fixed bounds.
//!
//! Northbound callers address slots, ports and ONTs with 1-based numbers;
//! the chassis arrays are indexed from 0. [`Coordinate::to_index`] is the
//! single place where that translation and its bounds check happen.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of slots in the abstract chassis.
pub const MAX_SLOTS: usize = 16;

/// Number of ports per slot.
pub const MAX_PORTS: usize = 16;

/// Number of ONTs addressable on a single port.
pub const MAX_ONTS: usize = 64;

/// One axis of the chassis → slot → port → ONT hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coordinate {
    Slot,
    Port,
    Ont,
}

impl Coordinate {
    /// Returns the highest valid 1-based number on this axis.
    pub const fn max(&self) -> u32 {
        match self {
            Coordinate::Slot => MAX_SLOTS as u32,
            Coordinate::Port => MAX_PORTS as u32,
            Coordinate::Ont => MAX_ONTS as u32,
        }
    }

    /// Returns the axis name used in error messages and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Coordinate::Slot => "slot",
            Coordinate::Port => "port",
            Coordinate::Ont => "ont",
        }
    }

    /// Converts a 1-based number into a 0-based index.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidCoordinate`] when `number` is 0 or
    /// greater than [`Coordinate::max`].
    pub const fn to_index(&self, number: u32) -> Result<usize, ParseError> {
        if number >= 1 && number <= self.max() {
            Ok((number - 1) as usize)
        } else {
            Err(ParseError::InvalidCoordinate {
                coordinate: *self,
                value: number,
            })
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// External (1-based) address of an ONT on the abstract chassis.
///
/// The string form `slot|port|ont` is used as the consumer key by the
/// provisioning orchestrator.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct OntAddress {
    pub slot: u32,
    pub port: u32,
    pub ont: u32,
}

impl OntAddress {
    /// Creates a new address without validating it.
    pub const fn new(slot: u32, port: u32, ont: u32) -> Self {
        Self { slot, port, ont }
    }

    /// Validates all three numbers, slot first, and returns 0-based indices.
    pub fn validate(&self) -> Result<OntIndex, ParseError> {
        Ok(OntIndex {
            slot: Coordinate::Slot.to_index(self.slot)?,
            port: Coordinate::Port.to_index(self.port)?,
            ont: Coordinate::Ont.to_index(self.ont)?,
        })
    }
}

impl fmt::Display for OntAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.slot, self.port, self.ont)
    }
}

impl FromStr for OntAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidOntAddress(s.to_string());
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.trim().parse().map_err(|_| invalid())?;
        }
        Ok(OntAddress::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// Validated 0-based indices of an ONT.
///
/// Only obtainable through [`OntAddress::validate`], so holding one means
/// every index is in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OntIndex {
    slot: usize,
    port: usize,
    ont: usize,
}

impl OntIndex {
    pub const fn slot(&self) -> usize {
        self.slot
    }

    pub const fn port(&self) -> usize {
        self.port
    }

    pub const fn ont(&self) -> usize {
        self.ont
    }
}
