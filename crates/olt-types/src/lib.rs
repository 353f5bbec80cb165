//! Common types for abstract OLT topology modelling.
//!
//! This crate provides type-safe representations of the identifiers and
//! coordinates shared by the chassis model, the backend API and the
//! provisioning orchestrator:
//!
//! - [`Clli`]: Common Language Location Identifier of a chassis
//! - [`Coordinate`]: the slot / port / ONT axes and their fixed bounds
//! - [`OntAddress`]: 1-based external address of a single ONT
//! - [`OntIndex`]: validated 0-based indices into the chassis arrays

mod clli;
mod coordinate;

pub use clli::Clli;
pub use coordinate::{Coordinate, OntAddress, OntIndex, MAX_ONTS, MAX_PORTS, MAX_SLOTS};

/// Common error type for parsing and validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid CLLI: {0:?} (must be 1-11 alphanumeric characters)")]
    InvalidClli(String),

    #[error("invalid {coordinate} number {value} (must be 1-{max})", max = .coordinate.max())]
    InvalidCoordinate { coordinate: Coordinate, value: u32 },

    #[error("invalid ONT address: {0:?} (expected slot|port|ont)")]
    InvalidOntAddress(String),
}
