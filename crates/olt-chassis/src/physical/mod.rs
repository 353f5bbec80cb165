//! Physical chassis model: real line cards, PON ports and the data switch.

mod chassis;
mod data_switch;
mod olt;
mod pon_port;

pub use chassis::PhysicalChassis;
pub use data_switch::DataSwitch;
pub use olt::{Olt, SimpleOlt};
pub use pon_port::PonPort;
