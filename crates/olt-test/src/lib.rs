//! Integration test infrastructure for the abstract OLT
//!
//! Provides:
//! - A test environment wiring both chassis to a recording backend
//! - Request fixtures for common provisioning scenarios
//! - Verification helpers for ONT state and backend traffic

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;
