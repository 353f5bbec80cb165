//! Hostname to address resolution for real OLT chassis.

use std::collections::HashMap;
use std::fmt::Debug;
use std::net::SocketAddr;

use log::debug;

use crate::error::{BackendError, BackendResult};

/// Locates a real chassis by hostname.
pub trait HostResolver: Debug + Send + Sync {
    /// Resolves `hostname` to the address its management API listens on.
    fn resolve(&self, hostname: &str) -> BackendResult<SocketAddr>;
}

/// Resolver backed by a fixed host table.
///
/// Hostnames that are already literal socket addresses (`10.0.0.5:9191`)
/// resolve to themselves without a table entry.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    hosts: HashMap<String, SocketAddr>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a host entry.
    pub fn with_host(mut self, hostname: impl Into<String>, address: SocketAddr) -> Self {
        self.insert(hostname, address);
        self
    }

    /// Adds or replaces a host entry.
    pub fn insert(&mut self, hostname: impl Into<String>, address: SocketAddr) {
        self.hosts.insert(hostname.into(), address);
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl HostResolver for StaticResolver {
    fn resolve(&self, hostname: &str) -> BackendResult<SocketAddr> {
        if let Ok(address) = hostname.parse::<SocketAddr>() {
            return Ok(address);
        }
        let address = self
            .hosts
            .get(hostname)
            .copied()
            .ok_or_else(|| BackendError::resolve(hostname))?;
        debug!("resolved {} to {}", hostname, address);
        Ok(address)
    }
}

impl FromIterator<(String, SocketAddr)> for StaticResolver {
    fn from_iter<I: IntoIterator<Item = (String, SocketAddr)>>(iter: I) -> Self {
        Self {
            hosts: iter.into_iter().collect(),
        }
    }
}
