//! Backend that logs each call instead of contacting equipment.
//!
//! Used by the daemon when no real backend is configured, and as the
//! default collaborator for a freshly built chassis.

use std::net::SocketAddr;

use log::info;
use olt_types::Clli;

use crate::api::{
    OntDeleteRequest, OntProvisionRequest, PhysicalOntRequest, PonPortRef, ProvisioningBackend,
};
use crate::error::BackendResult;

/// A backend that accepts every request and logs it.
#[derive(Debug, Clone, Default)]
pub struct LoggingBackend;

impl LoggingBackend {
    pub fn new() -> Self {
        Self
    }
}

fn pon_target(pon_port: Option<&PonPortRef>) -> String {
    match pon_port {
        Some(pon) => format!("{}/pon{}", pon.olt_hostname, pon.pon_port),
        None => "unbound".to_string(),
    }
}

impl ProvisioningBackend for LoggingBackend {
    fn name(&self) -> &str {
        "logging"
    }

    fn add_olt(&self, clli: &Clli, hostname: &str, address: SocketAddr) -> BackendResult<()> {
        info!("backend.add_olt({}, {}, {})", clli, hostname, address);
        Ok(())
    }

    fn activate_olt(&self, hostname: &str) -> BackendResult<()> {
        info!("backend.activate_olt({})", hostname);
        Ok(())
    }

    fn pre_provision_ont(&self, request: &OntProvisionRequest) -> BackendResult<()> {
        info!(
            "backend.pre_provision_ont({} on {}, STag:{}, CTag:{}, tech:{}, speed:{})",
            request.address,
            pon_target(request.pon_port.as_ref()),
            request.s_tag,
            request.c_tag,
            request.tech_profile,
            request.speed_profile
        );
        Ok(())
    }

    fn activate_ont(&self, request: &OntProvisionRequest) -> BackendResult<()> {
        info!(
            "backend.activate_ont({} on {}, serial:{}, STag:{}, CTag:{})",
            request.address,
            pon_target(request.pon_port.as_ref()),
            request.serial_number,
            request.s_tag,
            request.c_tag
        );
        Ok(())
    }

    fn delete_ont(&self, request: &OntDeleteRequest) -> BackendResult<()> {
        info!(
            "backend.delete_ont({} on {}, serial:{})",
            request.address,
            pon_target(request.pon_port.as_ref()),
            request.serial_number
        );
        Ok(())
    }

    fn provision_physical_ont(&self, request: &PhysicalOntRequest) -> BackendResult<()> {
        info!(
            "chassis.provisionONT({},SVlan:{},CVlan:{}) on {} {} ont {}",
            request.serial_number,
            request.s_vlan,
            request.c_vlan,
            request.clli,
            pon_target(Some(&request.pon_port)),
            request.ont
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olt_types::OntAddress;

    #[test]
    fn test_logging_backend_accepts_everything() {
        let backend = LoggingBackend::new();
        let request = OntProvisionRequest {
            address: OntAddress::new(1, 1, 1),
            serial_number: "ALPHe3d1cfde".to_string(),
            ..Default::default()
        };

        assert_eq!(backend.name(), "logging");
        assert!(backend.pre_provision_ont(&request).is_ok());
        assert!(backend.activate_ont(&request).is_ok());
        assert!(backend
            .delete_ont(&OntDeleteRequest {
                address: request.address,
                pon_port: None,
                serial_number: request.serial_number.clone(),
            })
            .is_ok());
    }

    #[test]
    fn test_pon_target() {
        assert_eq!(pon_target(None), "unbound");
        assert_eq!(pon_target(Some(&PonPortRef::new("olt1", 3))), "olt1/pon3");
    }
}
