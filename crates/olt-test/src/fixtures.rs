//! Test fixtures for common provisioning patterns

use std::net::SocketAddr;
use std::sync::{Arc, Once};

use olt_backend::RecordingBackend;
use olt_chassis::{AbstractChassis, DataSwitch, PhysicalChassis, Topology};
use olt_orch::{ProvisionOrch, ProvisionOrchConfig};
use olt_types::Clli;

pub const ABSTRACT_CLLI: &str = "ABSTRACT1";
pub const PHYSICAL_CLLI: &str = "NYCMNY01";

static LOGGING: Once = Once::new();

/// Routes `log` and `tracing` output to the test harness. Set RUST_LOG to see it.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Address of the vCore controller (`10.0.0.1:9191`).
pub fn vcore_address() -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 1], 9191))
}

/// Address of the n-th test OLT (`10.0.1.n:9191`).
pub fn olt_address(n: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 1, n], 9191))
}

/// A topology wired to a shared [`RecordingBackend`].
#[derive(Debug)]
pub struct TestEnv {
    pub backend: Arc<RecordingBackend>,
    pub topology: Topology,
}

impl TestEnv {
    /// Empty chassis pair with no OLTs installed.
    pub fn new() -> Self {
        init_test_logging();
        let backend = Arc::new(RecordingBackend::new());
        let abstract_chassis = AbstractChassis::new(clli(ABSTRACT_CLLI), 1, 1)
            .with_backend(backend.clone());
        let physical_chassis = PhysicalChassis::new(
            clli(PHYSICAL_CLLI),
            vcore_address(),
            DataSwitch::new("switch1.lab"),
        )
        .with_backend(backend.clone());
        Self {
            backend,
            topology: Topology::new(abstract_chassis, physical_chassis),
        }
    }

    /// Installs `count` OLTs named `oltN.lab`, each with `pon_ports` ports.
    pub fn with_olts(mut self, count: u8, pon_ports: u32) -> Self {
        for n in 1..=count {
            let hostname = format!("olt{n}.lab");
            if let Err(e) = self
                .topology
                .add_simple_olt(&hostname, Some(olt_address(n)), pon_ports)
            {
                panic!("failed to add {hostname}: {e}");
            }
        }
        self
    }

    /// Wraps the topology in an orchestrator.
    pub fn into_orch(self, max_retries: u32) -> (ProvisionOrch, Arc<RecordingBackend>) {
        let orch = ProvisionOrch::new(self.topology, ProvisionOrchConfig { max_retries });
        (orch, self.backend)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn clli(code: &str) -> Clli {
    match Clli::new(code) {
        Ok(clli) => clli,
        Err(e) => panic!("fixture CLLI {code:?}: {e}"),
    }
}

/// Common provisioning request fixtures
pub mod request_fixtures {
    use olt_orch::ProvisionRequest;

    pub fn serial(slot: u32, port: u32, ont: u32) -> String {
        format!("ALPH{slot:02}{port:02}{ont:02}")
    }

    pub fn activate(slot: u32, port: u32, ont: u32) -> ProvisionRequest {
        ProvisionRequest::Activate {
            slot,
            port,
            ont,
            serial_number: serial(slot, port, ont),
        }
    }

    pub fn delete(slot: u32, port: u32, ont: u32) -> ProvisionRequest {
        ProvisionRequest::Delete {
            slot,
            port,
            ont,
            serial_number: serial(slot, port, ont),
        }
    }

    /// Pre-provisioning with S-tag 100 + slot and C-tag 200 + ont.
    pub fn pre_provision(slot: u32, port: u32, ont: u32) -> ProvisionRequest {
        ProvisionRequest::PreProvision {
            slot,
            port,
            ont,
            s_tag: 100 + slot,
            c_tag: 200 + ont,
            nas_port_id: format!("nas-{slot}-{port}-{ont}"),
            circuit_id: format!("circuit-{slot}-{port}-{ont}"),
            tech_profile: "gpon-default".to_string(),
            speed_profile: "1g".to_string(),
        }
    }

    pub fn activate_serial(slot: u32, port: u32, ont: u32) -> ProvisionRequest {
        ProvisionRequest::ActivateSerial {
            slot,
            port,
            ont,
            serial_number: serial(slot, port, ont),
        }
    }

    pub fn activate_full(slot: u32, port: u32, ont: u32) -> ProvisionRequest {
        ProvisionRequest::ActivateFull {
            slot,
            port,
            ont,
            serial_number: serial(slot, port, ont),
            s_tag: 100 + slot,
            c_tag: 200 + ont,
            nas_port_id: format!("nas-{slot}-{port}-{ont}"),
            circuit_id: format!("circuit-{slot}-{port}-{ont}"),
        }
    }

    /// Full subscriber lifecycle on one ONT: pre-provision, bind serial, delete.
    pub fn lifecycle(slot: u32, port: u32, ont: u32) -> Vec<ProvisionRequest> {
        vec![
            pre_provision(slot, port, ont),
            activate_serial(slot, port, ont),
            delete(slot, port, ont),
        ]
    }
}
