//! Request processing loop and state dump.

use std::time::Duration;

use olt_backend::PonPortRef;
use olt_chassis::{Ont, Topology};
use olt_orch::{Orch, ProvisionOrch};
use olt_types::OntAddress;
use serde::Serialize;
use tracing::{debug, info};

/// Runs orchestrator passes until no request is pending, sleeping
/// `retry_interval` between passes. Returns the number of passes.
pub async fn run_until_idle(orch: &mut ProvisionOrch, retry_interval: Duration) -> usize {
    let mut passes = 0;
    while orch.has_pending_tasks() {
        if passes > 0 {
            debug!(
                "{} request(s) pending retry: {:?}",
                orch.consumer().pending_count(),
                orch.dump_pending_tasks()
            );
            tokio::time::sleep(retry_interval).await;
        }
        orch.do_task().await;
        passes += 1;
    }
    info!("{} idle after {} pass(es)", orch.name(), passes);
    passes
}

/// A provisioned ONT of the abstract chassis, as dumped by `--dump`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OntRecord {
    /// `slot|port|ont` address on the abstract chassis.
    pub address: String,
    /// Physical PON port backing the abstract port, when bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pon_port: Option<PonPortRef>,
    pub ont: Ont,
}

/// Collects every provisioned ONT of the abstract chassis in address order.
pub fn dump_onts(topology: &Topology) -> Vec<OntRecord> {
    topology
        .abstract_chassis()
        .ports()
        .flat_map(|port| {
            let (slot, port_number) = port.numbers();
            port.provisioned_onts().map(move |ont| OntRecord {
                address: OntAddress::new(slot, port_number, ont.number).to_string(),
                pon_port: port.pon_port().cloned(),
                ont: ont.clone(),
            })
        })
        .collect()
}
