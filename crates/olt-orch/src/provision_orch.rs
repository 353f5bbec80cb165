//! Orchestrator applying queued provisioning requests to the topology.

use std::collections::HashSet;

use async_trait::async_trait;
use olt_chassis::{ChassisResult, Ont, Topology};
use tracing::{debug, error, info, warn};

use crate::consumer::{Consumer, ConsumerConfig, Task};
use crate::orch::Orch;
use crate::request::ProvisionRequest;
use crate::task::{TaskError, TaskResult, TaskResultExt, TaskStatus};

/// Consumer name for provisioning requests.
pub const PROVISION_QUEUE: &str = "ONT_PROVISION";

#[derive(Debug, Clone)]
pub struct ProvisionOrchConfig {
    /// Retries allowed for a request failing with a transient backend error.
    pub max_retries: u32,
}

impl Default for ProvisionOrchConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionOrchStats {
    pub processed: u64,
    pub succeeded: u64,
    pub invalid: u64,
    pub failed: u64,
    pub retried: u64,
}

/// Applies [`ProvisionRequest`]s to a [`Topology`].
#[derive(Debug)]
pub struct ProvisionOrch {
    config: ProvisionOrchConfig,
    stats: ProvisionOrchStats,
    topology: Topology,
    consumer: Consumer,
}

impl ProvisionOrch {
    pub fn new(topology: Topology, config: ProvisionOrchConfig) -> Self {
        Self {
            config,
            stats: ProvisionOrchStats::default(),
            topology,
            consumer: Consumer::new(ConsumerConfig::new(PROVISION_QUEUE)),
        }
    }

    pub fn config(&self) -> &ProvisionOrchConfig {
        &self.config
    }

    pub fn stats(&self) -> &ProvisionOrchStats {
        &self.stats
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn topology_mut(&mut self) -> &mut Topology {
        &mut self.topology
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    /// Queues requests for the next [`Orch::do_task`] pass.
    pub fn add_requests(&mut self, requests: impl IntoIterator<Item = ProvisionRequest>) {
        self.consumer.add_to_sync(requests);
    }

    /// Applies a single request to the topology.
    pub fn apply(&mut self, request: &ProvisionRequest) -> ChassisResult<()> {
        match request {
            ProvisionRequest::PreProvision { slot, port, ont, .. } => {
                let profile = request.profile().unwrap_or_default();
                self.topology
                    .abstract_chassis_mut()
                    .pre_provision_ont(*slot, *port, *ont, &profile)
            }
            ProvisionRequest::ActivateSerial {
                slot,
                port,
                ont,
                serial_number,
            } => self
                .topology
                .abstract_chassis_mut()
                .activate_serial(*slot, *port, *ont, serial_number),
            ProvisionRequest::ActivateFull {
                slot,
                port,
                ont,
                serial_number,
                ..
            } => {
                let subscriber = request.subscriber().unwrap_or_default();
                self.topology.abstract_chassis_mut().activate_ont_full(
                    *slot,
                    *port,
                    *ont,
                    serial_number,
                    &subscriber,
                )
            }
            ProvisionRequest::Activate {
                slot,
                port,
                ont,
                serial_number,
            } => self
                .topology
                .abstract_chassis_mut()
                .activate_ont(*slot, *port, *ont, serial_number),
            ProvisionRequest::Delete {
                slot,
                port,
                ont,
                serial_number,
            } => self
                .topology
                .abstract_chassis_mut()
                .delete_ont(*slot, *port, *ont, serial_number),
            ProvisionRequest::ActivateSlot { slot } => {
                self.topology.physical_chassis_mut().activate_slot(*slot)
            }
            ProvisionRequest::ProvisionPhysical {
                slot,
                pon_port,
                ont,
                serial_number,
                s_vlan,
                c_vlan,
            } => {
                let record = Ont {
                    number: *ont,
                    serial_number: serial_number.clone(),
                    s_tag: *s_vlan,
                    c_tag: *c_vlan,
                    ..Default::default()
                };
                self.topology
                    .physical_chassis_mut()
                    .provision_ont(*slot, *pon_port, record)
            }
        }
    }

    /// Applies a request and classifies the outcome.
    pub fn process(&mut self, request: &ProvisionRequest) -> TaskResult<()> {
        self.apply(request).map_err(TaskError::from)
    }

    /// Applies one task and re-queues it if it may succeed later.
    /// Returns true if the task went back on the queue.
    fn handle(&mut self, mut task: Task) -> bool {
        let result = self.process(&task.request);
        self.stats.processed += 1;

        match (result.to_status(), result) {
            (TaskStatus::Success, _) => {
                self.stats.succeeded += 1;
                debug!("{}: {} done", PROVISION_QUEUE, task.request);
                false
            }
            (TaskStatus::NeedRetry, Err(e)) if task.attempts < self.config.max_retries => {
                task.attempts += 1;
                self.stats.retried += 1;
                warn!(
                    "{}: {} will be retried (attempt {}/{}): {}",
                    PROVISION_QUEUE, task.request, task.attempts, self.config.max_retries, e
                );
                self.consumer.retry(task);
                true
            }
            (TaskStatus::InvalidEntry, Err(e)) => {
                self.stats.invalid += 1;
                warn!("{}: rejected {}: {}", PROVISION_QUEUE, task.request, e);
                false
            }
            (_, Err(e)) => {
                self.stats.failed += 1;
                error!(
                    "{}: {} failed after {} attempt(s): {}",
                    PROVISION_QUEUE,
                    task.request,
                    task.attempts + 1,
                    e
                );
                false
            }
            (_, Ok(())) => false,
        }
    }
}

#[async_trait]
impl Orch for ProvisionOrch {
    fn name(&self) -> &str {
        "ProvisionOrch"
    }

    async fn do_task(&mut self) {
        let tasks = self.consumer.drain();
        if tasks.is_empty() {
            return;
        }
        info!("{}: processing {} request(s)", PROVISION_QUEUE, tasks.len());

        // Once a key is re-queued, later requests for it wait behind the retry.
        let mut deferred: HashSet<String> = HashSet::new();
        for task in tasks {
            let key = task.key();
            if deferred.contains(&key) {
                self.consumer.push(task);
                continue;
            }
            if self.handle(task) {
                deferred.insert(key);
            }
        }
    }

    fn has_pending_tasks(&self) -> bool {
        self.consumer.has_pending()
    }

    fn dump_pending_tasks(&self) -> Vec<String> {
        self.consumer.dump()
    }
}
