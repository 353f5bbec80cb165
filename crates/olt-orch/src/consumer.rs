//! Per-key FIFO queue of pending provisioning requests.

use std::collections::{BTreeMap, VecDeque};

use crate::request::ProvisionRequest;

/// A queued request and the number of times it has been retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub request: ProvisionRequest,
    pub attempts: u32,
}

impl Task {
    pub fn new(request: ProvisionRequest) -> Self {
        Self {
            request,
            attempts: 0,
        }
    }

    pub fn key(&self) -> String {
        self.request.key()
    }
}

/// Configuration for a Consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Queue name (for logging)
    pub name: String,
    /// Priority (lower = higher priority)
    pub priority: i32,
}

impl ConsumerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Pending requests grouped by [`ProvisionRequest::key`].
///
/// Requests for the same key keep their arrival order. Unlike table
/// consumers, nothing is merged: every request is a separate state
/// transition and must be applied.
#[derive(Debug)]
pub struct Consumer {
    config: ConsumerConfig,
    to_sync: BTreeMap<String, VecDeque<Task>>,
    pending_count: usize,
}

impl Consumer {
    pub fn new(config: ConsumerConfig) -> Self {
        Self {
            config,
            to_sync: BTreeMap::new(),
            pending_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn priority(&self) -> i32 {
        self.config.priority
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count > 0
    }

    pub fn pending_count(&self) -> usize {
        self.pending_count
    }

    /// Queues new requests behind any pending ones for the same key.
    pub fn add_to_sync(&mut self, requests: impl IntoIterator<Item = ProvisionRequest>) {
        for request in requests {
            self.push(Task::new(request));
        }
    }

    /// Appends a task to the back of its key's queue.
    pub fn push(&mut self, task: Task) {
        self.to_sync.entry(task.key()).or_default().push_back(task);
        self.pending_count += 1;
    }

    /// Drains all pending tasks, grouped by key in key order.
    pub fn drain(&mut self) -> Vec<Task> {
        let mut result = Vec::with_capacity(self.pending_count);
        for (_key, queue) in std::mem::take(&mut self.to_sync) {
            result.extend(queue);
        }
        self.pending_count = 0;
        result
    }

    /// Peeks at pending tasks without removing them.
    pub fn peek(&self) -> impl Iterator<Item = &Task> {
        self.to_sync.values().flat_map(|q| q.iter())
    }

    /// Re-queues a task at the front of its key's queue.
    pub fn retry(&mut self, task: Task) {
        self.to_sync.entry(task.key()).or_default().push_front(task);
        self.pending_count += 1;
    }

    pub fn clear(&mut self) {
        self.to_sync.clear();
        self.pending_count = 0;
    }

    /// Dumps pending tasks for debugging.
    pub fn dump(&self) -> Vec<String> {
        self.to_sync
            .iter()
            .flat_map(|(key, queue)| {
                queue.iter().map(move |task| {
                    format!("{}: {} (attempts {})", key, task.request.op_name(), task.attempts)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn activate(slot: u32, ont: u32) -> ProvisionRequest {
        ProvisionRequest::Activate {
            slot,
            port: 1,
            ont,
            serial_number: format!("SN{ont}"),
        }
    }

    fn delete(slot: u32, ont: u32) -> ProvisionRequest {
        ProvisionRequest::Delete {
            slot,
            port: 1,
            ont,
            serial_number: format!("SN{ont}"),
        }
    }

    #[test]
    fn test_consumer_basic() {
        let mut consumer = Consumer::new(ConsumerConfig::new("ONT_PROVISION").with_priority(1));
        assert_eq!(consumer.name(), "ONT_PROVISION");
        assert_eq!(consumer.priority(), 1);
        assert!(!consumer.has_pending());

        consumer.add_to_sync(vec![activate(1, 1)]);
        assert!(consumer.has_pending());
        assert_eq!(consumer.pending_count(), 1);
    }

    #[test]
    fn test_same_key_keeps_order() {
        let mut consumer = Consumer::new(ConsumerConfig::new("ONT_PROVISION"));
        consumer.add_to_sync(vec![activate(1, 1), delete(1, 1), activate(1, 1)]);

        // Nothing is merged.
        assert_eq!(consumer.pending_count(), 3);
        let ops: Vec<&str> = consumer.drain().iter().map(|t| t.request.op_name()).collect();
        assert_eq!(ops, vec!["activate", "delete", "activate"]);
        assert!(!consumer.has_pending());
    }

    #[test]
    fn test_drain_groups_by_key() {
        let mut consumer = Consumer::new(ConsumerConfig::new("ONT_PROVISION"));
        consumer.add_to_sync(vec![activate(2, 1), activate(1, 1), delete(2, 1)]);

        let keys: Vec<String> = consumer.drain().iter().map(Task::key).collect();
        assert_eq!(keys, vec!["1|1|1", "2|1|1", "2|1|1"]);
    }

    #[test]
    fn test_retry_goes_to_front() {
        let mut consumer = Consumer::new(ConsumerConfig::new("ONT_PROVISION"));
        consumer.add_to_sync(vec![delete(1, 1)]);

        let mut task = Task::new(activate(1, 1));
        task.attempts = 1;
        consumer.retry(task);

        assert_eq!(
            consumer.dump(),
            vec![
                "1|1|1: activate (attempts 1)".to_string(),
                "1|1|1: delete (attempts 0)".to_string(),
            ]
        );
        assert_eq!(consumer.peek().count(), 2);

        consumer.clear();
        assert_eq!(consumer.pending_count(), 0);
    }
}
