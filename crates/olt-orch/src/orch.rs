//! Base Orch trait.

use async_trait::async_trait;

/// Base trait for orchestration agents.
///
/// The daemon loop calls [`Orch::do_task`] while
/// [`Orch::has_pending_tasks`] reports queued work.
#[async_trait]
pub trait Orch: Send + Sync {
    /// Returns the name of this Orch (for logging and debugging).
    fn name(&self) -> &str;

    /// Processes pending tasks from all consumers.
    ///
    /// Implementations drain their consumers, apply each entry and
    /// re-queue the ones that should be retried.
    async fn do_task(&mut self);

    /// Returns the priority of this Orch (lower = higher priority).
    fn priority(&self) -> i32 {
        0
    }

    /// Returns true if this Orch has pending work.
    fn has_pending_tasks(&self) -> bool {
        false
    }

    /// Dumps pending tasks for debugging.
    fn dump_pending_tasks(&self) -> Vec<String> {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestOrch {
        name: String,
        task_count: usize,
    }

    #[async_trait]
    impl Orch for TestOrch {
        fn name(&self) -> &str {
            &self.name
        }

        async fn do_task(&mut self) {
            self.task_count += 1;
        }

        fn has_pending_tasks(&self) -> bool {
            self.task_count < 10
        }
    }

    #[tokio::test]
    async fn test_orch_trait_defaults() {
        let mut orch = TestOrch {
            name: "test".to_string(),
            task_count: 0,
        };

        assert_eq!(orch.name(), "test");
        assert_eq!(orch.priority(), 0);
        assert!(orch.has_pending_tasks());
        assert!(orch.dump_pending_tasks().is_empty());

        orch.do_task().await;
        assert_eq!(orch.task_count, 1);
    }
}
