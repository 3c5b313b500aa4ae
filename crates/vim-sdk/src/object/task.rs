use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};
use vim_proto::methods::CancelTask;
use vim_proto::types::{LocalizedMethodFault, TaskInfo, TaskInfoState};
use vim_proto::{mo, ManagedObjectReference};

use super::{Common, Reference};
use crate::{Client, VimError, VimResult};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Handle for an asynchronous remote operation.
///
/// Waiting polls the task's `info` property. Drop the future (or wrap it in
/// `tokio::time::timeout`) to stop waiting; the remote task keeps running
/// unless [`Task::cancel`] is called.
#[derive(Debug, Clone)]
pub struct Task {
    common: Common,
    poll_interval: Duration,
}

impl Task {
    pub fn new(client: Client, reference: ManagedObjectReference) -> Self {
        Self {
            common: Common::new(client, reference),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub async fn info(&self) -> VimResult<TaskInfo> {
        let task: mo::Task = self.common.properties(&["info"]).await?;
        task.info.ok_or_else(|| VimError::MissingProperty {
            this: self.reference(),
            property: "info".into(),
        })
    }

    pub async fn wait(&self) -> VimResult<()> {
        self.wait_for_result().await.map(|_| ())
    }

    /// Polls until the task succeeds or fails. A failed task surfaces its
    /// remote fault as [`VimError::TaskFailed`].
    pub async fn wait_for_result(&self) -> VimResult<TaskInfo> {
        loop {
            let info = self.info().await?;
            if !info.state.is_terminal() {
                debug!(
                    target = "vim.task",
                    task = %self.common,
                    state = ?info.state,
                    progress = ?info.progress,
                    "task pending"
                );
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }
            if info.state == TaskInfoState::Success {
                info!(
                    target = "vim.task",
                    task = %self.common,
                    description = %info.description_id,
                    "task completed"
                );
                return Ok(info);
            }
            let fault = info.error.unwrap_or_else(|| {
                LocalizedMethodFault::new("MethodFault", "task failed without fault detail")
            });
            warn!(
                target = "vim.task",
                task = %self.common,
                fault = fault.type_name(),
                "task failed"
            );
            return Err(VimError::TaskFailed {
                task: self.reference(),
                fault,
            });
        }
    }

    pub async fn cancel(&self) -> VimResult<()> {
        let req = CancelTask {
            this: self.reference(),
        };
        self.common.client().call(&req).await
    }
}

impl Reference for Task {
    fn reference(&self) -> ManagedObjectReference {
        self.common.reference()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.common, f)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::InMemoryTransport;

    fn task_ref() -> ManagedObjectReference {
        ManagedObjectReference::new("Task", "task-301")
    }

    fn info(state: &str) -> serde_json::Value {
        json!({
            "key": "task-301",
            "task": { "type": "Task", "value": "task-301" },
            "descriptionId": "ResourcePool.destroy",
            "state": state,
            "progress": 40
        })
    }

    fn setup() -> (Arc<InMemoryTransport>, Task) {
        let transport = InMemoryTransport::new();
        let task = Task::new(Client::new(transport.clone()), task_ref())
            .with_poll_interval(Duration::from_millis(1));
        (transport, task)
    }

    #[tokio::test]
    async fn wait_polls_until_success() {
        let (transport, task) = setup();
        transport.set_property(&task_ref(), "info", info("queued"));
        transport.set_property(&task_ref(), "info", info("running"));
        transport.set_property(&task_ref(), "info", info("success"));

        let result = task.wait_for_result().await.unwrap();
        assert_eq!(result.state, TaskInfoState::Success);
        assert_eq!(transport.reads().len(), 3);
    }

    #[tokio::test]
    async fn wait_surfaces_remote_fault() {
        let (transport, task) = setup();
        let mut failed = info("error");
        failed["error"] = json!({
            "fault": { "_typeName": "ResourceInUse" },
            "localizedMessage": "The resource 'batch' is in use."
        });
        transport.set_property(&task_ref(), "info", failed);

        match task.wait().await.unwrap_err() {
            VimError::TaskFailed { task, fault } => {
                assert_eq!(task, task_ref());
                assert_eq!(fault.type_name(), "ResourceInUse");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_without_detail_still_fails() {
        let (transport, task) = setup();
        transport.set_property(&task_ref(), "info", info("error"));

        let err = task.wait().await.unwrap_err();
        assert_eq!(err.fault_type(), Some("MethodFault"));
    }

    #[tokio::test]
    async fn missing_info_is_reported() {
        let (_, task) = setup();
        let err = task.info().await.unwrap_err();
        assert!(matches!(err, VimError::MissingProperty { .. }));
    }

    #[tokio::test]
    async fn wait_can_be_abandoned_with_timeout() {
        let (transport, task) = setup();
        transport.set_property(&task_ref(), "info", info("running"));

        let res = tokio::time::timeout(Duration::from_millis(20), task.wait()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn cancel_invokes_cancel_task() {
        let (transport, task) = setup();
        task.cancel().await.unwrap();

        let call = transport.last_call().unwrap();
        assert_eq!(call.this, task_ref());
        assert_eq!(call.method, "CancelTask");
    }
}
