use std::fmt;

use vim_proto::methods::{PowerOffVAppTask, PowerOnVAppTask, SuspendVAppTask};
use vim_proto::ManagedObjectReference;

use super::{Reference, ResourcePool, Task};
use crate::{Client, VimResult};

/// A vApp is a resource pool with a power lifecycle. Pool operations are
/// reached through [`VirtualApp::pool`].
#[derive(Debug, Clone)]
pub struct VirtualApp {
    pool: ResourcePool,
}

impl VirtualApp {
    pub fn new(client: Client, reference: ManagedObjectReference) -> Self {
        Self {
            pool: ResourcePool::new(client, reference),
        }
    }

    pub fn with_inventory_path(mut self, path: impl Into<String>) -> Self {
        self.pool = self.pool.with_inventory_path(path);
        self
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn into_pool(self) -> ResourcePool {
        self.pool
    }

    pub async fn name(&self) -> VimResult<String> {
        self.pool.name().await
    }

    pub async fn power_on(&self) -> VimResult<Task> {
        let req = PowerOnVAppTask {
            this: self.reference(),
        };
        self.start(&req).await
    }

    pub async fn power_off(&self, force: bool) -> VimResult<Task> {
        let req = PowerOffVAppTask {
            this: self.reference(),
            force,
        };
        self.start(&req).await
    }

    pub async fn suspend(&self) -> VimResult<Task> {
        let req = SuspendVAppTask {
            this: self.reference(),
        };
        self.start(&req).await
    }

    async fn start<M>(&self, req: &M) -> VimResult<Task>
    where
        M: vim_proto::Method<Response = ManagedObjectReference>,
    {
        let client = self.pool.common().client();
        let task = client.call(req).await?;
        Ok(Task::new(client.clone(), task))
    }
}

impl Reference for VirtualApp {
    fn reference(&self) -> ManagedObjectReference {
        self.pool.reference()
    }
}

impl fmt::Display for VirtualApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.pool, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryTransport;

    #[tokio::test]
    async fn power_off_passes_force_and_returns_task() {
        let transport = InMemoryTransport::new();
        let vapp_ref = ManagedObjectReference::new("VirtualApp", "resgroup-v20");
        transport.reply(
            "PowerOffVApp_Task",
            ManagedObjectReference::new("Task", "task-88"),
        );
        let vapp = VirtualApp::new(Client::new(transport.clone()), vapp_ref.clone());

        let task = vapp.power_off(true).await.unwrap();
        assert_eq!(task.reference(), ManagedObjectReference::new("Task", "task-88"));

        let call = transport.last_call().unwrap();
        assert_eq!(call.this, vapp_ref);
        assert_eq!(call.body["force"], true);
    }

    #[tokio::test]
    async fn power_on_starts_power_on_task() {
        let transport = InMemoryTransport::new();
        let vapp_ref = ManagedObjectReference::new("VirtualApp", "resgroup-v20");
        transport.reply(
            "PowerOnVApp_Task",
            ManagedObjectReference::new("Task", "task-91"),
        );
        let vapp = VirtualApp::new(Client::new(transport.clone()), vapp_ref.clone());

        let task = vapp.power_on().await.unwrap();
        assert_eq!(task.reference(), ManagedObjectReference::new("Task", "task-91"));

        let call = transport.last_call().unwrap();
        assert_eq!(call.method, "PowerOnVApp_Task");
        assert_eq!(call.this, vapp_ref);
    }

    #[tokio::test]
    async fn suspend_starts_suspend_task() {
        let transport = InMemoryTransport::new();
        let vapp_ref = ManagedObjectReference::new("VirtualApp", "resgroup-v20");
        transport.reply(
            "SuspendVApp_Task",
            ManagedObjectReference::new("Task", "task-92"),
        );
        let vapp = VirtualApp::new(Client::new(transport.clone()), vapp_ref.clone());

        let task = vapp.suspend().await.unwrap();
        assert_eq!(task.reference(), ManagedObjectReference::new("Task", "task-92"));

        let call = transport.last_call().unwrap();
        assert_eq!(call.method, "SuspendVApp_Task");
        assert_eq!(call.this, vapp_ref);
    }

    #[tokio::test]
    async fn pool_operations_target_the_vapp() {
        let transport = InMemoryTransport::new();
        let vapp_ref = ManagedObjectReference::new("VirtualApp", "resgroup-v20");
        let vapp = VirtualApp::new(Client::new(transport.clone()), vapp_ref.clone());

        vapp.pool().destroy_children().await.unwrap();
        assert_eq!(transport.last_call().unwrap().this, vapp_ref);
    }
}
