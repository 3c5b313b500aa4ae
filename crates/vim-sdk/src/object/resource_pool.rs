use std::fmt;

use vim_proto::methods::{
    CreateResourcePool, CreateVApp, DestroyChildren, DestroyTask, ImportVApp, UpdateConfig,
};
use vim_proto::types::{ImportSpec, ResourceConfigSpec, VAppConfigSpec};
use vim_proto::{mo, ManagedObjectReference};

use super::{fmt_with_path, Common, Folder, HostSystem, HttpNfcLease, Reference, Task, VirtualApp};
use crate::{Client, VimResult};

/// Client-side handle for a resource pool.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    common: Common,
    pub inventory_path: Option<String>,
}

impl ResourcePool {
    pub fn new(client: Client, reference: ManagedObjectReference) -> Self {
        Self {
            common: Common::new(client, reference),
            inventory_path: None,
        }
    }

    pub fn with_inventory_path(mut self, path: impl Into<String>) -> Self {
        self.inventory_path = Some(path.into());
        self
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    fn client(&self) -> &Client {
        self.common.client()
    }

    /// Display name of the pool; empty when the server reports none.
    pub async fn name(&self) -> VimResult<String> {
        let pool: mo::ResourcePool = self.common.properties(&["name"]).await?;
        Ok(pool.name)
    }

    /// Starts importing a packaged application into this pool. The folder
    /// and host scope the import only when given.
    pub async fn import_vapp(
        &self,
        spec: ImportSpec,
        folder: Option<&Folder>,
        host: Option<&HostSystem>,
    ) -> VimResult<HttpNfcLease> {
        let req = ImportVApp {
            this: self.reference(),
            spec,
            folder: folder.map(|folder| folder.reference()),
            host: host.map(|host| host.reference()),
        };
        let lease = self.client().call(&req).await?;
        Ok(HttpNfcLease::new(self.client().clone(), lease))
    }

    /// Creates a child pool.
    pub async fn create(&self, name: &str, spec: ResourceConfigSpec) -> VimResult<ResourcePool> {
        let req = CreateResourcePool {
            this: self.reference(),
            name: name.to_string(),
            spec,
        };
        let child = self.client().call(&req).await?;
        Ok(ResourcePool::new(self.client().clone(), child))
    }

    pub async fn create_vapp(
        &self,
        name: &str,
        res_spec: ResourceConfigSpec,
        config_spec: VAppConfigSpec,
        folder: Option<&Folder>,
    ) -> VimResult<VirtualApp> {
        let req = CreateVApp {
            this: self.reference(),
            name: name.to_string(),
            res_spec,
            config_spec,
            vm_folder: folder.map(|folder| folder.reference()),
        };
        let vapp = self.client().call(&req).await?;
        Ok(VirtualApp::new(self.client().clone(), vapp))
    }

    /// Renames and/or reconfigures the pool. An empty name leaves the name
    /// unchanged. A config without an `entity`
    /// is sent as a copy pointing back at this pool; the caller's value is
    /// left as it was.
    pub async fn update_config(
        &self,
        name: Option<&str>,
        config: Option<&ResourceConfigSpec>,
    ) -> VimResult<()> {
        let config = config.map(|config| {
            let mut config = config.clone();
            if config.entity.is_none() {
                config.entity = Some(self.reference());
            }
            config
        });
        let req = UpdateConfig {
            this: self.reference(),
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
            config,
        };
        self.client().call(&req).await
    }

    /// Destroys every child pool and vApp, moving their VMs into this pool.
    pub async fn destroy_children(&self) -> VimResult<()> {
        let req = DestroyChildren {
            this: self.reference(),
        };
        self.client().call(&req).await
    }

    pub async fn destroy(&self) -> VimResult<Task> {
        let req = DestroyTask {
            this: self.reference(),
        };
        let task = self.client().call(&req).await?;
        Ok(Task::new(self.client().clone(), task))
    }
}

impl Reference for ResourcePool {
    fn reference(&self) -> ManagedObjectReference {
        self.common.reference()
    }
}

impl fmt::Display for ResourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_path(&self.common, self.inventory_path.as_deref(), f)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use vim_proto::types::{
        ResourceAllocationInfo, VirtualMachineConfigSpec, VirtualMachineImportSpec,
    };

    use super::*;
    use crate::{InMemoryTransport, VimError};

    fn pool_ref() -> ManagedObjectReference {
        ManagedObjectReference::new("ResourcePool", "resgroup-9")
    }

    fn setup() -> (Arc<InMemoryTransport>, ResourcePool) {
        let transport = InMemoryTransport::new();
        let pool = ResourcePool::new(Client::new(transport.clone()), pool_ref());
        (transport, pool)
    }

    fn vm_import_spec() -> ImportSpec {
        ImportSpec::VirtualMachine(VirtualMachineImportSpec {
            entity_config: None,
            config_spec: VirtualMachineConfigSpec {
                name: Some("db-01".into()),
                ..Default::default()
            },
            res_pool_entity: None,
        })
    }

    fn limited_spec() -> ResourceConfigSpec {
        ResourceConfigSpec {
            cpu_allocation: ResourceAllocationInfo {
                limit: Some(4000),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn display_includes_inventory_path_when_set() {
        let (_, pool) = setup();
        assert_eq!(pool.to_string(), "ResourcePool:resgroup-9");

        let pool = pool.with_inventory_path("/dc1/host/cluster/Resources/batch");
        assert_eq!(
            pool.to_string(),
            "ResourcePool:resgroup-9 @ /dc1/host/cluster/Resources/batch"
        );
    }

    #[tokio::test]
    async fn name_reads_the_name_property() {
        let (transport, pool) = setup();
        transport.set_property(&pool_ref(), "name", "batch");

        assert_eq!(pool.name().await.unwrap(), "batch");
        assert_eq!(transport.reads(), vec![(pool_ref(), "name".to_string())]);
    }

    #[tokio::test]
    async fn name_is_empty_when_unset() {
        let (_, pool) = setup();
        assert_eq!(pool.name().await.unwrap(), "");
    }

    #[tokio::test]
    async fn import_vapp_maps_folder_and_host() {
        let (transport, pool) = setup();
        let lease_ref = ManagedObjectReference::new("HttpNfcLease", "session[52]lease");
        transport.reply("ImportVApp", &lease_ref);
        let client = pool.common().client().clone();
        let folder = Folder::new(client.clone(), ManagedObjectReference::new("Folder", "group-v3"));
        let host = HostSystem::new(client, ManagedObjectReference::new("HostSystem", "host-12"));

        let lease = pool
            .import_vapp(vm_import_spec(), Some(&folder), Some(&host))
            .await
            .unwrap();
        assert_eq!(lease.reference(), lease_ref);

        let call = transport.last_call().unwrap();
        assert_eq!(call.this, pool_ref());
        assert_eq!(call.method, "ImportVApp");
        assert_eq!(call.body["folder"]["type"], "Folder");
        assert_eq!(call.body["folder"]["value"], "group-v3");
        assert_eq!(call.body["host"]["value"], "host-12");
        assert_eq!(call.body["spec"]["_typeName"], "VirtualMachineImportSpec");
    }

    #[tokio::test]
    async fn import_vapp_omits_absent_scope() {
        let (transport, pool) = setup();
        transport.reply(
            "ImportVApp",
            ManagedObjectReference::new("HttpNfcLease", "lease-1"),
        );

        pool.import_vapp(vm_import_spec(), None, None).await.unwrap();

        let body = transport.last_call().unwrap().body;
        assert!(body.get("folder").is_none());
        assert!(body.get("host").is_none());
    }

    #[tokio::test]
    async fn create_returns_child_handle() {
        let (transport, pool) = setup();
        let child_ref = ManagedObjectReference::new("ResourcePool", "resgroup-10");
        transport.reply("CreateResourcePool", &child_ref);

        let child = pool
            .create("batch", ResourceConfigSpec::expandable())
            .await
            .unwrap();
        assert_eq!(child.reference(), child_ref);
        assert!(child.inventory_path.is_none());

        let call = transport.last_call().unwrap();
        assert_eq!(call.method, "CreateResourcePool");
        assert_eq!(call.body["name"], "batch");
        assert_eq!(call.body["spec"]["cpuAllocation"]["expandableReservation"], true);
    }

    #[tokio::test]
    async fn create_vapp_maps_folder() {
        let (transport, pool) = setup();
        transport.reply(
            "CreateVApp",
            ManagedObjectReference::new("VirtualApp", "resgroup-v20"),
        );
        let folder = Folder::new(
            pool.common().client().clone(),
            ManagedObjectReference::new("Folder", "group-v4"),
        );
        let config = VAppConfigSpec {
            annotation: Some("web tier".into()),
            ..Default::default()
        };

        let vapp = pool
            .create_vapp("web", ResourceConfigSpec::expandable(), config, Some(&folder))
            .await
            .unwrap();
        assert_eq!(
            vapp.reference(),
            ManagedObjectReference::new("VirtualApp", "resgroup-v20")
        );

        let body = transport.last_call().unwrap().body;
        assert_eq!(body["vmFolder"]["value"], "group-v4");
        assert_eq!(body["configSpec"]["annotation"], "web tier");
        assert!(body.get("resSpec").is_some());
    }

    #[tokio::test]
    async fn create_vapp_without_folder_omits_it() {
        let (transport, pool) = setup();
        transport.reply(
            "CreateVApp",
            ManagedObjectReference::new("VirtualApp", "resgroup-v21"),
        );

        pool.create_vapp(
            "web",
            ResourceConfigSpec::default(),
            VAppConfigSpec::default(),
            None,
        )
        .await
        .unwrap();

        assert!(transport.last_call().unwrap().body.get("vmFolder").is_none());
    }

    #[tokio::test]
    async fn update_config_fills_entity_on_a_copy() {
        let (transport, pool) = setup();
        let config = limited_spec();

        pool.update_config(Some("renamed"), Some(&config))
            .await
            .unwrap();

        assert!(config.entity.is_none(), "caller's config must not change");
        let call = transport.last_call().unwrap();
        assert_eq!(call.method, "UpdateConfig");
        assert_eq!(call.body["name"], "renamed");
        assert_eq!(call.body["config"]["entity"]["value"], "resgroup-9");
        assert_eq!(call.body["config"]["cpuAllocation"]["limit"], 4000);
    }

    #[tokio::test]
    async fn update_config_keeps_explicit_entity() {
        let (transport, pool) = setup();
        let other = ManagedObjectReference::new("ResourcePool", "resgroup-77");
        let config = ResourceConfigSpec {
            entity: Some(other.clone()),
            ..limited_spec()
        };

        pool.update_config(None, Some(&config)).await.unwrap();

        let body = transport.last_call().unwrap().body;
        assert_eq!(body["config"]["entity"]["value"], "resgroup-77");
        assert!(body.get("name").is_none());
        assert_eq!(config.entity, Some(other));
    }

    #[tokio::test]
    async fn update_config_without_arguments_sends_empty_body() {
        let (transport, pool) = setup();
        pool.update_config(None, None).await.unwrap();
        assert_eq!(transport.last_call().unwrap().body, json!({}));
    }

    #[tokio::test]
    async fn update_config_empty_name_is_omitted() {
        let (transport, pool) = setup();
        pool.update_config(Some(""), None).await.unwrap();

        let call = transport.last_call().unwrap();
        assert_eq!(call.method, "UpdateConfig");
        assert!(call.body.get("name").is_none());
    }

    #[tokio::test]
    async fn destroy_children_targets_this_pool() {
        let (transport, pool) = setup();
        pool.destroy_children().await.unwrap();

        let call = transport.last_call().unwrap();
        assert_eq!(call.this, pool_ref());
        assert_eq!(call.method, "DestroyChildren");
    }

    #[tokio::test]
    async fn destroy_returns_task_handle() {
        let (transport, pool) = setup();
        let task_ref = ManagedObjectReference::new("Task", "task-301");
        transport.reply("Destroy_Task", &task_ref);

        let task = pool.destroy().await.unwrap();
        assert_eq!(task.reference(), task_ref);
        assert_eq!(transport.last_call().unwrap().method, "Destroy_Task");
    }

    #[tokio::test]
    async fn remote_faults_pass_through_unchanged() {
        let (transport, pool) = setup();
        transport.fault("CreateResourcePool", "DuplicateName", "batch exists");

        let err = pool
            .create("batch", ResourceConfigSpec::default())
            .await
            .unwrap_err();
        match err {
            VimError::Fault {
                type_name, message, ..
            } => {
                assert_eq!(type_name, "DuplicateName");
                assert_eq!(message, "batch exists");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn void_operations_surface_faults() {
        let (transport, pool) = setup();
        transport.fault("DestroyChildren", "InvalidState", "busy");
        transport.fault("UpdateConfig", "InvalidArgument", "bad limit");

        let err = pool.destroy_children().await.unwrap_err();
        assert_eq!(err.fault_type(), Some("InvalidState"));
        let err = pool
            .update_config(None, Some(&limited_spec()))
            .await
            .unwrap_err();
        assert_eq!(err.fault_type(), Some("InvalidArgument"));
    }
}
