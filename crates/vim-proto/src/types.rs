use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ManagedObjectReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SharesLevel {
    Low,
    Normal,
    High,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharesInfo {
    pub shares: i32,
    pub level: SharesLevel,
}

impl SharesInfo {
    pub fn level(level: SharesLevel) -> Self {
        Self { shares: 0, level }
    }
}

/// CPU or memory allocation for a resource pool. Unset fields are left to the
/// server default (or unchanged on update).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expandable_reservation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<SharesInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overhead_limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfigSpec {
    /// Back-reference to the pool this spec configures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<ManagedObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    pub cpu_allocation: ResourceAllocationInfo,
    pub memory_allocation: ResourceAllocationInfo,
}

impl ResourceConfigSpec {
    /// Expandable reservations with normal shares, the server-side defaults for a new pool.
    pub fn expandable() -> Self {
        let allocation = ResourceAllocationInfo {
            reservation: Some(0),
            expandable_reservation: Some(true),
            limit: Some(-1),
            shares: Some(SharesInfo::level(SharesLevel::Normal)),
            overhead_limit: None,
        };
        Self {
            cpu_allocation: allocation.clone(),
            memory_allocation: allocation,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VAppEntityConfigInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<ManagedObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_delay: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_for_guest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_delay: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroy_with_parent: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VAppConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_config: Vec<VAppEntityConfigInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(rename = "numCPUs", default, skip_serializing_if = "Option::is_none")]
    pub num_cpus: Option<i32>,
    #[serde(rename = "memoryMB", default, skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineImportSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_config: Option<VAppEntityConfigInfo>,
    pub config_spec: VirtualMachineConfigSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_pool_entity: Option<ManagedObjectReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualAppImportSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_config: Option<VAppEntityConfigInfo>,
    pub name: String,
    #[serde(rename = "vAppConfigSpec")]
    pub vapp_config_spec: VAppConfigSpec,
    pub resource_pool_spec: ResourceConfigSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child: Vec<ImportSpec>,
}

/// Packaged application content handed to `ImportVApp`, usually produced by
/// an OVF descriptor parse on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_typeName")]
pub enum ImportSpec {
    #[serde(rename = "VirtualMachineImportSpec")]
    VirtualMachine(VirtualMachineImportSpec),
    #[serde(rename = "VirtualAppImportSpec")]
    VirtualApp(VirtualAppImportSpec),
}

/// A remote fault together with the server's localized description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedMethodFault {
    pub fault: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_message: Option<String>,
}

impl LocalizedMethodFault {
    pub fn new(type_name: &str, message: impl Into<String>) -> Self {
        Self {
            fault: serde_json::json!({ "_typeName": type_name }),
            localized_message: Some(message.into()),
        }
    }

    pub fn type_name(&self) -> &str {
        self.fault
            .get("_typeName")
            .and_then(Value::as_str)
            .unwrap_or("MethodFault")
    }

    pub fn message(&self) -> &str {
        self.localized_message
            .as_deref()
            .unwrap_or_else(|| self.type_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskInfoState {
    Queued,
    Running,
    Success,
    Error,
}

impl TaskInfoState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskInfoState::Success | TaskInfoState::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub key: String,
    pub task: ManagedObjectReference,
    #[serde(default)]
    pub description_id: String,
    #[serde(default)]
    pub entity: Option<ManagedObjectReference>,
    #[serde(default)]
    pub entity_name: Option<String>,
    pub state: TaskInfoState,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub cancelable: bool,
    #[serde(default)]
    pub error: Option<LocalizedMethodFault>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub progress: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HttpNfcLeaseState {
    Initializing,
    Ready,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpNfcLeaseDeviceUrl {
    pub key: String,
    pub import_key: String,
    pub url: String,
    #[serde(default)]
    pub ssl_thumbprint: String,
    #[serde(default)]
    pub disk: Option<bool>,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub datastore_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpNfcLeaseInfo {
    pub lease: ManagedObjectReference,
    #[serde(default)]
    pub entity: Option<ManagedObjectReference>,
    #[serde(default)]
    pub device_url: Vec<HttpNfcLeaseDeviceUrl>,
    #[serde(rename = "totalDiskCapacityInKB", default)]
    pub total_disk_capacity_in_kb: i64,
    #[serde(default)]
    pub lease_timeout: i32,
}
