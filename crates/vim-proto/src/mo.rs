//! Typed property views over managed objects. Only the properties a caller
//! asked for are populated; everything else falls back to its default.

use serde::Deserialize;

use crate::types::{
    HttpNfcLeaseInfo, HttpNfcLeaseState, LocalizedMethodFault, ResourceConfigSpec, TaskInfo,
};
use crate::ManagedObjectReference;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManagedEntity {
    pub name: String,
    pub parent: Option<ManagedObjectReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourcePool {
    pub name: String,
    pub parent: Option<ManagedObjectReference>,
    pub owner: Option<ManagedObjectReference>,
    pub config: Option<ResourceConfigSpec>,
    pub resource_pool: Vec<ManagedObjectReference>,
    pub vm: Vec<ManagedObjectReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Task {
    pub info: Option<TaskInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpNfcLease {
    pub state: Option<HttpNfcLeaseState>,
    pub info: Option<HttpNfcLeaseInfo>,
    pub error: Option<LocalizedMethodFault>,
}
