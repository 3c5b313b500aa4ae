//! Request bodies for the remote methods the SDK invokes.
//!
//! Each request carries the target object in `this`; the JSON protocol puts
//! that reference in the URL, so it never appears in the serialized body.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{ImportSpec, LocalizedMethodFault, ResourceConfigSpec, VAppConfigSpec};
use crate::ManagedObjectReference;

/// Binds a request body to its remote method name and return type.
pub trait Method: Serialize + Send + Sync {
    const NAME: &'static str;
    type Response: DeserializeOwned + Send;

    fn this(&self) -> &ManagedObjectReference;
}

macro_rules! vim_method {
    ($request:ident => $name:literal, $response:ty) => {
        impl Method for $request {
            const NAME: &'static str = $name;
            type Response = $response;

            fn this(&self) -> &ManagedObjectReference {
                &self.this
            }
        }
    };
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportVApp {
    #[serde(skip)]
    pub this: ManagedObjectReference,
    pub spec: ImportSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<ManagedObjectReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<ManagedObjectReference>,
}
vim_method!(ImportVApp => "ImportVApp", ManagedObjectReference);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourcePool {
    #[serde(skip)]
    pub this: ManagedObjectReference,
    pub name: String,
    pub spec: ResourceConfigSpec,
}
vim_method!(CreateResourcePool => "CreateResourcePool", ManagedObjectReference);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVApp {
    #[serde(skip)]
    pub this: ManagedObjectReference,
    pub name: String,
    pub res_spec: ResourceConfigSpec,
    pub config_spec: VAppConfigSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_folder: Option<ManagedObjectReference>,
}
vim_method!(CreateVApp => "CreateVApp", ManagedObjectReference);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfig {
    #[serde(skip)]
    pub this: ManagedObjectReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ResourceConfigSpec>,
}
vim_method!(UpdateConfig => "UpdateConfig", ());

#[derive(Debug, Clone, Serialize)]
pub struct DestroyChildren {
    #[serde(skip)]
    pub this: ManagedObjectReference,
}
vim_method!(DestroyChildren => "DestroyChildren", ());

#[derive(Debug, Clone, Serialize)]
pub struct DestroyTask {
    #[serde(skip)]
    pub this: ManagedObjectReference,
}
vim_method!(DestroyTask => "Destroy_Task", ManagedObjectReference);

#[derive(Debug, Clone, Serialize)]
pub struct PowerOnVAppTask {
    #[serde(skip)]
    pub this: ManagedObjectReference,
}
vim_method!(PowerOnVAppTask => "PowerOnVApp_Task", ManagedObjectReference);

#[derive(Debug, Clone, Serialize)]
pub struct PowerOffVAppTask {
    #[serde(skip)]
    pub this: ManagedObjectReference,
    pub force: bool,
}
vim_method!(PowerOffVAppTask => "PowerOffVApp_Task", ManagedObjectReference);

#[derive(Debug, Clone, Serialize)]
pub struct SuspendVAppTask {
    #[serde(skip)]
    pub this: ManagedObjectReference,
}
vim_method!(SuspendVAppTask => "SuspendVApp_Task", ManagedObjectReference);

#[derive(Debug, Clone, Serialize)]
pub struct CancelTask {
    #[serde(skip)]
    pub this: ManagedObjectReference,
}
vim_method!(CancelTask => "CancelTask", ());

#[derive(Debug, Clone, Serialize)]
pub struct HttpNfcLeaseProgress {
    #[serde(skip)]
    pub this: ManagedObjectReference,
    pub percent: i32,
}
vim_method!(HttpNfcLeaseProgress => "HttpNfcLeaseProgress", ());

#[derive(Debug, Clone, Serialize)]
pub struct HttpNfcLeaseComplete {
    #[serde(skip)]
    pub this: ManagedObjectReference,
}
vim_method!(HttpNfcLeaseComplete => "HttpNfcLeaseComplete", ());

#[derive(Debug, Clone, Serialize)]
pub struct HttpNfcLeaseAbort {
    #[serde(skip)]
    pub this: ManagedObjectReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<LocalizedMethodFault>,
}
vim_method!(HttpNfcLeaseAbort => "HttpNfcLeaseAbort", ());
