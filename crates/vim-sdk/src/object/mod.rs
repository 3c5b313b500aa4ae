//! Local handles for remote managed objects.

mod folder;
mod host_system;
mod nfc_lease;
mod resource_pool;
mod task;
mod virtual_app;

use std::fmt;

use serde::de::DeserializeOwned;
use vim_proto::{mo, ManagedObjectReference};

use crate::{Client, VimResult};

pub use folder::Folder;
pub use host_system::HostSystem;
pub use nfc_lease::HttpNfcLease;
pub use resource_pool::ResourcePool;
pub use task::{Task, DEFAULT_POLL_INTERVAL};
pub use virtual_app::VirtualApp;

/// Anything that names a remote object.
pub trait Reference {
    fn reference(&self) -> ManagedObjectReference;
}

impl Reference for ManagedObjectReference {
    fn reference(&self) -> ManagedObjectReference {
        self.clone()
    }
}

/// Reference plus the client used to reach it; embedded by every handle.
#[derive(Debug, Clone)]
pub struct Common {
    client: Client,
    reference: ManagedObjectReference,
}

impl Common {
    pub fn new(client: Client, reference: ManagedObjectReference) -> Self {
        Self { client, reference }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn properties<T: DeserializeOwned>(&self, props: &[&str]) -> VimResult<T> {
        self.client.retrieve(&self.reference, props).await
    }

    pub async fn name(&self) -> VimResult<String> {
        let entity: mo::ManagedEntity = self.properties(&["name"]).await?;
        Ok(entity.name)
    }
}

impl Reference for Common {
    fn reference(&self) -> ManagedObjectReference {
        self.reference.clone()
    }
}

impl fmt::Display for Common {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.reference, f)
    }
}

fn fmt_with_path(
    common: &Common,
    inventory_path: Option<&str>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match inventory_path {
        Some(path) if !path.is_empty() => write!(f, "{common} @ {path}"),
        _ => write!(f, "{common}"),
    }
}
