use std::fmt;

use vim_proto::ManagedObjectReference;

use super::{fmt_with_path, Common, Reference};
use crate::{Client, VimResult};

#[derive(Debug, Clone)]
pub struct HostSystem {
    common: Common,
    pub inventory_path: Option<String>,
}

impl HostSystem {
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

    pub async fn name(&self) -> VimResult<String> {
        self.common.name().await
    }
}

impl Reference for HostSystem {
    fn reference(&self) -> ManagedObjectReference {
        self.common.reference()
    }
}

impl fmt::Display for HostSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_path(&self.common, self.inventory_path.as_deref(), f)
    }
}
