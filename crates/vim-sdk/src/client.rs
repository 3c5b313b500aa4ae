use std::fmt;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use vim_proto::{ManagedObjectReference, Method};

use crate::{RoundTripper, VimError, VimResult};

/// Shared handle to a session-bearing transport. Clones share the transport.
#[derive(Clone)]
pub struct Client {
    rt: Arc<dyn RoundTripper>,
}

impl Client {
    pub fn new(rt: Arc<dyn RoundTripper>) -> Self {
        Self { rt }
    }

    /// Encodes `req`, invokes it on the object named by `req.this()` and
    /// decodes the typed result. Transport errors are returned untouched.
    pub async fn call<M: Method>(&self, req: &M) -> VimResult<M::Response> {
        let body = serde_json::to_value(req)?;
        debug!(
            target = "vim.client",
            this = %req.this(),
            method = M::NAME,
            "invoking remote method"
        );
        let value = self
            .rt
            .invoke(req.this(), M::NAME, body)
            .await
            .map_err(|err| {
                if let VimError::Fault { type_name, .. } = &err {
                    warn!(
                        target = "vim.client",
                        this = %req.this(),
                        method = M::NAME,
                        fault = %type_name,
                        "remote method faulted"
                    );
                }
                err
            })?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches `props` of `this` concurrently and merges them into one object.
    /// Unset properties are left out of the map.
    pub async fn retrieve_properties(
        &self,
        this: &ManagedObjectReference,
        props: &[&str],
    ) -> VimResult<Map<String, Value>> {
        debug!(
            target = "vim.client",
            this = %this,
            count = props.len(),
            "retrieving properties"
        );
        let fetches = props.iter().map(|prop| async move {
            let value = self.rt.property(this, prop).await?;
            Ok::<_, VimError>((prop.to_string(), value))
        });
        let values = try_join_all(fetches).await?;
        Ok(values
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect())
    }

    /// Typed view over [`Client::retrieve_properties`].
    pub async fn retrieve<T: DeserializeOwned>(
        &self,
        this: &ManagedObjectReference,
        props: &[&str],
    ) -> VimResult<T> {
        let map = self.retrieve_properties(this, props).await?;
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
