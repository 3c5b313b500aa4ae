use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};
use vim_proto::methods::{HttpNfcLeaseAbort, HttpNfcLeaseComplete, HttpNfcLeaseProgress};
use vim_proto::types::{HttpNfcLeaseInfo, HttpNfcLeaseState, LocalizedMethodFault};
use vim_proto::{mo, ManagedObjectReference};

use super::{Common, Reference, DEFAULT_POLL_INTERVAL};
use crate::{Client, VimError, VimResult};

/// Upload lease handed out by `ImportVApp`. The caller pushes disk content to
/// the device URLs once the lease is ready, then completes or aborts it.
#[derive(Debug, Clone)]
pub struct HttpNfcLease {
    common: Common,
    poll_interval: Duration,
}

impl HttpNfcLease {
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

    pub async fn state(&self) -> VimResult<HttpNfcLeaseState> {
        let lease: mo::HttpNfcLease = self.common.properties(&["state"]).await?;
        lease.state.ok_or_else(|| self.missing("state"))
    }

    pub async fn info(&self) -> VimResult<HttpNfcLeaseInfo> {
        let lease: mo::HttpNfcLease = self.common.properties(&["info"]).await?;
        lease.info.ok_or_else(|| self.missing("info"))
    }

    /// Polls until the lease is ready and returns its device URLs.
    pub async fn wait(&self) -> VimResult<HttpNfcLeaseInfo> {
        loop {
            let lease: mo::HttpNfcLease =
                self.common.properties(&["state", "info", "error"]).await?;
            match lease.state {
                Some(HttpNfcLeaseState::Ready) => {
                    return lease.info.ok_or_else(|| self.missing("info"));
                }
                Some(HttpNfcLeaseState::Error) => {
                    let fault = lease.error.unwrap_or_else(|| {
                        LocalizedMethodFault::new("MethodFault", "lease failed without fault detail")
                    });
                    warn!(
                        target = "vim.lease",
                        lease = %self.common,
                        fault = fault.type_name(),
                        "lease failed"
                    );
                    return Err(VimError::LeaseFailed {
                        lease: self.reference(),
                        fault,
                    });
                }
                Some(HttpNfcLeaseState::Done) => {
                    return Err(VimError::LeaseClosed {
                        lease: self.reference(),
                    });
                }
                Some(HttpNfcLeaseState::Initializing) => {
                    debug!(target = "vim.lease", lease = %self.common, "lease initializing");
                    tokio::time::sleep(self.poll_interval).await;
                }
                None => return Err(self.missing("state")),
            }
        }
    }

    /// Reports upload progress (0-100) and keeps the lease from timing out.
    pub async fn progress(&self, percent: i32) -> VimResult<()> {
        let req = HttpNfcLeaseProgress {
            this: self.reference(),
            percent: percent.clamp(0, 100),
        };
        self.common.client().call(&req).await
    }

    pub async fn complete(&self) -> VimResult<()> {
        let req = HttpNfcLeaseComplete {
            this: self.reference(),
        };
        self.common.client().call(&req).await
    }

    pub async fn abort(&self, fault: Option<LocalizedMethodFault>) -> VimResult<()> {
        let req = HttpNfcLeaseAbort {
            this: self.reference(),
            fault,
        };
        self.common.client().call(&req).await
    }

    fn missing(&self, property: &str) -> VimError {
        VimError::MissingProperty {
            this: self.reference(),
            property: property.to_string(),
        }
    }
}

impl Reference for HttpNfcLease {
    fn reference(&self) -> ManagedObjectReference {
        self.common.reference()
    }
}

impl fmt::Display for HttpNfcLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.common, f)
    }
}
