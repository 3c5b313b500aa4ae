//! HTTP transport for the vSphere JSON protocol.
//!
//! Methods are `POST {base}/{type}/{id}/{method}` with the arguments as a JSON
//! object; properties are `GET {base}/{type}/{id}/{property}`. The base is
//! `{endpoint}/sdk/vim25/{release}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;
use url::Url;
use vim_proto::ManagedObjectReference;

use crate::{RoundTripper, VimError, VimResult};

pub const SESSION_HEADER: &str = "vmware-api-session-id";
pub const DEFAULT_RELEASE: &str = "8.0.1.0";

#[derive(Debug, Clone)]
pub struct HttpTransportOptions {
    pub release: String,
    /// Skip TLS certificate verification; lab setups with self-signed certs.
    pub insecure: bool,
    pub timeout: Duration,
}

impl Default for HttpTransportOptions {
    fn default() -> Self {
        Self {
            release: DEFAULT_RELEASE.to_string(),
            insecure: false,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base: Url,
    session_id: String,
}

impl HttpTransport {
    /// `endpoint` is the server root, e.g. `https://vcenter.example.com`. The
    /// session id comes from an existing login.
    pub fn new(
        endpoint: &str,
        session_id: impl Into<String>,
        options: HttpTransportOptions,
    ) -> VimResult<Self> {
        let base = Url::parse(endpoint)?.join(&format!("/sdk/vim25/{}/", options.release))?;
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.insecure)
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            http,
            base,
            session_id: session_id.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn object_url(&self, this: &ManagedObjectReference, tail: &str) -> VimResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| VimError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend([this.kind.as_str(), this.value.as_str(), tail]);
        Ok(url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.session_id.is_empty() {
            builder
        } else {
            builder.header(SESSION_HEADER, &self.session_id)
        }
    }
}

#[async_trait]
impl RoundTripper for HttpTransport {
    async fn invoke(
        &self,
        this: &ManagedObjectReference,
        method: &str,
        body: Value,
    ) -> VimResult<Value> {
        let url = self.object_url(this, method)?;
        debug!(target = "vim.http", url = %url, "POST");
        let res = self.authorize(self.http.post(url)).json(&body).send().await?;
        decode_response(res).await
    }

    async fn property(&self, this: &ManagedObjectReference, path: &str) -> VimResult<Value> {
        let url = self.object_url(this, path)?;
        debug!(target = "vim.http", url = %url, "GET");
        let res = self.authorize(self.http.get(url)).send().await?;
        decode_response(res).await
    }
}

async fn decode_response(res: reqwest::Response) -> VimResult<Value> {
    let status = res.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }
    let body = res.text().await?;
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&body)?);
    }
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        if let Some(fault) = fault_from_body(&body) {
            return Err(fault);
        }
    }
    Err(VimError::UnexpectedStatus { status, body })
}

/// Maps a fault document (`{"_typeName": "NotFound", ...}`) to a
/// [`VimError::Fault`]. Returns `None` when the body is not a fault.
pub(crate) fn fault_from_body(body: &str) -> Option<VimError> {
    let detail: Value = serde_json::from_str(body).ok()?;
    let type_name = detail.get("_typeName")?.as_str()?.to_string();
    let message = detail
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| {
            detail
                .get("faultMessage")
                .and_then(Value::as_array)
                .and_then(|messages| messages.first())
                .and_then(|first| first.get("message"))
                .and_then(Value::as_str)
        })
        .unwrap_or(type_name.as_str())
        .to_string();
    Some(VimError::Fault {
        type_name,
        message,
        detail,
    })
}
