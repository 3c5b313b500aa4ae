use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use vim_sdk::http::DEFAULT_RELEASE;
use vim_sdk::HttpTransportOptions;

const MIN_TASK_POLL_INTERVAL_MS: u64 = 50;

/// Connection settings, read from `POOL_CTL__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default = "default_release")]
    pub release: String,
    #[serde(default)]
    pub insecure: bool,
    #[serde(default = "default_task_poll_interval")]
    pub task_poll_interval_ms: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: None,
            session_id: None,
            release: default_release(),
            insecure: false,
            task_poll_interval_ms: default_task_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            log_filter: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_builder(
            ::config::Config::builder()
                .add_source(::config::Environment::with_prefix("POOL_CTL").separator("__")),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let cfg = builder.build()?.try_deserialize::<AppConfig>()?;
        Ok(cfg.normalize())
    }

    pub fn transport_options(&self) -> HttpTransportOptions {
        HttpTransportOptions {
            release: self.release.clone(),
            insecure: self.insecure,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn task_poll_interval(&self) -> Duration {
        Duration::from_millis(self.task_poll_interval_ms.max(MIN_TASK_POLL_INTERVAL_MS))
    }

    fn normalize(mut self) -> Self {
        self.url = Self::normalize_opt(self.url.take());
        self.session_id = Self::normalize_opt(self.session_id.take());
        self.log_filter = Self::normalize_opt(self.log_filter.take());
        if self.release.trim().is_empty() {
            self.release = default_release();
        }
        self
    }

    fn normalize_opt(value: Option<String>) -> Option<String> {
        value.and_then(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }
}

fn default_release() -> String {
    DEFAULT_RELEASE.to_string()
}

fn default_task_poll_interval() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    60
}
