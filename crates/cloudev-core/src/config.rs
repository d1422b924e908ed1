// ── Runtime client configuration ──
//
// These types describe *where* and *how patiently* to talk to the service.
// They never touch disk: cloudev-config resolves profiles into a
// `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use cloudev_api::TransportConfig;
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_ENDPOINT: &str = "https://codecatalyst.global.api.aws";

/// A resolved `{region, endpoint}` pair selecting a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub region: String,
    pub url: Url,
}

impl ServiceEndpoint {
    pub fn new(region: impl Into<String>, url: &str) -> Result<Self, CoreError> {
        let url = Url::parse(url).map_err(|e| CoreError::Config {
            message: format!("invalid endpoint {url:?}: {e}"),
        })?;
        Ok(Self {
            region: region.into(),
            url,
        })
    }
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
            url: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
        }
    }
}

/// Configuration for one session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: ServiceEndpoint,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between status polls while waiting for a dev environment.
    pub poll_interval: Duration,
    /// Overall budget for bringing a dev environment to RUNNING.
    pub start_timeout: Duration,
    /// Page size requested from listings; `None` lets the service choose.
    pub page_size: Option<i32>,
    /// Extra CA certificate (PEM) to trust.
    pub ca_cert: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: ServiceEndpoint::default(),
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
            start_timeout: Duration::from_millis(180_000),
            page_size: None,
            ca_cert: None,
        }
    }
}

impl ClientConfig {
    pub fn transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig::new(self.endpoint.url.clone());
        config.timeout = self.timeout;
        config.ca_cert.clone_from(&self.ca_cert);
        config
    }
}
