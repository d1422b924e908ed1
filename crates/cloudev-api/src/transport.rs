// Transport capability and its reqwest-backed implementation.
//
// Everything above this module talks to the service through the narrow
// `Transport` contract: one named operation in, one JSON document out.
// `HttpTransport` owns the reqwest client, the bearer header, and the
// translation of non-2xx responses into `Error::Remote`.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::auth_headers;
use crate::error::Error;
use crate::operation::Operation;

const USER_AGENT: &str = concat!("cloudev/", env!("CARGO_PKG_VERSION"));

/// Header names the service uses for its request id, in preference order.
const REQUEST_ID_HEADERS: [&str; 2] = ["x-amzn-requestid", "x-request-id"];

// ── Transport capability ─────────────────────────────────────────────

/// A channel to the remote service.
///
/// Implementations must be cheap to call concurrently; a session may have
/// several page fetches in flight when listings are joined.
pub trait Transport: Send + Sync + Sized + 'static {
    /// Invoke `operation` with JSON `params`, returning the JSON response.
    fn invoke(
        &self,
        operation: Operation,
        params: Value,
    ) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Produce a new transport of the same shape bound to `token`.
    fn rebind(&self, token: Option<&SecretString>) -> Result<Self, Error>;
}

// ── TransportConfig ──────────────────────────────────────────────────

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub endpoint: Url,
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra CA certificate (PEM) to trust, for proxied deployments.
    pub ca_cert: Option<PathBuf>,
}

impl TransportConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_owned(),
            ca_cert: None,
        }
    }

    /// Build a `reqwest::Client` whose default headers carry `token`.
    pub fn build_client(&self, token: Option<&SecretString>) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(auth_headers(token)?);

        if let Some(ref path) = self.ca_cert {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// The endpoint with a guaranteed trailing slash, so operation paths join
    /// underneath it instead of replacing its last segment.
    fn base_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }
}

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "__type")]
    error_type: Option<String>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

// ── HttpTransport ────────────────────────────────────────────────────

/// JSON-over-HTTP transport authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    config: TransportConfig,
}

impl HttpTransport {
    /// Build a transport for `config`, optionally bound to `token`.
    pub fn new(config: TransportConfig, token: Option<&SecretString>) -> Result<Self, Error> {
        let http = config.build_client(token)?;
        let base_url = config.base_url();
        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let headers: Vec<(String, String)> = resp
            .headers()
            .iter()
            .filter(|(_, v)| !v.is_sensitive())
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();

        let request_id = REQUEST_ID_HEADERS.iter().find_map(|name| {
            headers
                .iter()
                .find(|(k, _)| k.as_str() == *name)
                .map(|(_, v)| v.clone())
        });
        let header_code = headers
            .iter()
            .find(|(k, _)| k == "x-amzn-errortype")
            .map(|(_, v)| v.clone());

        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

        let (code, message) = match parsed {
            Some(err) => (
                err.code.or(err.error_type).or(header_code),
                err.message,
            ),
            None => (header_code, (!raw.is_empty()).then_some(raw)),
        };

        Error::Remote {
            status: status.as_u16(),
            code: code.map_or_else(
                || status.canonical_reason().unwrap_or("Unknown").to_owned(),
                |c| short_error_code(&c).to_owned(),
            ),
            message: message.unwrap_or_else(|| status.to_string()),
            request_id,
            headers,
        }
    }
}

impl Transport for HttpTransport {
    async fn invoke(&self, operation: Operation, params: Value) -> Result<Value, Error> {
        let url = self.base_url.join(&operation.path())?;
        debug!("POST {url}");
        trace!(?params, "request parameters");

        let resp = self.http.post(url).json(&params).send().await?;
        Self::handle_response(resp).await
    }

    fn rebind(&self, token: Option<&SecretString>) -> Result<Self, Error> {
        Self::new(self.config.clone(), token)
    }
}

/// Error types may arrive qualified (`namespace#ValidationException`, or with
/// a `:` suffix carrying a URL); keep the bare name.
fn short_error_code(raw: &str) -> &str {
    let name = raw.rsplit('#').next().unwrap_or(raw);
    name.split(':').next().unwrap_or(name)
}
