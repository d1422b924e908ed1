use thiserror::Error;

/// Top-level error type for the `cloudev-api` crate.
///
/// Covers every failure mode of the wire layer: credential encoding,
/// transport, structured service errors, and payload (de)serialization.
/// `cloudev-core` carries these through unmodified.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The bearer token cannot be encoded as an HTTP header value.
    #[error("Invalid bearer token: {message}")]
    InvalidToken { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Structured error returned by the remote service.
    #[error("Remote error (HTTP {status}) {code}: {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
        /// Response headers, kept for diagnostics.
        headers: Vec<(String, String)>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Request parameters could not be encoded as JSON.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the service rejected the bearer token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Remote { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Remote { status: 404, .. } => true,
            Self::Remote { code, .. } => code == "ResourceNotFoundException",
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// The service-assigned request id, if the failure came from the service.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Remote { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// The service error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}
