//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use cloudev_config::ConfigError;
use cloudev_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the service")]
    #[diagnostic(
        code(cloudev::connection_failed),
        help("Check the endpoint and your network.\nTry: cloudev --endpoint <url> whoami")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(cloudev::auth_failed),
        help(
            "The token was rejected or has expired.\n\
             Store a fresh one with: cloudev config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(cloudev::no_credentials),
        help(
            "Store one with: cloudev config set-token\n\
             Or set the CLOUDEV_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Token belongs to {returned}, but the session expected {bound}")]
    #[diagnostic(code(cloudev::identity_mismatch))]
    IdentityMismatch { bound: String, returned: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(
        code(cloudev::not_found),
        help("Run: cloudev list {list_kind} to see what is available")
    )]
    NotFound { message: String, list_kind: String },

    #[error("Conflict: {message}")]
    #[diagnostic(code(cloudev::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(cloudev::api_error))]
    ApiError {
        code: String,
        message: String,
        /// Carries the service request id, when there is one.
        #[help]
        hint: Option<String>,
    },

    // ── Unsupported ──────────────────────────────────────────────────
    #[error("Operation '{operation}' is not supported")]
    #[diagnostic(code(cloudev::unsupported), help("{hint}"))]
    Unsupported { operation: String, hint: String },

    // ── Dev environment lifecycle ────────────────────────────────────
    #[error("Dev environment {id} did not reach RUNNING within {seconds}s")]
    #[diagnostic(
        code(cloudev::start_timeout),
        help("Raise start_timeout in your profile, or check: cloudev env get <org> <project> {id}")
    )]
    StartTimeout { id: String, seconds: u64 },

    #[error("{message}")]
    #[diagnostic(code(cloudev::start_failed))]
    StartFailed { message: String },

    #[error("Interrupted")]
    #[diagnostic(code(cloudev::interrupted))]
    Interrupted,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cloudev::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(cloudev::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: cloudev config set endpoint <url> --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(cloudev::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(cloudev::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::IdentityMismatch { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::StartTimeout { .. } => exit_code::TIMEOUT,
            Self::Interrupted => exit_code::INTERRUPTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::IdentityMismatch { bound, returned } => {
                CliError::IdentityMismatch { bound, returned }
            }

            err @ CoreError::StartRegression { .. } => CliError::StartFailed {
                message: err.to_string(),
            },

            CoreError::Unsupported { operation } => CliError::Unsupported {
                hint: "Branches are listed per repository: cloudev branches list <org> <project> <repo>"
                    .into(),
                operation,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Api(api) => api.into(),
        }
    }
}

impl From<cloudev_core::ApiError> for CliError {
    fn from(err: cloudev_core::ApiError) -> Self {
        use cloudev_core::ApiError;

        if err.is_auth_failure() {
            return CliError::AuthFailed {
                message: err.to_string(),
            };
        }
        if err.is_not_found() {
            return CliError::NotFound {
                message: err.to_string(),
                list_kind: "org".into(),
            };
        }

        match err {
            ApiError::Transport(e) => CliError::ConnectionFailed {
                source: Box::new(e),
            },
            ApiError::Tls(message) => CliError::ConnectionFailed {
                source: message.into(),
            },
            ApiError::Remote {
                status: 409,
                message,
                ..
            } => CliError::Conflict { message },
            ApiError::Remote {
                code,
                message,
                request_id,
                ..
            } => CliError::ApiError {
                code,
                message,
                hint: request_id.map(|id| format!("Request id: {id}")),
            },
            other => CliError::ApiError {
                code: "client".into(),
                message: other.to_string(),
                hint: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            other => CliError::Config(other),
        }
    }
}
