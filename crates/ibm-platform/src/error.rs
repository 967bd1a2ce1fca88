//! CLI error types with miette diagnostics.
//!
//! Maps client and configuration errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ibm_platform_api::Error as ClientError;
use ibm_platform_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(ibm_platform::connection_failed),
        help(
            "Check network access to the service endpoint.\n\
             Override it with --url or <SERVICE_NAME>_URL."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(ibm_platform::tls_error),
        help("Use --insecure (-k) or <SERVICE_NAME>_DISABLE_SSL=true for test endpoints.")
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(ibm_platform::timeout),
        help("Increase the timeout with --timeout or <SERVICE_NAME>_TIMEOUT.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ibm_platform::auth_failed),
        help(
            "Verify the API key or token.\n\
             Set <SERVICE_NAME>_APIKEY, or pass --apikey."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for service '{service}'")]
    #[diagnostic(
        code(ibm_platform::no_credentials),
        help(
            "Add {service_env}_APIKEY to ibm-credentials.env or the environment,\n\
             or pass --apikey."
        )
    )]
    NoCredentials { service: String, service_env: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(code(ibm_platform::permission_denied))]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ibm_platform::not_found),
        help("Run: ibm-platform {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}, {code}): {message}")]
    #[diagnostic(code(ibm_platform::api_error))]
    ApiError {
        status: u16,
        code: String,
        message: String,
        trace: Option<String>,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ibm_platform::validation))]
    Validation { field: String, reason: String },

    #[error("No account ID given")]
    #[diagnostic(
        code(ibm_platform::no_account),
        help(
            "Pass --account-id, set IBM_PLATFORM_ACCOUNT_ID,\n\
             or store account_id with: ibm-platform config init"
        )
    )]
    NoAccount,

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(ibm_platform::config))]
    Config(Box<figment::Error>),

    #[error("Could not write settings: {0}")]
    #[diagnostic(code(ibm_platform::settings))]
    Settings(String),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ibm_platform::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(ibm_platform::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ApiError { status, .. } => match status {
                404 => exit_code::NOT_FOUND,
                409 | 412 => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            Self::Validation { .. } | Self::NoAccount | Self::NonInteractiveRequiresYes { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── Client error mapping ─────────────────────────────────────────────

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation { field, reason } => Self::Validation { field, reason },

            ClientError::Authentication { message } => Self::AuthFailed { message },

            ClientError::Transport(e) if e.is_timeout() => Self::Timeout,
            ClientError::Transport(e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown endpoint)".into(), ToString::to_string),
                source: Box::new(e),
            },

            ClientError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            ClientError::Tls(message) => Self::TlsError { message },

            ClientError::Service {
                status,
                message,
                code,
                trace,
                ..
            } => match status {
                401 => Self::AuthFailed { message },
                403 => Self::PermissionDenied { message },
                _ => Self::ApiError {
                    status,
                    code: code.unwrap_or_else(|| "unknown".into()),
                    message,
                    trace,
                },
            },

            ClientError::Decode { source, status, .. } => Self::ApiError {
                status,
                code: "decode_error".into(),
                message: source.to_string(),
                trace: None,
            },

            ClientError::EmptyBody { status } => Self::ApiError {
                status,
                code: "empty_body".into(),
                message: "the service returned no body".into(),
                trace: None,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { service } => Self::NoCredentials {
                service_env: service.to_ascii_uppercase(),
                service,
            },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
            ConfigError::CredentialsFile { path, source } => Self::Validation {
                field: "credentials_file".into(),
                reason: format!("{}: {source}", path.display()),
            },
            ConfigError::Serialization(e) => Self::Settings(e.to_string()),
            ConfigError::Client(e) => e.into(),
        }
    }
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
