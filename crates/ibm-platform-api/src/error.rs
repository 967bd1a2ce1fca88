use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::union::DecodeError;

/// Raw details of a non-2xx response, kept so callers can inspect the
/// server-provided error payload.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Top-level error type for the `ibm-platform-api` crate.
///
/// Covers every failure mode of a service call: client-side validation,
/// authentication, transport, server-signaled errors, and response decoding.
/// The CLI maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Validation ──────────────────────────────────────────────────
    /// A required option was missing or empty. Raised before any I/O.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Token exchange failed or produced an unusable credential.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Non-2xx response. The full response is always attached.
    #[error("Service error (HTTP {status}): {message}")]
    Service {
        status: u16,
        message: String,
        code: Option<String>,
        trace: Option<String>,
        response: Box<ErrorResponse>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// The response arrived but its body did not match the expected shape.
    #[error("Decode error (HTTP {status}): {source}")]
    Decode {
        #[source]
        source: DecodeError,
        status: u16,
        body: String,
    },

    /// A result was required but the 2xx response carried no body.
    #[error("Response (HTTP {status}) carried no body")]
    EmptyBody { status: u16 },
}

impl Error {
    /// Shorthand for a required option that was left empty.
    pub(crate) fn required(field: &str) -> Self {
        Self::Validation {
            field: field.into(),
            reason: "must not be empty".into(),
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Returns `true` if the server rejected an `If-Match` revision token.
    pub fn is_precondition_failed(&self) -> bool {
        self.status() == Some(StatusCode::PRECONDITION_FAILED.as_u16())
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Service { status, .. } => *status == 429 || (*status >= 500 && *status != 501),
            _ => false,
        }
    }

    /// HTTP status of the response this error was produced from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. }
            | Self::Decode { status, .. }
            | Self::EmptyBody { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The raw error response, for server-signaled errors.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Service { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
