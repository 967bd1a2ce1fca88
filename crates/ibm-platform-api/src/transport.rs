// Shared transport configuration for building reqwest::Client instances.
//
// Service clients and the IAM authenticator build their HTTP clients from
// the same TLS and timeout settings through this module.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Value sent in the `User-Agent` header of every request.
pub const USER_AGENT: &str = concat!("ibm-platform-services-rust/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Skip certificate verification (`DISABLE_SSL=true`).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(60),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Same settings, trusting the PEM certificates in `path` as well.
    pub fn with_ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls = TlsMode::CustomCa(path.into());
        self
    }

    /// Same settings with certificate verification switched off.
    pub fn insecure(mut self) -> Self {
        self.tls = TlsMode::DangerAcceptInvalid;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_file_fails_client_build() {
        let config = TransportConfig::default().with_ca_file("/nonexistent/ca.pem");
        let err = config.build_client().unwrap_err();
        assert!(matches!(err, Error::Tls(ref msg) if msg.contains("failed to read CA cert")));
    }

    #[test]
    fn insecure_overrides_ca_file() {
        let config = TransportConfig::default()
            .with_ca_file("/nonexistent/ca.pem")
            .insecure();
        assert!(matches!(config.tls, TlsMode::DangerAcceptInvalid));
        assert!(config.build_client().is_ok());
    }
}
