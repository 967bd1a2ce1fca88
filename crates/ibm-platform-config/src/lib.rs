//! External configuration for IBM Cloud platform service clients.
//!
//! Service properties are layered from a credentials file and the process
//! environment, keyed by the service name (`IAM_IDENTITY_APIKEY`,
//! `RESOURCE_MANAGER_URL`, ...), and translated into
//! `ibm_platform_api::ServiceOptions`. The CLI's own defaults live in a
//! separate TOML settings file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use ibm_platform_api::{
    AuthType, Authenticator, ContextBasedRestrictionsClient, DEFAULT_IAM_URL, IamAuthenticator,
    IamIdentityClient, PlatformNotificationsClient, ResourceManagerClient, RetryPolicy,
    ServiceOptions, TransportConfig,
};

/// Environment variable naming an explicit credentials file.
pub const CREDENTIALS_FILE_ENV: &str = "IBM_CREDENTIALS_FILE";

/// Credentials file looked up in the working directory, then in `$HOME`.
pub const DEFAULT_CREDENTIALS_FILE_NAME: &str = "ibm-credentials.env";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for service '{service}'")]
    NoCredentials { service: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid credentials file {}: {source}", path.display())]
    CredentialsFile {
        path: PathBuf,
        source: Box<dotenvy::Error>,
    },

    #[error(transparent)]
    Client(#[from] ibm_platform_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── Service properties ──────────────────────────────────────────────

/// Everything external configuration can say about one service.
///
/// Every field maps to a `<SERVICE_NAME>_<FIELD>` key, e.g. `auth_type`
/// is read from `IAM_IDENTITY_AUTH_TYPE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceProperties {
    /// Name the properties were loaded for.
    #[serde(skip)]
    pub service_name: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub auth_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub apikey: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub bearer_token: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub auth_url: Option<String>,
    /// PEM bundle trusted in addition to the system roots.
    #[serde(default, deserialize_with = "lenient::text")]
    pub ca_file: Option<String>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub disable_ssl: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub auth_disable_ssl: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enable_retries: bool,

    #[serde(default, deserialize_with = "lenient::number")]
    pub max_retries: Option<u64>,
    /// Upper bound on the retry back-off, in seconds.
    #[serde(default, deserialize_with = "lenient::number")]
    pub retry_interval: Option<u64>,
    /// Request timeout, in seconds.
    #[serde(default, deserialize_with = "lenient::number")]
    pub timeout: Option<u64>,
}

impl ServiceProperties {
    /// The authentication scheme, explicit or inferred from the credentials
    /// present (API key, then bearer token, then username).
    pub fn auth_type(&self) -> Result<AuthType, ConfigError> {
        if let Some(raw) = non_empty(self.auth_type.as_ref()) {
            return raw.parse().map_err(|_| {
                ConfigError::validation(
                    "auth_type",
                    format!(
                        "unsupported authentication type '{raw}' \
                         (expected iam, bearerToken, basic or noAuth)"
                    ),
                )
            });
        }
        if non_empty(self.apikey.as_ref()).is_some() {
            Ok(AuthType::Iam)
        } else if non_empty(self.bearer_token.as_ref()).is_some() {
            Ok(AuthType::BearerToken)
        } else if non_empty(self.username.as_ref()).is_some() {
            Ok(AuthType::Basic)
        } else {
            Err(self.no_credentials())
        }
    }

    pub fn authenticator(&self) -> Result<Authenticator, ConfigError> {
        match self.auth_type()? {
            AuthType::NoAuth => Ok(Authenticator::NoAuth),
            AuthType::BearerToken => {
                let token = non_empty(self.bearer_token.as_ref())
                    .ok_or_else(|| self.no_credentials())?;
                Ok(Authenticator::bearer(token))
            }
            AuthType::Basic => {
                let username = non_empty(self.username.as_ref())
                    .ok_or_else(|| self.no_credentials())?;
                let password = non_empty(self.password.as_ref())
                    .ok_or_else(|| self.no_credentials())?;
                Ok(Authenticator::basic(username, password))
            }
            AuthType::Iam => {
                let apikey = non_empty(self.apikey.as_ref())
                    .ok_or_else(|| self.no_credentials())?;
                let auth_url = non_empty(self.auth_url.as_ref()).unwrap_or(DEFAULT_IAM_URL);
                parse_url("auth_url", auth_url)?;
                let mut transport = self.transport();
                if self.auth_disable_ssl {
                    transport = transport.insecure();
                }
                Ok(Authenticator::Iam(IamAuthenticator::with_url(
                    apikey, auth_url, &transport,
                )?))
            }
        }
    }

    /// Translate into client construction options.
    pub fn into_service_options(self) -> Result<ServiceOptions, ConfigError> {
        let mut options = ServiceOptions::new(self.authenticator()?);

        if let Some(url) = non_empty(self.url.as_ref()) {
            parse_url("url", url)?;
            options = options.with_service_url(url);
        }

        let mut transport = self.transport();
        if self.disable_ssl {
            transport = transport.insecure();
        }
        options = options.with_transport(transport);

        if self.enable_retries {
            let max_retries = self
                .max_retries
                .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX));
            let interval = Duration::from_secs(self.retry_interval.unwrap_or(0));
            options = options.with_retries(RetryPolicy::new(max_retries, interval));
        }

        Ok(options)
    }

    fn transport(&self) -> TransportConfig {
        let mut transport = TransportConfig::default();
        if let Some(secs) = self.timeout.filter(|s| *s > 0) {
            transport.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = non_empty(self.ca_file.as_ref()) {
            transport = transport.with_ca_file(path);
        }
        transport
    }

    fn no_credentials(&self) -> ConfigError {
        ConfigError::NoCredentials {
            service: self.service_name.clone(),
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::validation(field, format!("'{raw}': {e}")))
}

/// Environment key prefix for a service name: `resource_manager` → `RESOURCE_MANAGER_`.
pub fn env_prefix(service_name: &str) -> String {
    format!("{}_", service_name.to_ascii_uppercase().replace('-', "_"))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Resolve the credentials file: `$IBM_CREDENTIALS_FILE`, else
/// `./ibm-credentials.env`, else `$HOME/ibm-credentials.env`.
pub fn credentials_file_path() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CREDENTIALS_FILE_ENV) {
        if !explicit.is_empty() {
            return Some(PathBuf::from(explicit));
        }
    }

    let local = PathBuf::from(DEFAULT_CREDENTIALS_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_CREDENTIALS_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Read the entries of a `.env`-style credentials file that belong to one
/// service, keyed by lowercased property name. A missing file has none.
pub fn read_credentials_file(
    path: &Path,
    service_name: &str,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let file_error = |source: dotenvy::Error| ConfigError::CredentialsFile {
        path: path.to_path_buf(),
        source: Box::new(source),
    };

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            debug!("credentials file {} not found", path.display());
            return Ok(BTreeMap::new());
        }
        Err(e) => return Err(file_error(e)),
    };

    let prefix = env_prefix(service_name);
    let mut values = BTreeMap::new();
    for entry in entries {
        let (key, value) = entry.map_err(file_error)?;
        if let Some(property) = key.to_ascii_uppercase().strip_prefix(&prefix) {
            values.insert(property.to_ascii_lowercase(), value);
        }
    }
    Ok(values)
}

/// Load the properties of `service_name`: credentials file first, then
/// `<SERVICE_NAME>_*` environment variables on top.
pub fn load_service_properties(service_name: &str) -> Result<ServiceProperties, ConfigError> {
    let file_values = match credentials_file_path() {
        Some(path) => {
            debug!("reading credentials for {service_name} from {}", path.display());
            read_credentials_file(&path, service_name)?
        }
        None => BTreeMap::new(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(file_values))
        .merge(Env::prefixed(&env_prefix(service_name)));

    let mut props: ServiceProperties = figment.extract()?;
    props.service_name = service_name.to_owned();
    Ok(props)
}

// ── Client construction ─────────────────────────────────────────────

/// Build a service client from external configuration.
pub trait FromExternalConfig: Sized {
    /// Name whose `<NAME>_*` keys configure the client by default.
    const SERVICE_NAME: &'static str;

    fn from_service_options(options: ServiceOptions) -> Result<Self, ibm_platform_api::Error>;

    fn from_external_config() -> Result<Self, ConfigError> {
        Self::from_external_config_named(Self::SERVICE_NAME)
    }

    fn from_external_config_named(service_name: &str) -> Result<Self, ConfigError> {
        let options = load_service_properties(service_name)?.into_service_options()?;
        Ok(Self::from_service_options(options)?)
    }
}

impl FromExternalConfig for ContextBasedRestrictionsClient {
    const SERVICE_NAME: &'static str =
        ibm_platform_api::context_based_restrictions::DEFAULT_SERVICE_NAME;

    fn from_service_options(options: ServiceOptions) -> Result<Self, ibm_platform_api::Error> {
        Self::new(options)
    }
}

impl FromExternalConfig for IamIdentityClient {
    const SERVICE_NAME: &'static str =
        ibm_platform_api::iam_identity::DEFAULT_SERVICE_NAME;

    fn from_service_options(options: ServiceOptions) -> Result<Self, ibm_platform_api::Error> {
        Self::new(options)
    }
}

impl FromExternalConfig for PlatformNotificationsClient {
    const SERVICE_NAME: &'static str =
        ibm_platform_api::platform_notifications::DEFAULT_SERVICE_NAME;

    fn from_service_options(options: ServiceOptions) -> Result<Self, ibm_platform_api::Error> {
        Self::new(options)
    }
}

impl FromExternalConfig for ResourceManagerClient {
    const SERVICE_NAME: &'static str =
        ibm_platform_api::resource_manager::DEFAULT_SERVICE_NAME;

    fn from_service_options(options: ServiceOptions) -> Result<Self, ibm_platform_api::Error> {
        Self::new(options)
    }
}

// ── CLI settings ────────────────────────────────────────────────────

/// Defaults for the command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Account used when a command needs one and none was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            account_id: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    60
}

/// Path to the settings file.
pub fn settings_path() -> PathBuf {
    ProjectDirs::from("com", "ibm", "ibm-platform").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ibm-platform");
    p
}

/// Load settings from `path`, overridden by `IBM_PLATFORM_*` variables.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IBM_PLATFORM_"));

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&settings_path())
}

/// Load settings, or return defaults if the file is missing or invalid.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_default()
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    save_settings_to(&settings_path(), settings)
}

// ── Lenient scalars ─────────────────────────────────────────────────

// Credentials files yield strings while the environment provider parses
// `true` and `42` into typed values; both must land in the same fields.
mod lenient {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
    }

    impl Scalar {
        fn into_text(self) -> String {
            match self {
                Self::Bool(b) => b.to_string(),
                Self::Unsigned(n) => n.to_string(),
                Self::Signed(n) => n.to_string(),
                Self::Float(n) => n.to_string(),
                Self::Text(s) => s,
            }
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(de)?.map(Scalar::into_text))
    }

    pub fn flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
        match Option::<Scalar>::deserialize(de)? {
            None => Ok(false),
            Some(Scalar::Bool(b)) => Ok(b),
            Some(Scalar::Unsigned(n)) => Ok(n != 0),
            Some(other) => {
                let raw = other.into_text();
                match raw.trim().to_ascii_lowercase().as_str() {
                    "" | "false" | "0" | "no" => Ok(false),
                    "true" | "1" | "yes" => Ok(true),
                    _ => Err(D::Error::custom(format!("expected a boolean, found '{raw}'"))),
                }
            }
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
        match Option::<Scalar>::deserialize(de)? {
            None => Ok(None),
            Some(Scalar::Unsigned(n)) => Ok(Some(n)),
            Some(other) => {
                let raw = other.into_text();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed.parse().map(Some).map_err(|_| {
                    D::Error::custom(format!("expected a non-negative integer, found '{raw}'"))
                })
            }
        }
    }
}
