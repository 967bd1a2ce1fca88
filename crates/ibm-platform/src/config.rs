//! CLI configuration: a thin wrapper around `ibm_platform_config`.
//!
//! Resolves settings-file defaults into `GlobalOpts` and builds service
//! clients from external configuration with CLI flag overrides applied.

use ibm_platform_api::AuthType;
use ibm_platform_config::{FromExternalConfig, ServiceProperties, load_service_properties};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ibm_platform_config::{
    Settings, credentials_file_path, load_settings_or_default, save_settings, settings_path,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Fill unset global flags from the settings file (flag > env > settings).
pub fn apply_settings(global: &mut GlobalOpts, settings: &Settings) {
    if global.output.is_none() {
        global.output = parse_output(&settings.output);
    }
    if global.account_id.is_none() {
        global.account_id.clone_from(&settings.account_id);
    }
}

fn parse_output(raw: &str) -> Option<OutputFormat> {
    match raw {
        "table" => Some(OutputFormat::Table),
        "json" => Some(OutputFormat::Json),
        "json-compact" => Some(OutputFormat::JsonCompact),
        "yaml" => Some(OutputFormat::Yaml),
        "plain" => Some(OutputFormat::Plain),
        other => {
            tracing::warn!("ignoring unknown output format '{other}' in settings");
            None
        }
    }
}

/// Service properties for `service_name` with CLI flag overrides applied.
///
/// `--apikey` switches to IAM authentication, `--url` replaces the
/// endpoint, and the timeout falls back to the settings file.
pub fn resolve_properties(
    service_name: &str,
    global: &GlobalOpts,
    settings: &Settings,
) -> Result<ServiceProperties, CliError> {
    let mut props = load_service_properties(service_name)?;

    if let Some(ref key) = global.apikey {
        props.apikey = Some(key.clone());
        props.auth_type = Some(AuthType::Iam.to_string());
    }
    if let Some(ref url) = global.url {
        props.url = Some(url.clone());
    }
    if global.insecure {
        props.disable_ssl = true;
        props.auth_disable_ssl = true;
    }
    props.timeout = global
        .timeout
        .or(props.timeout)
        .or(Some(settings.timeout));

    Ok(props)
}

/// Build a service client for the command being dispatched.
pub fn build_client<C: FromExternalConfig>(
    global: &GlobalOpts,
    settings: &Settings,
) -> Result<C, CliError> {
    let props = resolve_properties(C::SERVICE_NAME, global, settings)?;
    tracing::debug!(
        service = C::SERVICE_NAME,
        url = props.url.as_deref().unwrap_or("(default)"),
        "building client"
    );
    let options = props.into_service_options()?;
    Ok(C::from_service_options(options)?)
}

/// The account ID for account-scoped commands.
pub fn require_account(global: &GlobalOpts) -> Result<String, CliError> {
    global
        .account_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(CliError::NoAccount)
}
