//! Config subcommand handlers.

use std::collections::BTreeMap;

use dialoguer::{Input, Select};
use serde::Serialize;

use ibm_platform_api::{
    ContextBasedRestrictionsClient, IamIdentityClient, PlatformNotificationsClient,
    ResourceManagerClient,
};
use ibm_platform_config::{FromExternalConfig, ServiceProperties, load_service_properties};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

/// Services whose external configuration `config show` reports.
const SERVICES: [&str; 4] = [
    ContextBasedRestrictionsClient::SERVICE_NAME,
    IamIdentityClient::SERVICE_NAME,
    PlatformNotificationsClient::SERVICE_NAME,
    ResourceManagerClient::SERVICE_NAME,
];

const OUTPUT_CHOICES: [&str; 5] = ["table", "json", "json-compact", "yaml", "plain"];

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn mask(secret: &mut Option<String>) {
    if secret.is_some() {
        *secret = Some("****".into());
    }
}

/// Service properties with every secret replaced by `****`.
fn redacted(mut props: ServiceProperties) -> ServiceProperties {
    mask(&mut props.apikey);
    mask(&mut props.bearer_token);
    mask(&mut props.password);
    props
}

#[derive(Serialize)]
struct ConfigReport {
    settings_path: String,
    credentials_file: Option<String>,
    settings: Settings,
    services: BTreeMap<String, ServiceProperties>,
}

fn report_text(r: &ConfigReport, color: bool) -> String {
    let mut out = output::detail(
        &[
            ("Settings file", r.settings_path.clone()),
            (
                "Credentials file",
                r.credentials_file.clone().unwrap_or_else(|| "(none)".into()),
            ),
            ("Output", r.settings.output.clone()),
            ("Color", r.settings.color.clone()),
            ("Timeout", format!("{}s", r.settings.timeout)),
            ("Account", r.settings.account_id.clone().unwrap_or_default()),
        ],
        color,
    );
    for (name, props) in &r.services {
        let auth = props
            .auth_type()
            .map_or_else(|_| "(not configured)".into(), |t| t.to_string());
        let flag = |on: bool| if on { "true".to_owned() } else { String::new() };
        out.push_str(&format!("\n\n{}\n", output::label(name, color)));
        out.push_str(&output::detail(
            &[
                ("  URL", props.url.clone().unwrap_or_else(|| "(default)".into())),
                ("  Auth", auth),
                ("  API key", props.apikey.clone().unwrap_or_default()),
                ("  Bearer token", props.bearer_token.clone().unwrap_or_default()),
                ("  Username", props.username.clone().unwrap_or_default()),
                ("  Password", props.password.clone().unwrap_or_default()),
                ("  Auth URL", props.auth_url.clone().unwrap_or_default()),
                ("  Disable SSL", flag(props.disable_ssl)),
                ("  Retries", flag(props.enable_retries)),
                ("  Timeout", props.timeout.map(|t| format!("{t}s")).unwrap_or_default()),
            ],
            color,
        ));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::settings_path();
            eprintln!("IBM Cloud platform CLI configuration");
            eprintln!("   Settings path: {}\n", path.display());

            let current = OUTPUT_CHOICES
                .iter()
                .position(|c| *c == settings.output)
                .unwrap_or(0);
            let output_idx = Select::new()
                .with_prompt("Default output format")
                .items(&OUTPUT_CHOICES)
                .default(current)
                .interact()
                .map_err(prompt_err)?;

            let account_id: String = Input::new()
                .with_prompt("Account ID (blank to skip)")
                .default(settings.account_id.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let timeout: u64 = Input::new()
                .with_prompt("Request timeout (seconds)")
                .default(settings.timeout)
                .interact_text()
                .map_err(prompt_err)?;

            let new = Settings {
                output: OUTPUT_CHOICES[output_idx].into(),
                account_id: Some(account_id).filter(|id| !id.is_empty()),
                timeout,
                ..settings.clone()
            };
            config::save_settings(&new)?;

            eprintln!("\nSettings written to {}", path.display());
            eprintln!("  Credentials are read from ibm-credentials.env or <SERVICE>_APIKEY.");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut services = BTreeMap::new();
            for name in SERVICES {
                services.insert(name.to_owned(), redacted(load_service_properties(name)?));
            }
            let report = ConfigReport {
                settings_path: config::settings_path().display().to_string(),
                credentials_file: config::credentials_file_path().map(|p| p.display().to_string()),
                settings: settings.clone(),
                services,
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.format(),
                &report,
                |r| report_text(r, color),
                |r| r.settings_path.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
