//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use ibm_platform_api::Error as ClientError;
use ibm_platform_api::iam_identity::SortOrder;

use crate::cli::SortOrderArg;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.to_owned(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// Turn a 404 into a `NotFound` naming the resource and its list command.
pub fn not_found(
    resource_type: &str,
    identifier: &str,
    list_command: &str,
) -> impl FnOnce(ClientError) -> CliError {
    move |err| {
        if err.is_not_found() {
            CliError::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: list_command.into(),
            }
        } else {
            err.into()
        }
    }
}

/// Print a status line to stderr unless `--quiet`.
pub fn done(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_owned()
}

pub fn sort_order(order: SortOrderArg) -> SortOrder {
    match order {
        SortOrderArg::Asc => SortOrder::Asc,
        SortOrderArg::Desc => SortOrder::Desc,
    }
}
