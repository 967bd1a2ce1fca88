//! Command dispatch: builds the service client a command needs, then hands
//! it to the matching handler.

pub mod account_settings;
pub mod api_keys;
pub mod config_cmd;
pub mod destinations;
pub mod quotas;
pub mod resource_groups;
pub mod rules;
pub mod service_ids;
pub mod serviceref_targets;
pub mod util;
pub mod zones;

use ibm_platform_config::Settings;

use crate::cli::{Command, GlobalOpts};
use crate::config::build_client;
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    global: &GlobalOpts,
    settings: &Settings,
) -> Result<(), CliError> {
    match cmd {
        Command::Zones(args) => zones::handle(&build_client(global, settings)?, args, global).await,
        Command::Rules(args) => rules::handle(&build_client(global, settings)?, args, global).await,
        Command::AccountSettings(args) => {
            account_settings::handle(&build_client(global, settings)?, args, global).await
        }
        Command::ServicerefTargets(args) => {
            serviceref_targets::handle(&build_client(global, settings)?, args, global).await
        }
        Command::ApiKeys(args) => {
            api_keys::handle(&build_client(global, settings)?, args, global).await
        }
        Command::ServiceIds(args) => {
            service_ids::handle(&build_client(global, settings)?, args, global).await
        }
        Command::Destinations(args) => {
            destinations::handle(&build_client(global, settings)?, args, global).await
        }
        Command::ResourceGroups(args) => {
            resource_groups::handle(&build_client(global, settings)?, args, global).await
        }
        Command::Quotas(args) => quotas::handle(&build_client(global, settings)?, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
