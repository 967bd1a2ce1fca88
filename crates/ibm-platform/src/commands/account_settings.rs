//! Context-based restriction account settings.

use ibm_platform_api::ContextBasedRestrictionsClient;
use ibm_platform_api::context_based_restrictions::{GetAccountSettingsOptions, OutAccountSettings};

use crate::cli::{AccountSettingsArgs, AccountSettingsCommand, GlobalOpts};
use crate::config::require_account;
use crate::error::CliError;
use crate::output;

fn settings_detail(s: &OutAccountSettings, color: bool) -> String {
    let usage = |current: i64, limit: i64| {
        output::status(&format!("{current} / {limit}"), current < limit, color)
    };
    output::detail(
        &[
            ("Account", s.id.clone()),
            ("CRN", s.crn.clone()),
            ("Zones", usage(s.current_zone_count, s.zone_count_limit)),
            ("Rules", usage(s.current_rule_count, s.rule_count_limit)),
            ("Modified", s.last_modified_at.to_rfc3339()),
        ],
        color,
    )
}

pub async fn handle(
    client: &ContextBasedRestrictionsClient,
    args: AccountSettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountSettingsCommand::Get => {
            let color = output::should_color(&global.color);
            let opts = GetAccountSettingsOptions::new(require_account(global)?);
            let settings = client.get_account_settings(&opts).await?.into_result()?;
            let out = output::render_single(
                &global.format(),
                &settings,
                |s| settings_detail(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
