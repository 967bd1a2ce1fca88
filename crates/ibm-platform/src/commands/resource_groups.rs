//! Resource group command handlers.

use tabled::Tabled;

use ibm_platform_api::ResourceManagerClient;
use ibm_platform_api::resource_manager::{
    CreateResourceGroupOptions, ListResourceGroupsOptions, ResourceGroup, ResourceIdOptions,
    UpdateResourceGroupOptions,
};

use crate::cli::{GlobalOpts, ResourceGroupsArgs, ResourceGroupsCommand};
use crate::config::require_account;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceGroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Default")]
    default: String,
}

impl From<&ResourceGroup> for ResourceGroupRow {
    fn from(g: &ResourceGroup) -> Self {
        Self {
            id: util::or_dash(g.id.as_deref()),
            name: util::or_dash(g.name.as_deref()),
            state: util::or_dash(g.state.as_deref()),
            default: util::yes_no(g.default.unwrap_or(false)),
        }
    }
}

fn group_detail(g: &ResourceGroup, color: bool) -> String {
    let state = g.state.as_deref().unwrap_or_default();
    output::detail(
        &[
            ("ID", g.id.clone().unwrap_or_default()),
            ("Name", g.name.clone().unwrap_or_default()),
            ("CRN", g.crn.clone().unwrap_or_default()),
            ("Account", g.account_id.clone().unwrap_or_default()),
            ("State", output::status(state, state == "ACTIVE", color)),
            ("Default", g.default.map(util::yes_no).unwrap_or_default()),
            ("Quota", g.quota_id.clone().unwrap_or_default()),
            ("Created", g.created_at.clone().unwrap_or_default()),
            ("Updated", g.updated_at.clone().unwrap_or_default()),
        ],
        color,
    )
}

fn group_id(g: &ResourceGroup) -> String {
    g.id.clone().unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ResourceManagerClient,
    args: ResourceGroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ResourceGroupsCommand::List { date } => {
            let opts = ListResourceGroupsOptions {
                account_id: global.account_id.clone(),
                date,
                ..Default::default()
            };
            let list = client.list_resource_groups(&opts).await?.into_result()?;
            let out = output::render_list(
                &global.format(),
                &list.resources,
                |g| ResourceGroupRow::from(g),
                group_id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceGroupsCommand::Get { id } => {
            let group = client
                .get_resource_group(&ResourceIdOptions::new(&id))
                .await
                .map_err(util::not_found("resource group", &id, "resource-groups list"))?
                .into_result()?;
            let out = output::render_single(
                &global.format(),
                &group,
                |g| group_detail(g, color),
                group_id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceGroupsCommand::Create { name } => {
            let opts = CreateResourceGroupOptions::new(name, require_account(global)?);
            let created = client.create_resource_group(&opts).await?.into_result()?;
            let id = created.id.clone().unwrap_or_default();
            util::done(&format!("Resource group {id} created"), global.quiet);
            let out = output::render_single(
                &global.format(),
                &created,
                |c| {
                    output::detail(
                        &[
                            ("ID", c.id.clone().unwrap_or_default()),
                            ("CRN", c.crn.clone().unwrap_or_default()),
                        ],
                        color,
                    )
                },
                |c| c.id.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceGroupsCommand::Rename { id, name } => {
            let opts = UpdateResourceGroupOptions {
                name: Some(name),
                ..UpdateResourceGroupOptions::new(&id)
            };
            let resp = client
                .update_resource_group(&opts)
                .await
                .map_err(util::not_found("resource group", &id, "resource-groups list"))?;
            util::done("Resource group renamed", global.quiet);
            if let Some(group) = resp.result {
                let out = output::render_single(
                    &global.format(),
                    &group,
                    |g| group_detail(g, color),
                    group_id,
                )?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        ResourceGroupsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete resource group '{id}'?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_resource_group(&ResourceIdOptions::new(&id))
                .await
                .map_err(util::not_found("resource group", &id, "resource-groups list"))?;
            util::done("Resource group deleted", global.quiet);
            Ok(())
        }
    }
}
