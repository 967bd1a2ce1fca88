//! Quota definition and resource quota command handlers.

use tabled::Tabled;

use ibm_platform_api::ResourceManagerClient;
use ibm_platform_api::resource_manager::{
    AccountQuotaOptions, ErrorCollection, ListQuotaDefinitionsOptions, QuotaDefinition,
    ResourceIdOptions, ResourceQuota, ResourceQuotaOptions, ResourceTypeOptions,
};

use crate::cli::{GlobalOpts, QuotasArgs, QuotasCommand};
use crate::config::require_account;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct QuotaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Apps")]
    apps: String,
    #[tabled(rename = "Service instances")]
    instances: String,
}

impl From<&QuotaDefinition> for QuotaRow {
    fn from(q: &QuotaDefinition) -> Self {
        Self {
            id: util::or_dash(q.id.as_deref()),
            name: util::or_dash(q.name.as_deref()),
            kind: util::or_dash(q.quota_type.as_deref()),
            apps: number(q.number_of_apps),
            instances: number(q.number_of_service_instances),
        }
    }
}

fn number(n: Option<f64>) -> String {
    n.map_or_else(|| "-".into(), |n| n.to_string())
}

fn quota_detail(q: &QuotaDefinition, color: bool) -> String {
    let opt = |n: Option<f64>| n.map(|n| n.to_string()).unwrap_or_default();
    let limits = q
        .resource_quotas
        .iter()
        .map(|r| {
            format!(
                "{}: {}",
                r.resource_id.as_deref().unwrap_or("-"),
                number(r.limit)
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ");
    output::detail(
        &[
            ("ID", q.id.clone().unwrap_or_default()),
            ("Name", q.name.clone().unwrap_or_default()),
            ("Type", q.quota_type.clone().unwrap_or_default()),
            ("Apps", opt(q.number_of_apps)),
            ("Service instances", opt(q.number_of_service_instances)),
            ("Lite instances", opt(q.default_number_of_instances_per_lite_plan)),
            ("Instances per app", opt(q.instances_per_app)),
            ("Instance memory", q.instance_memory.clone().unwrap_or_default()),
            ("Total app memory", q.total_app_memory.clone().unwrap_or_default()),
            ("VSI limit", opt(q.vsi_limit)),
            ("Resource limits", limits),
            ("Created", q.created_at.clone().unwrap_or_default()),
            ("Updated", q.updated_at.clone().unwrap_or_default()),
        ],
        color,
    )
}

fn resource_quota_detail(r: &ResourceQuota, color: bool) -> String {
    output::detail(
        &[
            ("ID", r.id.clone().unwrap_or_default()),
            ("Resource", r.resource_id.clone().unwrap_or_default()),
            ("CRN", r.crn.clone().unwrap_or_default()),
            ("Limit", r.limit.map(|n| n.to_string()).unwrap_or_default()),
        ],
        color,
    )
}

fn status_detail(s: &ErrorCollection, color: bool) -> String {
    output::detail(
        &[
            ("Code", s.error_code.clone().unwrap_or_default()),
            ("Message", s.message.clone().unwrap_or_default()),
            ("Status", s.status_code.clone().unwrap_or_default()),
            ("Transaction", s.transaction_id.clone().unwrap_or_default()),
        ],
        color,
    )
}

fn print_quota(quota: &QuotaDefinition, global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    let out = output::render_single(
        &global.format(),
        quota,
        |q| quota_detail(q, color),
        |q| q.id.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_resource_quota(
    quota: &ResourceQuota,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let out = output::render_single(
        &global.format(),
        quota,
        |r| resource_quota_detail(r, color),
        |r| r.id.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Report a write: the done line, then whatever status body came back.
fn print_status(
    message: &str,
    status: Option<ErrorCollection>,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    util::done(message, global.quiet);
    if let Some(status) = status {
        let out = output::render_single(
            &global.format(),
            &status,
            |s| status_detail(s, color),
            |s| s.transaction_id.clone().unwrap_or_default(),
        )?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

pub async fn handle(
    client: &ResourceManagerClient,
    args: QuotasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        QuotasCommand::List => {
            let list = client
                .list_quota_definitions(&ListQuotaDefinitionsOptions::default())
                .await?
                .into_result()?;
            let out = output::render_list(
                &global.format(),
                &list.resources,
                |q| QuotaRow::from(q),
                |q| q.id.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QuotasCommand::Get { id } => {
            let quota = client
                .get_quota_definition(&ResourceIdOptions::new(&id))
                .await
                .map_err(util::not_found("quota definition", &id, "quotas list"))?
                .into_result()?;
            print_quota(&quota, global, color)
        }

        QuotasCommand::Account => {
            let account_id = require_account(global)?;
            let quota = client
                .get_account_quota_list(&AccountQuotaOptions::new(&account_id))
                .await
                .map_err(util::not_found("account quota", &account_id, "quotas list"))?
                .into_result()?;
            print_quota(&quota, global, color)
        }

        QuotasCommand::Resource { resource_type } => {
            let opts = ResourceQuotaOptions::new(require_account(global)?, &resource_type);
            let quota = client
                .get_resource_quota(&opts)
                .await
                .map_err(util::not_found("resource quota", &resource_type, "quotas account"))?
                .into_result()?;
            print_resource_quota(&quota, global, color)
        }

        QuotasCommand::SetResource { resource_type } => {
            let opts = ResourceQuotaOptions::new(require_account(global)?, &resource_type);
            let resp = client.update_resource_quota(&opts).await?;
            print_status(
                &format!("Quota for {resource_type} updated"),
                resp.result,
                global,
                color,
            )
        }

        QuotasCommand::DeleteResource { resource_type } => {
            let opts = ResourceQuotaOptions::new(require_account(global)?, &resource_type);
            if !util::confirm(
                &format!("Remove the quota override for '{resource_type}'?"),
                global.yes,
            )? {
                return Ok(());
            }
            let resp = client
                .delete_resource_quota(&opts)
                .await
                .map_err(util::not_found("resource quota", &resource_type, "quotas account"))?;
            print_status(
                &format!("Quota override for {resource_type} removed"),
                resp.result,
                global,
                color,
            )
        }

        QuotasCommand::CreateDefault { resource_type } => {
            let resp = client
                .create_default_resource_quota(&ResourceTypeOptions::new(&resource_type))
                .await?;
            print_status(
                &format!("Default quota for {resource_type} created"),
                resp.result,
                global,
                color,
            )
        }

        QuotasCommand::CreateSchema { resource_type } => {
            let resp = client
                .create_schema(&ResourceTypeOptions::new(&resource_type))
                .await?;
            print_status(
                &format!("Quota schema for {resource_type} registered"),
                resp.result,
                global,
                color,
            )
        }

        QuotasCommand::Schema { resource_type } => {
            let schema = client
                .get_schema(&ResourceTypeOptions::new(&resource_type))
                .await
                .map_err(util::not_found("quota schema", &resource_type, "quotas list"))?
                .into_result()?;
            print_resource_quota(&schema, global, color)
        }
    }
}
