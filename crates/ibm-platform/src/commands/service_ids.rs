//! IAM service ID command handlers.

use tabled::Tabled;

use ibm_platform_api::IamIdentityClient;
use ibm_platform_api::iam_identity::{
    GetServiceIdOptions, ListServiceIdsOptions, ServiceIdDetails, ServiceIdIdOptions,
};

use crate::cli::{GlobalOpts, ServiceIdsArgs, ServiceIdsCommand};
use crate::config::require_account;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceIdRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IAM ID")]
    iam_id: String,
    #[tabled(rename = "Locked")]
    locked: String,
}

impl From<&ServiceIdDetails> for ServiceIdRow {
    fn from(s: &ServiceIdDetails) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            iam_id: s.iam_id.clone(),
            locked: util::yes_no(s.locked),
        }
    }
}

fn service_id_detail(s: &ServiceIdDetails, color: bool) -> String {
    let mut pairs = vec![
        ("ID", s.id.clone()),
        ("Name", s.name.clone()),
        ("Description", s.description.clone().unwrap_or_default()),
        ("IAM ID", s.iam_id.clone()),
        ("CRN", s.crn.clone()),
        ("Account", s.account_id.clone()),
        ("Locked", output::status(&util::yes_no(s.locked), !s.locked, color)),
        ("Instance CRNs", s.unique_instance_crns.join(", ")),
        ("API key", s.apikey.as_ref().map(|k| k.id.clone()).unwrap_or_default()),
        ("Created", s.created_at.clone().unwrap_or_default()),
        ("Modified", s.modified_at.clone().unwrap_or_default()),
    ];
    if !s.history.is_empty() {
        let history = s
            .history
            .iter()
            .map(|h| format!("{} {} by {}", h.timestamp, h.action, h.iam_id))
            .collect::<Vec<_>>()
            .join("\n  ");
        pairs.push(("History", history));
    }
    output::detail(&pairs, color)
}

/// Page through `list_service_ids`, following `next` when `all` is set.
async fn list_all(
    client: &IamIdentityClient,
    mut opts: ListServiceIdsOptions,
    all: bool,
) -> Result<(Vec<ServiceIdDetails>, Option<String>), CliError> {
    let mut ids = Vec::new();
    loop {
        let page = client.list_service_ids(&opts).await?.into_result()?;
        let next = page.next_pagetoken();
        ids.extend(page.serviceids);
        match next {
            Some(token) if all => opts.pagetoken = Some(token),
            next => return Ok((ids, next)),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &IamIdentityClient,
    args: ServiceIdsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ServiceIdsCommand::List { name, page } => {
            let opts = ListServiceIdsOptions {
                account_id: Some(require_account(global)?),
                name,
                pagesize: page.page_size,
                pagetoken: page.page_token,
                sort: page.sort,
                order: page.order.map(util::sort_order),
                ..Default::default()
            };
            let (ids, next) = list_all(client, opts, page.all).await?;
            let out = output::render_list(
                &global.format(),
                &ids,
                |s| ServiceIdRow::from(s),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if let Some(token) = next {
                util::done(&format!("More results: --page-token {token}"), global.quiet);
            }
            Ok(())
        }

        ServiceIdsCommand::Get { id, history } => {
            let opts = GetServiceIdOptions {
                include_history: history.then_some(true),
                ..GetServiceIdOptions::new(&id)
            };
            let sid = client
                .get_service_id(&opts)
                .await
                .map_err(util::not_found("service ID", &id, "service-ids list"))?
                .into_result()?;
            let out = output::render_single(
                &global.format(),
                &sid,
                |s| service_id_detail(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServiceIdsCommand::Lock { id } => {
            let resp = client
                .lock_service_id(&ServiceIdIdOptions::new(&id))
                .await
                .map_err(util::not_found("service ID", &id, "service-ids list"))?;
            util::done("Service ID locked", global.quiet);
            show_updated(resp.result.as_ref(), global, color)
        }

        ServiceIdsCommand::Unlock { id } => {
            let resp = client
                .unlock_service_id(&ServiceIdIdOptions::new(&id))
                .await
                .map_err(util::not_found("service ID", &id, "service-ids list"))?;
            util::done("Service ID unlocked", global.quiet);
            show_updated(resp.result.as_ref(), global, color)
        }
    }
}

/// Lock and unlock may answer 204 or echo the service ID.
fn show_updated(
    sid: Option<&ServiceIdDetails>,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let Some(sid) = sid else {
        return Ok(());
    };
    let out = output::render_single(
        &global.format(),
        sid,
        |s| service_id_detail(s, color),
        |s| s.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
