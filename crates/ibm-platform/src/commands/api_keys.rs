//! IAM API key command handlers.

use tabled::Tabled;

use ibm_platform_api::IamIdentityClient;
use ibm_platform_api::iam_identity::{
    ApiKeyDetails, ApiKeyIdOptions, ApiKeyOwnerType, ApiKeyScope, GetApiKeyOptions,
    ListApiKeysOptions,
};

use crate::cli::{ApiKeysArgs, ApiKeysCommand, GlobalOpts, OwnerTypeArg, ScopeArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ApiKeyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    iam_id: String,
    #[tabled(rename = "Locked")]
    locked: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&ApiKeyDetails> for ApiKeyRow {
    fn from(k: &ApiKeyDetails) -> Self {
        Self {
            id: k.id.clone(),
            name: k.name.clone(),
            iam_id: k.iam_id.clone(),
            locked: util::yes_no(k.locked),
            created_at: util::or_dash(k.created_at.as_deref()),
        }
    }
}

pub(super) fn api_key_detail(k: &ApiKeyDetails, color: bool) -> String {
    let mut pairs = vec![
        ("ID", k.id.clone()),
        ("Name", k.name.clone()),
        ("Description", k.description.clone().unwrap_or_default()),
        ("CRN", k.crn.clone()),
        ("Owner", k.iam_id.clone()),
        ("Account", k.account_id.clone()),
        ("Locked", output::status(&util::yes_no(k.locked), !k.locked, color)),
        ("Created", k.created_at.clone().unwrap_or_default()),
        ("Created by", k.created_by.clone()),
        ("Modified", k.modified_at.clone().unwrap_or_default()),
    ];
    if !k.history.is_empty() {
        let history = k
            .history
            .iter()
            .map(|h| format!("{} {} by {}", h.timestamp, h.action, h.iam_id))
            .collect::<Vec<_>>()
            .join("\n  ");
        pairs.push(("History", history));
    }
    output::detail(&pairs, color)
}

/// Page through `list_api_keys`, following `next` when `all` is set.
async fn list_all(
    client: &IamIdentityClient,
    mut opts: ListApiKeysOptions,
    all: bool,
) -> Result<(Vec<ApiKeyDetails>, Option<String>), CliError> {
    let mut keys = Vec::new();
    loop {
        let page = client.list_api_keys(&opts).await?.into_result()?;
        let next = page.next_pagetoken();
        keys.extend(page.apikeys);
        match next {
            Some(token) if all => opts.pagetoken = Some(token),
            next => return Ok((keys, next)),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &IamIdentityClient,
    args: ApiKeysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ApiKeysCommand::List {
            iam_id,
            scope,
            owner_type,
            page,
        } => {
            let opts = ListApiKeysOptions {
                account_id: global.account_id.clone(),
                iam_id,
                pagesize: page.page_size,
                pagetoken: page.page_token,
                scope: scope.map(|s| match s {
                    ScopeArg::Entity => ApiKeyScope::Entity,
                    ScopeArg::Account => ApiKeyScope::Account,
                }),
                owner_type: owner_type.map(|t| match t {
                    OwnerTypeArg::User => ApiKeyOwnerType::User,
                    OwnerTypeArg::Serviceid => ApiKeyOwnerType::Serviceid,
                }),
                sort: page.sort,
                order: page.order.map(util::sort_order),
                ..Default::default()
            };
            let (keys, next) = list_all(client, opts, page.all).await?;
            let out = output::render_list(
                &global.format(),
                &keys,
                |k| ApiKeyRow::from(k),
                |k| k.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if let Some(token) = next {
                util::done(&format!("More results: --page-token {token}"), global.quiet);
            }
            Ok(())
        }

        ApiKeysCommand::Get { id, history } => {
            let opts = GetApiKeyOptions {
                include_history: history.then_some(true),
                ..GetApiKeyOptions::new(&id)
            };
            let key = client
                .get_api_key(&opts)
                .await
                .map_err(util::not_found("API key", &id, "api-keys list"))?
                .into_result()?;
            let out = output::render_single(
                &global.format(),
                &key,
                |k| api_key_detail(k, color),
                |k| k.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApiKeysCommand::Lock { id } => {
            client
                .lock_api_key(&ApiKeyIdOptions::new(&id))
                .await
                .map_err(util::not_found("API key", &id, "api-keys list"))?;
            util::done("API key locked", global.quiet);
            Ok(())
        }

        ApiKeysCommand::Unlock { id } => {
            client
                .unlock_api_key(&ApiKeyIdOptions::new(&id))
                .await
                .map_err(util::not_found("API key", &id, "api-keys list"))?;
            util::done("API key unlocked", global.quiet);
            Ok(())
        }

        ApiKeysCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete API key '{id}'? Applications using it will stop working."),
                global.yes,
            )? {
                return Ok(());
            }
            client
                .delete_api_key(&ApiKeyIdOptions::new(&id))
                .await
                .map_err(util::not_found("API key", &id, "api-keys list"))?;
            util::done("API key deleted", global.quiet);
            Ok(())
        }
    }
}
