//! Context-based restriction rule command handlers.

use tabled::Tabled;

use ibm_platform_api::ContextBasedRestrictionsClient;
use ibm_platform_api::context_based_restrictions::{
    DeleteRuleOptions, GetRuleOptions, ListRulesOptions, OutRule,
};

use crate::cli::{GlobalOpts, RulesArgs, RulesCommand};
use crate::config::require_account;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Contexts")]
    contexts: usize,
}

impl From<&OutRule> for RuleRow {
    fn from(r: &OutRule) -> Self {
        Self {
            id: r.id.clone(),
            description: r.description.clone().unwrap_or_default(),
            service: services(r),
            contexts: r.contexts.len(),
        }
    }
}

/// `serviceName` attribute of every resource the rule protects.
fn services(rule: &OutRule) -> String {
    rule.resources
        .iter()
        .filter_map(|res| res.attribute("serviceName"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn rule_detail(r: &OutRule, color: bool) -> String {
    let contexts = r
        .contexts
        .iter()
        .map(|ctx| {
            ctx.attributes
                .iter()
                .map(|a| format!("{}={}", a.name, a.value))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("; ");
    output::detail(
        &[
            ("ID", r.id.clone()),
            ("Description", r.description.clone().unwrap_or_default()),
            ("CRN", r.crn.clone()),
            ("Services", services(r)),
            ("Contexts", contexts),
            ("Created", r.created_at.to_rfc3339()),
            ("Modified", r.last_modified_at.to_rfc3339()),
        ],
        color,
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ContextBasedRestrictionsClient,
    args: RulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RulesCommand::List {
            region,
            resource,
            resource_type,
            service_instance,
            service_name,
            service_type,
            zone_id,
            sort,
        } => {
            let opts = ListRulesOptions {
                region,
                resource,
                resource_type,
                service_instance,
                service_name,
                service_type,
                zone_id,
                sort,
                ..ListRulesOptions::new(require_account(global)?)
            };
            let page = client.list_rules(&opts).await?.into_result()?;
            let out = output::render_list(
                &global.format(),
                &page.rules,
                |r| RuleRow::from(r),
                |r| r.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RulesCommand::Get { rule_id } => {
            let color = output::should_color(&global.color);
            let rule = client
                .get_rule(&GetRuleOptions::new(&rule_id))
                .await
                .map_err(util::not_found("rule", &rule_id, "rules list"))?
                .into_result()?;
            let out = output::render_single(
                &global.format(),
                &rule,
                |r| rule_detail(r, color),
                |r| r.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RulesCommand::Delete { rule_id } => {
            if !util::confirm(&format!("Delete rule '{rule_id}'?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_rule(&DeleteRuleOptions::new(&rule_id))
                .await
                .map_err(util::not_found("rule", &rule_id, "rules list"))?;
            util::done("Rule deleted", global.quiet);
            Ok(())
        }
    }
}
