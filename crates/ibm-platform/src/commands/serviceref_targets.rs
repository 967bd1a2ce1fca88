//! Service reference target listing.

use tabled::Tabled;

use ibm_platform_api::ContextBasedRestrictionsClient;
use ibm_platform_api::context_based_restrictions::{
    ListAvailableServiceRefTargetsOptions, ServiceRefTarget, ServiceRefTargetType,
};

use crate::cli::{GlobalOpts, ServicerefTargetsArgs, ServicerefTargetsCommand, TargetTypeArg};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "Service")]
    service_name: String,
    #[tabled(rename = "Type")]
    service_type: String,
}

impl From<&ServiceRefTarget> for TargetRow {
    fn from(t: &ServiceRefTarget) -> Self {
        Self {
            service_name: util::or_dash(t.service_name.as_deref()),
            service_type: util::or_dash(t.service_type.as_deref()),
        }
    }
}

pub async fn handle(
    client: &ContextBasedRestrictionsClient,
    args: ServicerefTargetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ServicerefTargetsCommand::List { target_type } => {
            let opts = ListAvailableServiceRefTargetsOptions {
                target_type: target_type.map(|t| match t {
                    TargetTypeArg::All => ServiceRefTargetType::All,
                    TargetTypeArg::PlatformService => ServiceRefTargetType::PlatformService,
                }),
                ..Default::default()
            };
            let page = client
                .list_available_serviceref_targets(&opts)
                .await?
                .into_result()?;
            let out = output::render_list(
                &global.format(),
                &page.targets,
                |t| TargetRow::from(t),
                |t| t.service_name.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
