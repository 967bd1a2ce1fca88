//! Network zone command handlers.

use tabled::Tabled;

use ibm_platform_api::ContextBasedRestrictionsClient;
use ibm_platform_api::context_based_restrictions::{
    Address, CreateZoneOptions, DeleteZoneOptions, GetZoneOptions, ListZonesOptions, OutZone,
    OutZoneSummary, ServiceRefValue,
};

use crate::cli::{GlobalOpts, ZonesArgs, ZonesCommand};
use crate::config::require_account;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Addresses")]
    addresses: i64,
    #[tabled(rename = "Excluded")]
    excluded: i64,
    #[tabled(rename = "Preview")]
    preview: String,
}

impl From<&OutZoneSummary> for ZoneRow {
    fn from(z: &OutZoneSummary) -> Self {
        Self {
            id: z.id.clone(),
            name: z.name.clone(),
            addresses: z.address_count,
            excluded: z.excluded_count,
            preview: z
                .addresses_preview
                .iter()
                .map(Address::display_value)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn zone_detail(z: &OutZone, color: bool) -> String {
    let list = |addrs: &[Address]| {
        addrs
            .iter()
            .map(Address::display_value)
            .collect::<Vec<_>>()
            .join(", ")
    };
    output::detail(
        &[
            ("ID", z.id.clone()),
            ("Name", z.name.clone()),
            ("Description", z.description.clone().unwrap_or_default()),
            ("CRN", z.crn.clone()),
            ("Account", z.account_id.clone()),
            ("Addresses", list(&z.addresses)),
            ("Excluded", list(&z.excluded)),
            ("Created", z.created_at.to_rfc3339()),
            ("Modified", z.last_modified_at.to_rfc3339()),
        ],
        color,
    )
}

/// Collect addresses from the repeatable flags and an optional JSON file.
fn collect_addresses(
    account_id: &str,
    flags: [Vec<String>; 5],
    from_file: Option<&std::path::Path>,
) -> Result<Vec<Address>, CliError> {
    let [ips, ranges, subnets, vpcs, service_refs] = flags;
    let mut addresses: Vec<Address> = match from_file {
        Some(path) => util::read_json_file(path)?,
        None => Vec::new(),
    };
    addresses.extend(ips.into_iter().map(Address::ip_address));
    addresses.extend(ranges.into_iter().map(Address::ip_range));
    addresses.extend(subnets.into_iter().map(Address::subnet));
    addresses.extend(vpcs.into_iter().map(Address::vpc));
    addresses.extend(service_refs.into_iter().map(|name| {
        Address::service_ref(ServiceRefValue {
            service_name: Some(name),
            ..ServiceRefValue::new(account_id)
        })
    }));

    if addresses.is_empty() {
        return Err(CliError::Validation {
            field: "addresses".into(),
            reason: "a zone needs at least one address (--ip, --ip-range, --subnet, --vpc, \
                     --service-ref or --from-file)"
                .into(),
        });
    }
    Ok(addresses)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ContextBasedRestrictionsClient,
    args: ZonesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ZonesCommand::List { name, sort } => {
            let opts = ListZonesOptions {
                name,
                sort,
                ..ListZonesOptions::new(require_account(global)?)
            };
            let page = client.list_zones(&opts).await?.into_result()?;
            let out = output::render_list(
                &global.format(),
                &page.zones,
                |z| ZoneRow::from(z),
                |z| z.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZonesCommand::Get { zone_id } => {
            let zone = client
                .get_zone(&GetZoneOptions::new(&zone_id))
                .await
                .map_err(util::not_found("zone", &zone_id, "zones list"))?
                .into_result()?;
            let out = output::render_single(
                &global.format(),
                &zone,
                |z| zone_detail(z, color),
                |z| z.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZonesCommand::Create {
            name,
            description,
            ips,
            ip_ranges,
            subnets,
            vpcs,
            service_refs,
            from_file,
        } => {
            let account_id = require_account(global)?;
            let addresses = collect_addresses(
                &account_id,
                [ips, ip_ranges, subnets, vpcs, service_refs],
                from_file.as_deref(),
            )?;
            let opts = CreateZoneOptions {
                description,
                ..CreateZoneOptions::new(name, account_id, addresses)
            };
            let zone = client.create_zone(&opts).await?.into_result()?;
            util::done(&format!("Zone {} created", zone.id), global.quiet);
            let out = output::render_single(
                &global.format(),
                &zone,
                |z| zone_detail(z, color),
                |z| z.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZonesCommand::Delete { zone_id } => {
            if !util::confirm(&format!("Delete zone '{zone_id}'?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_zone(&DeleteZoneOptions::new(&zone_id))
                .await
                .map_err(util::not_found("zone", &zone_id, "zones list"))?;
            util::done("Zone deleted", global.quiet);
            Ok(())
        }
    }
}
