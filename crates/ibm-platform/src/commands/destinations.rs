//! Platform notification destination command handlers.

use tabled::Tabled;
use uuid::Uuid;

use ibm_platform_api::PlatformNotificationsClient;
use ibm_platform_api::platform_notifications::{
    AddDestination, AddDestinationPrototype, CreateDistributionListDestinationOptions,
    DistributionListDestinationOptions, ListDistributionListDestinationsOptions,
    NotificationType, TestDestinationRequestBodyPrototype, TestDistributionListDestinationOptions,
};

use crate::cli::{DestinationsArgs, DestinationsCommand, GlobalOpts, NotificationTypeArg};
use crate::config::require_account;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DestinationRow {
    #[tabled(rename = "Destination ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
}

impl From<&AddDestination> for DestinationRow {
    fn from(d: &AddDestination) -> Self {
        Self {
            id: d.destination_id().to_string(),
            kind: destination_kind(d).into(),
        }
    }
}

fn destination_kind(d: &AddDestination) -> &'static str {
    match d {
        AddDestination::EventNotifications(_) => "Event Notifications",
    }
}

fn destination_detail(d: &AddDestination, color: bool) -> String {
    output::detail(
        &[
            ("Destination ID", d.destination_id().to_string()),
            ("Type", destination_kind(d).into()),
        ],
        color,
    )
}

fn parse_destination_id(raw: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(raw).map_err(|e| CliError::Validation {
        field: "destination_id".into(),
        reason: format!("'{raw}' is not a UUID: {e}"),
    })
}

fn notification_type(arg: NotificationTypeArg) -> NotificationType {
    match arg {
        NotificationTypeArg::Announcements => NotificationType::Announcements,
        NotificationTypeArg::BillingAndUsage => NotificationType::BillingAndUsage,
        NotificationTypeArg::Incident => NotificationType::Incident,
        NotificationTypeArg::Maintenance => NotificationType::Maintenance,
        NotificationTypeArg::Resource => NotificationType::Resource,
        NotificationTypeArg::SecurityBulletins => NotificationType::SecurityBulletins,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &PlatformNotificationsClient,
    args: DestinationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let account_id = require_account(global)?;

    match args.command {
        DestinationsCommand::List => {
            let list = client
                .list_distribution_list_destinations(&ListDistributionListDestinationsOptions::new(
                    &account_id,
                ))
                .await?
                .into_result()?;
            let out = output::render_list(
                &global.format(),
                &list.destinations,
                |d| DestinationRow::from(d),
                |d| d.destination_id().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DestinationsCommand::Get { destination_id } => {
            let dest = client
                .get_distribution_list_destination(&DistributionListDestinationOptions::new(
                    &account_id,
                    &destination_id,
                ))
                .await
                .map_err(util::not_found("destination", &destination_id, "destinations list"))?
                .into_result()?;
            let out = output::render_single(
                &global.format(),
                &dest,
                |d| destination_detail(d, color),
                |d| d.destination_id().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DestinationsCommand::Add { destination_id } => {
            let id = parse_destination_id(&destination_id)?;
            let opts = CreateDistributionListDestinationOptions::new(
                &account_id,
                AddDestinationPrototype::event_notifications(id),
            );
            let dest = client
                .create_distribution_list_destination(&opts)
                .await?
                .into_result()?;
            util::done(&format!("Destination {} added", dest.destination_id()), global.quiet);
            let out = output::render_single(
                &global.format(),
                &dest,
                |d| destination_detail(d, color),
                |d| d.destination_id().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DestinationsCommand::Test {
            destination_id,
            notification_type: kind,
        } => {
            let opts = TestDistributionListDestinationOptions::new(
                &account_id,
                &destination_id,
                TestDestinationRequestBodyPrototype::event_notifications(notification_type(kind)),
            );
            let resp = client
                .test_distribution_list_destination(&opts)
                .await
                .map_err(util::not_found("destination", &destination_id, "destinations list"))?;
            let message = resp
                .result
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Test notification sent".into());
            util::done(&message, global.quiet);
            Ok(())
        }

        DestinationsCommand::Delete { destination_id } => {
            if !util::confirm(
                &format!("Remove destination '{destination_id}' from the distribution list?"),
                global.yes,
            )? {
                return Ok(());
            }
            client
                .delete_distribution_list_destination(&DistributionListDestinationOptions::new(
                    &account_id,
                    &destination_id,
                ))
                .await
                .map_err(util::not_found("destination", &destination_id, "destinations list"))?;
            util::done("Destination removed", global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn destination_id_must_be_a_uuid() {
        let err = parse_destination_id("not-a-uuid").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);

        let id = parse_destination_id("12345678-1234-1234-1234-123456789012").unwrap();
        assert_eq!(id.to_string(), "12345678-1234-1234-1234-123456789012");
    }

    #[test]
    fn notification_type_flag_maps_to_wire_value() {
        assert_eq!(
            notification_type(NotificationTypeArg::BillingAndUsage).to_string(),
            "billing_and_usage"
        );
    }
}
