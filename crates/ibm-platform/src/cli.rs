//! Clap derive structures for the `ibm-platform` CLI.
//!
//! Defines the command tree and global flags. Kept free of crate-internal
//! types so the build script can compile it for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ibm-platform -- manage IBM Cloud platform services from the command line
#[derive(Debug, Parser)]
#[command(
    name = "ibm-platform",
    version,
    about = "Manage IBM Cloud platform services from the command line",
    long_about = "Administer IBM Cloud context-based restrictions, IAM identity,\n\
        platform notification destinations and resource groups.\n\n\
        Service credentials are read from ibm-credentials.env and\n\
        <SERVICE_NAME>_* environment variables.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account ID for account-scoped commands
    #[arg(long, env = "IBM_PLATFORM_ACCOUNT_ID", global = true)]
    pub account_id: Option<String>,

    /// Service endpoint (overrides the configured URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// IAM API key (overrides configured credentials)
    #[arg(long, env = "IBMCLOUD_API_KEY", global = true, hide_env = true)]
    pub apikey: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "IBM_PLATFORM_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "IBM_PLATFORM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage network zones (context-based restrictions)
    #[command(alias = "z")]
    Zones(ZonesArgs),

    /// Manage context-based restriction rules
    Rules(RulesArgs),

    /// Show context-based restriction limits for the account
    AccountSettings(AccountSettingsArgs),

    /// List services that zones can reference
    ServicerefTargets(ServicerefTargetsArgs),

    /// Manage IAM API keys
    #[command(alias = "keys")]
    ApiKeys(ApiKeysArgs),

    /// Manage IAM service IDs
    ServiceIds(ServiceIdsArgs),

    /// Manage the account's notification distribution list
    #[command(alias = "dest")]
    Destinations(DestinationsArgs),

    /// Manage resource groups
    #[command(alias = "rg")]
    ResourceGroups(ResourceGroupsArgs),

    /// View quota definitions
    Quotas(QuotasArgs),

    /// Manage CLI settings
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Page Arguments ────────────────────────────────────────────

/// Token-based paging for IAM identity list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Results per page (1-100)
    #[arg(long, short = 'l')]
    pub page_size: Option<i64>,

    /// Continue from the page token of a previous listing
    #[arg(long)]
    pub page_token: Option<String>,

    /// Fetch all pages automatically
    #[arg(long, short = 'a', conflicts_with = "page_token")]
    pub all: bool,

    /// Sort field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort order
    #[arg(long)]
    pub order: Option<SortOrderArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTEXT-BASED RESTRICTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ZonesArgs {
    #[command(subcommand)]
    pub command: ZonesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ZonesCommand {
    /// List zones in the account
    #[command(alias = "ls")]
    List {
        /// Only zones with this exact name
        #[arg(long)]
        name: Option<String>,

        /// Sort field
        #[arg(long)]
        sort: Option<String>,
    },

    /// Get zone details
    Get {
        /// Zone ID
        zone_id: String,
    },

    /// Create a zone
    Create {
        /// Zone name
        #[arg(long, required = true)]
        name: String,

        /// Zone description
        #[arg(long)]
        description: Option<String>,

        /// Single IP address (repeatable)
        #[arg(long = "ip", value_name = "IP")]
        ips: Vec<String>,

        /// IP range such as 10.0.0.1-10.0.0.9 (repeatable)
        #[arg(long = "ip-range", value_name = "RANGE")]
        ip_ranges: Vec<String>,

        /// CIDR subnet (repeatable)
        #[arg(long = "subnet", value_name = "CIDR")]
        subnets: Vec<String>,

        /// VPC CRN (repeatable)
        #[arg(long = "vpc", value_name = "CRN")]
        vpcs: Vec<String>,

        /// Service name of a service reference in this account (repeatable)
        #[arg(long = "service-ref", value_name = "SERVICE")]
        service_refs: Vec<String>,

        /// JSON file holding an array of addresses
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Delete a zone
    #[command(alias = "rm")]
    Delete {
        /// Zone ID
        zone_id: String,
    },
}

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List rules in the account
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        resource: Option<String>,
        #[arg(long)]
        resource_type: Option<String>,
        #[arg(long)]
        service_instance: Option<String>,
        #[arg(long)]
        service_name: Option<String>,
        #[arg(long)]
        service_type: Option<String>,
        /// Only rules that reference this zone
        #[arg(long)]
        zone_id: Option<String>,
        #[arg(long)]
        sort: Option<String>,
    },

    /// Get rule details
    Get {
        /// Rule ID
        rule_id: String,
    },

    /// Delete a rule
    #[command(alias = "rm")]
    Delete {
        /// Rule ID
        rule_id: String,
    },
}

#[derive(Debug, Args)]
pub struct AccountSettingsArgs {
    #[command(subcommand)]
    pub command: AccountSettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountSettingsCommand {
    /// Show zone and rule limits and usage
    Get,
}

#[derive(Debug, Args)]
pub struct ServicerefTargetsArgs {
    #[command(subcommand)]
    pub command: ServicerefTargetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicerefTargetsCommand {
    /// List available service reference targets
    #[command(alias = "ls")]
    List {
        /// Restrict to a target type
        #[arg(long = "type", value_name = "TYPE")]
        target_type: Option<TargetTypeArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TargetTypeArg {
    All,
    PlatformService,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IAM IDENTITY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApiKeysArgs {
    #[command(subcommand)]
    pub command: ApiKeysCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApiKeysCommand {
    /// List API keys
    #[command(alias = "ls")]
    List {
        /// Only keys owned by this IAM ID
        #[arg(long)]
        iam_id: Option<String>,

        /// Entity keys or all keys in the account
        #[arg(long)]
        scope: Option<ScopeArg>,

        /// Owner type filter
        #[arg(long = "type", value_name = "TYPE")]
        owner_type: Option<OwnerTypeArg>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Get API key details
    Get {
        /// API key ID
        id: String,

        /// Include the change history
        #[arg(long)]
        history: bool,
    },

    /// Lock an API key against changes
    Lock {
        /// API key ID
        id: String,
    },

    /// Unlock an API key
    Unlock {
        /// API key ID
        id: String,
    },

    /// Delete an API key
    #[command(alias = "rm")]
    Delete {
        /// API key ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    Entity,
    Account,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OwnerTypeArg {
    User,
    Serviceid,
}

#[derive(Debug, Args)]
pub struct ServiceIdsArgs {
    #[command(subcommand)]
    pub command: ServiceIdsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServiceIdsCommand {
    /// List service IDs in the account
    #[command(alias = "ls")]
    List {
        /// Only service IDs with this name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Get service ID details
    Get {
        /// Service ID
        id: String,

        /// Include the change history
        #[arg(long)]
        history: bool,
    },

    /// Lock a service ID against changes
    Lock {
        /// Service ID
        id: String,
    },

    /// Unlock a service ID
    Unlock {
        /// Service ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PLATFORM NOTIFICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DestinationsArgs {
    #[command(subcommand)]
    pub command: DestinationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DestinationsCommand {
    /// List destinations in the distribution list
    #[command(alias = "ls")]
    List,

    /// Get a destination
    Get {
        /// Destination ID
        destination_id: String,
    },

    /// Add an Event Notifications instance as a destination
    Add {
        /// Event Notifications instance ID (UUID)
        destination_id: String,
    },

    /// Send a test notification to a destination
    Test {
        /// Destination ID
        destination_id: String,

        /// Kind of notification to simulate
        #[arg(long, short = 't', default_value = "incident")]
        notification_type: NotificationTypeArg,
    },

    /// Remove a destination
    #[command(alias = "rm")]
    Delete {
        /// Destination ID
        destination_id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NotificationTypeArg {
    Announcements,
    BillingAndUsage,
    Incident,
    Maintenance,
    Resource,
    SecurityBulletins,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCE MANAGER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourceGroupsArgs {
    #[command(subcommand)]
    pub command: ResourceGroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceGroupsCommand {
    /// List resource groups
    #[command(alias = "ls")]
    List {
        /// Billing month (YYYY-MM) to list groups for
        #[arg(long)]
        date: Option<String>,
    },

    /// Get resource group details
    Get {
        /// Resource group ID
        id: String,
    },

    /// Create a resource group
    Create {
        /// Resource group name
        name: String,
    },

    /// Rename a resource group
    Rename {
        /// Resource group ID
        id: String,

        /// New name
        name: String,
    },

    /// Delete a resource group
    #[command(alias = "rm")]
    Delete {
        /// Resource group ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct QuotasArgs {
    #[command(subcommand)]
    pub command: QuotasCommand,
}

#[derive(Debug, Subcommand)]
pub enum QuotasCommand {
    /// List quota definitions
    #[command(alias = "ls")]
    List,

    /// Get a quota definition
    Get {
        /// Quota definition ID
        id: String,
    },

    /// Show the quota definition applied to the account
    Account,

    /// Show the effective quota of a resource type in the account
    Resource {
        /// Resource type, e.g. `cloudantnosqldb`
        resource_type: String,
    },

    /// Update the account's quota for a resource type
    SetResource {
        /// Resource type
        resource_type: String,
    },

    /// Remove the account's quota override for a resource type
    DeleteResource {
        /// Resource type
        resource_type: String,
    },

    /// Create the default quota of a resource type
    CreateDefault {
        /// Resource type
        resource_type: String,
    },

    /// Register the quota schema of a resource type
    CreateSchema {
        /// Resource type
        resource_type: String,
    },

    /// Show the quota schema of a resource type
    Schema {
        /// Resource type
        resource_type: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the settings file with guided setup
    Init,

    /// Display resolved settings and service credentials (secrets masked)
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
