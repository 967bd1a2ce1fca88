// Resource manager wire types: resource groups and quota definitions.
//
// Every field is optional on the wire; the service omits what does not
// apply (e.g. `quota_id` on a pending group).

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `ACTIVE`, `SUSPENDED`, `PENDING_REMOVAL`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_methods_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_linkages: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroupsList {
    pub resources: Vec<ResourceGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResCreateResourceGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuota {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
}

/// Status body returned by quota writes and schema registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub quota_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_apps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_service_instances: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_number_of_instances_per_lite_plan: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances_per_app: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_app_memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vsi_limit: Option<f64>,
    /// Older deployments return a single object here rather than a list.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub resource_quotas: Vec<ResourceQuota>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaDefinitionList {
    pub resources: Vec<QuotaDefinition>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<ResourceQuota>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<ResourceQuota>),
        One(ResourceQuota),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(quotas)) => quotas,
        Some(OneOrMany::One(quota)) => vec![quota],
        None => Vec::new(),
    })
}

// ── Options ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListResourceGroupsOptions {
    pub account_id: Option<String>,
    /// Billing month, `YYYY-MM`.
    pub date: Option<String>,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateResourceGroupOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl CreateResourceGroupOptions {
    pub fn new(name: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            account_id: Some(account_id.into()),
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateResourceGroupOptions {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl UpdateResourceGroupOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Options for the operations addressed by id alone (get, delete).
#[derive(Debug, Clone, Default)]
pub struct ResourceIdOptions {
    pub id: String,
    pub headers: HashMap<String, String>,
}

impl ResourceIdOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headers: HashMap::new(),
        }
    }
}

pub type GetResourceGroupOptions = ResourceIdOptions;
pub type DeleteResourceGroupOptions = ResourceIdOptions;
pub type GetQuotaDefinitionOptions = ResourceIdOptions;

#[derive(Debug, Clone, Default)]
pub struct ListQuotaDefinitionsOptions {
    pub headers: HashMap<String, String>,
}

/// The quota definition in effect for one account.
#[derive(Debug, Clone, Default)]
pub struct AccountQuotaOptions {
    pub account_id: String,
    pub headers: HashMap<String, String>,
}

impl AccountQuotaOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            headers: HashMap::new(),
        }
    }
}

pub type GetAccountQuotaListOptions = AccountQuotaOptions;

/// One resource type's quota within an account.
#[derive(Debug, Clone, Default)]
pub struct ResourceQuotaOptions {
    pub account_id: String,
    pub resource_type: String,
    pub headers: HashMap<String, String>,
}

impl ResourceQuotaOptions {
    pub fn new(account_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            resource_type: resource_type.into(),
            headers: HashMap::new(),
        }
    }
}

pub type GetResourceQuotaOptions = ResourceQuotaOptions;
pub type UpdateResourceQuotaOptions = ResourceQuotaOptions;
pub type DeleteResourceQuotaOptions = ResourceQuotaOptions;

/// Operations addressed by resource type alone.
#[derive(Debug, Clone, Default)]
pub struct ResourceTypeOptions {
    pub resource_type: String,
    pub headers: HashMap<String, String>,
}

impl ResourceTypeOptions {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            headers: HashMap::new(),
        }
    }
}

pub type CreateDefaultResourceQuotaOptions = ResourceTypeOptions;
pub type CreateSchemaOptions = ResourceTypeOptions;
pub type GetSchemaOptions = ResourceTypeOptions;
