// Context-based restrictions wire types.
//
// Zones group network locations (`Address`); rules bind zones (contexts)
// to resources. Output types carry audit fields; the zone/rule `ETag`
// response header is the revision token for replace operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::union::{self, DecodeError, TaggedUnion};

// ── Addresses ────────────────────────────────────────────────────────

/// A network location in a zone, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Address {
    #[serde(rename = "ipAddress")]
    IpAddress(AddressValue),
    #[serde(rename = "ipRange")]
    IpRange(AddressValue),
    #[serde(rename = "subnet")]
    Subnet(AddressValue),
    #[serde(rename = "vpc")]
    Vpc(AddressValue),
    #[serde(rename = "serviceRef")]
    ServiceRef(AddressServiceRef),
}

/// Payload of the single-value address variants (IP, range, CIDR, VPC CRN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValue {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressServiceRef {
    #[serde(rename = "ref")]
    pub reference: ServiceRefValue,
}

/// Reference to a service (or one instance of it) in an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRefValue {
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_instance: Option<String>,
}

impl ServiceRefValue {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }
}

impl Address {
    pub fn ip_address(value: impl Into<String>) -> Self {
        Self::IpAddress(AddressValue {
            value: value.into(),
        })
    }

    pub fn ip_range(value: impl Into<String>) -> Self {
        Self::IpRange(AddressValue {
            value: value.into(),
        })
    }

    pub fn subnet(value: impl Into<String>) -> Self {
        Self::Subnet(AddressValue {
            value: value.into(),
        })
    }

    pub fn vpc(crn: impl Into<String>) -> Self {
        Self::Vpc(AddressValue { value: crn.into() })
    }

    pub fn service_ref(reference: ServiceRefValue) -> Self {
        Self::ServiceRef(AddressServiceRef { reference })
    }

    /// Human-readable value: the literal for value variants, the service
    /// name (or account) for service references.
    pub fn display_value(&self) -> String {
        match self {
            Self::IpAddress(a) | Self::IpRange(a) | Self::Subnet(a) | Self::Vpc(a) => {
                a.value.clone()
            }
            Self::ServiceRef(r) => r
                .reference
                .service_name
                .clone()
                .unwrap_or_else(|| r.reference.account_id.clone()),
        }
    }
}

impl TaggedUnion for Address {
    const DISCRIMINATOR: &'static str = "type";
    const VARIANTS: &'static [&'static str] = &["ipAddress", "ipRange", "subnet", "vpc", "serviceRef"];

    fn from_variant(tag: &str, object: Value) -> Result<Self, DecodeError> {
        match tag {
            "ipAddress" => union::payload(object).map(Self::IpAddress),
            "ipRange" => union::payload(object).map(Self::IpRange),
            "subnet" => union::payload(object).map(Self::Subnet),
            "vpc" => union::payload(object).map(Self::Vpc),
            "serviceRef" => union::payload(object).map(Self::ServiceRef),
            other => Err(DecodeError::UnknownVariant {
                field: Self::DISCRIMINATOR.into(),
                value: other.into(),
            }),
        }
    }

    fn variant(&self) -> &'static str {
        match self {
            Self::IpAddress(_) => "ipAddress",
            Self::IpRange(_) => "ipRange",
            Self::Subnet(_) => "subnet",
            Self::Vpc(_) => "vpc",
            Self::ServiceRef(_) => "serviceRef",
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize(deserializer)
    }
}

// ── Zones ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutZone {
    pub id: String,
    pub crn: String,
    pub name: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<Address>,
    pub href: String,
    pub created_at: DateTime<Utc>,
    pub created_by_id: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutZoneSummary {
    pub id: String,
    pub crn: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub addresses_preview: Vec<Address>,
    pub address_count: i64,
    pub excluded_count: i64,
    pub href: String,
    pub created_at: DateTime<Utc>,
    pub created_by_id: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutZonePage {
    pub count: i64,
    pub zones: Vec<OutZoneSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRefTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRefTargetPage {
    #[serde(default)]
    pub targets: Vec<ServiceRefTarget>,
}

/// Filter for `list_available_serviceref_targets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ServiceRefTargetType {
    All,
    PlatformService,
}

// ── Rules ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContextAttribute {
    pub name: String,
    pub value: String,
}

/// The network context a rule allows; usually `networkZoneId` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContext {
    pub attributes: Vec<RuleContextAttribute>,
}

impl RuleContext {
    pub fn zone(zone_id: impl Into<String>) -> Self {
        Self {
            attributes: vec![RuleContextAttribute {
                name: "networkZoneId".into(),
                value: zone_id.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttribute {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTagAttribute {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub attributes: Vec<ResourceAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ResourceTagAttribute>,
}

impl Resource {
    /// Resource selected by plain `name=value` attributes.
    pub fn with_attributes<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            attributes: pairs
                .into_iter()
                .map(|(name, value)| ResourceAttribute {
                    name: name.into(),
                    value: value.into(),
                    operator: None,
                })
                .collect(),
            tags: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutRule {
    pub id: String,
    pub crn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contexts: Vec<RuleContext>,
    pub resources: Vec<Resource>,
    pub href: String,
    pub created_at: DateTime<Utc>,
    pub created_by_id: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutRulePage {
    pub count: i64,
    pub rules: Vec<OutRule>,
}

// ── Account settings ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutAccountSettings {
    pub id: String,
    pub crn: String,
    pub rule_count_limit: i64,
    pub zone_count_limit: i64,
    pub current_rule_count: i64,
    pub current_zone_count: i64,
    pub href: String,
    pub created_at: DateTime<Utc>,
    pub created_by_id: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by_id: String,
}

// ── Options ──────────────────────────────────────────────────────────
//
// Path, header, and query fields are `#[serde(skip)]`; serializing an
// options value yields exactly the JSON body of its operation.

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateZoneOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded: Option<Vec<Address>>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl CreateZoneOptions {
    pub fn new(
        name: impl Into<String>,
        account_id: impl Into<String>,
        addresses: Vec<Address>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            account_id: Some(account_id.into()),
            addresses: Some(addresses),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListZonesOptions {
    pub account_id: String,
    pub name: Option<String>,
    pub sort: Option<String>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ListZonesOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetZoneOptions {
    pub zone_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetZoneOptions {
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaceZoneOptions {
    #[serde(skip)]
    pub zone_id: String,
    #[serde(skip)]
    pub if_match: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded: Option<Vec<Address>>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl ReplaceZoneOptions {
    pub fn new(zone_id: impl Into<String>, if_match: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            if_match: if_match.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteZoneOptions {
    pub zone_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl DeleteZoneOptions {
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAvailableServiceRefTargetsOptions {
    pub target_type: Option<ServiceRefTargetType>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateRuleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<RuleContext>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListRulesOptions {
    pub account_id: String,
    pub region: Option<String>,
    pub resource: Option<String>,
    pub resource_type: Option<String>,
    pub service_instance: Option<String>,
    pub service_name: Option<String>,
    pub service_type: Option<String>,
    pub zone_id: Option<String>,
    pub sort: Option<String>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ListRulesOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetRuleOptions {
    pub rule_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetRuleOptions {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaceRuleOptions {
    #[serde(skip)]
    pub rule_id: String,
    #[serde(skip)]
    pub if_match: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<RuleContext>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl ReplaceRuleOptions {
    pub fn new(rule_id: impl Into<String>, if_match: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            if_match: if_match.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteRuleOptions {
    pub rule_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl DeleteRuleOptions {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAccountSettingsOptions {
    pub account_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetAccountSettingsOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn every_address_variant_keeps_its_discriminator() {
        let addresses = vec![
            Address::ip_address("169.23.56.234"),
            Address::ip_range("169.23.22.0-169.23.22.255"),
            Address::subnet("192.0.2.0/24"),
            Address::vpc("crn:v1:bluemix:public:is:us-south:a/abc::vpc:r006"),
            Address::service_ref(ServiceRefValue {
                service_name: Some("cloud-object-storage".into()),
                ..ServiceRefValue::new("12ab34cd")
            }),
        ];
        for address in addresses {
            let value = serde_json::to_value(&address).unwrap();
            assert_eq!(value["type"], address.variant());
            let back: Address = serde_json::from_value(value).unwrap();
            assert_eq!(back, address);
        }
    }

    #[test]
    fn service_ref_uses_ref_key() {
        let value = serde_json::to_value(Address::service_ref(ServiceRefValue::new("A"))).unwrap();
        assert_eq!(value, json!({"type": "serviceRef", "ref": {"account_id": "A"}}));
    }

    #[test]
    fn replace_zone_body_omits_unset_fields_and_keeps_empty_strings() {
        let opts = ReplaceZoneOptions {
            description: Some(String::new()),
            ..ReplaceZoneOptions::new("z1", "etag")
        };
        assert_eq!(serde_json::to_value(&opts).unwrap(), json!({"description": ""}));
    }

    #[test]
    fn serviceref_target_type_query_values() {
        assert_eq!(ServiceRefTargetType::PlatformService.to_string(), "platform_service");
        assert_eq!(ServiceRefTargetType::All.to_string(), "all");
    }
}
