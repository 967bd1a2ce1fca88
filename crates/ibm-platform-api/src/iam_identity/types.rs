// IAM identity wire types: API keys and service IDs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Diagnostic block echoed by the IAM identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
}

/// One entry of an entity's change history (`include_history=true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityHistoryRecord {
    pub timestamp: String,
    pub iam_id: String,
    pub iam_id_account: String,
    pub action: String,
    #[serde(default)]
    pub params: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_tag: Option<String>,
    pub crn: String,
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub iam_id: String,
    pub account_id: String,
    /// The key value. Only returned on creation, or when stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<EntityHistoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
    pub id: String,
    pub iam_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_tag: Option<String>,
    pub crn: String,
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    pub account_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_instance_crns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<EntityHistoryRecord>,
    /// Present when the service ID was created together with a key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<ApiKeyDetails>,
}

// ── Lists ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub apikeys: Vec<ApiKeyDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub serviceids: Vec<ServiceIdDetails>,
}

impl ApiKeyList {
    /// `pagetoken` of the next page, if there is one.
    pub fn next_pagetoken(&self) -> Option<String> {
        self.next.as_deref().and_then(pagetoken)
    }
}

impl ServiceIdList {
    /// `pagetoken` of the next page, if there is one.
    pub fn next_pagetoken(&self) -> Option<String> {
        self.next.as_deref().and_then(pagetoken)
    }
}

/// Extract `pagetoken` from an absolute or relative page link.
fn pagetoken(link: &str) -> Option<String> {
    let url = Url::parse(link)
        .or_else(|_| Url::parse("https://iam.cloud.ibm.com/").and_then(|base| base.join(link)))
        .ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "pagetoken")
        .map(|(_, v)| v.into_owned())
}

// ── Query enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ApiKeyScope {
    Entity,
    Account,
}

/// Owner kind of an API key (`type` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ApiKeyOwnerType {
    User,
    Serviceid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// ── API key options ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListApiKeysOptions {
    pub account_id: Option<String>,
    pub iam_id: Option<String>,
    pub pagesize: Option<i64>,
    pub pagetoken: Option<String>,
    pub scope: Option<ApiKeyScope>,
    pub owner_type: Option<ApiKeyOwnerType>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub include_history: Option<bool>,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateApiKeyOptions {
    pub name: String,
    pub iam_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Import an existing key value instead of generating one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_value: Option<bool>,
    /// Sent as the `Entity-Lock` header.
    #[serde(skip)]
    pub entity_lock: Option<bool>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl CreateApiKeyOptions {
    pub fn new(name: impl Into<String>, iam_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iam_id: iam_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetApiKeysDetailsOptions {
    /// Sent as the `IAM-ApiKey` header.
    pub iam_api_key: Option<String>,
    pub include_history: Option<bool>,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct GetApiKeyOptions {
    pub id: String,
    pub include_history: Option<bool>,
    pub headers: HashMap<String, String>,
}

impl GetApiKeyOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateApiKeyOptions {
    #[serde(skip)]
    pub id: String,
    #[serde(skip)]
    pub if_match: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl UpdateApiKeyOptions {
    pub fn new(id: impl Into<String>, if_match: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            if_match: if_match.into(),
            ..Self::default()
        }
    }
}

/// Options for the API key operations addressed by id alone
/// (delete, lock, unlock).
#[derive(Debug, Clone, Default)]
pub struct ApiKeyIdOptions {
    pub id: String,
    pub headers: HashMap<String, String>,
}

impl ApiKeyIdOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headers: HashMap::new(),
        }
    }
}

pub type DeleteApiKeyOptions = ApiKeyIdOptions;
pub type LockApiKeyOptions = ApiKeyIdOptions;
pub type UnlockApiKeyOptions = ApiKeyIdOptions;

// ── Service ID options ───────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListServiceIdsOptions {
    pub account_id: Option<String>,
    pub name: Option<String>,
    pub pagesize: Option<i64>,
    pub pagetoken: Option<String>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub include_history: Option<bool>,
    pub headers: HashMap<String, String>,
}

/// The API key created together with a service ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyInsideCreateServiceIdRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_value: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateServiceIdOptions {
    pub account_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_instance_crns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<ApiKeyInsideCreateServiceIdRequest>,
    /// Sent as the `Entity-Lock` header.
    #[serde(skip)]
    pub entity_lock: Option<bool>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl CreateServiceIdOptions {
    pub fn new(account_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetServiceIdOptions {
    pub id: String,
    pub include_history: Option<bool>,
    pub headers: HashMap<String, String>,
}

impl GetServiceIdOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateServiceIdOptions {
    #[serde(skip)]
    pub id: String,
    #[serde(skip)]
    pub if_match: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_instance_crns: Option<Vec<String>>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl UpdateServiceIdOptions {
    pub fn new(id: impl Into<String>, if_match: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            if_match: if_match.into(),
            ..Self::default()
        }
    }
}

/// Options for the service ID operations addressed by id alone
/// (delete, lock, unlock).
#[derive(Debug, Clone, Default)]
pub struct ServiceIdIdOptions {
    pub id: String,
    pub headers: HashMap<String, String>,
}

impl ServiceIdIdOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headers: HashMap::new(),
        }
    }
}

pub type DeleteServiceIdOptions = ServiceIdIdOptions;
pub type LockServiceIdOptions = ServiceIdIdOptions;
pub type UnlockServiceIdOptions = ServiceIdIdOptions;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn list_with_next(next: Option<&str>) -> ApiKeyList {
        ApiKeyList {
            context: None,
            offset: None,
            limit: Some(1),
            first: None,
            previous: None,
            next: next.map(str::to_owned),
            apikeys: Vec::new(),
        }
    }

    #[test]
    fn next_pagetoken_reads_absolute_and_relative_links() {
        let list = list_with_next(Some(
            "https://iam.cloud.ibm.com/v1/apikeys?pagesize=1&pagetoken=abc%3D",
        ));
        assert_eq!(list.next_pagetoken().as_deref(), Some("abc="));

        let list = list_with_next(Some("/v1/apikeys?pagetoken=xyz"));
        assert_eq!(list.next_pagetoken().as_deref(), Some("xyz"));

        assert_eq!(list_with_next(None).next_pagetoken(), None);
        assert_eq!(list_with_next(Some("/v1/apikeys")).next_pagetoken(), None);
    }

    #[test]
    fn update_body_distinguishes_unset_from_empty() {
        let opts = UpdateApiKeyOptions {
            name: Some("renamed".into()),
            description: Some(String::new()),
            ..UpdateApiKeyOptions::new("id", "*")
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"name": "renamed", "description": ""})
        );

        let opts = UpdateApiKeyOptions {
            name: Some("renamed".into()),
            ..UpdateApiKeyOptions::new("id", "*")
        };
        assert_eq!(serde_json::to_value(&opts).unwrap(), json!({"name": "renamed"}));
    }
}
