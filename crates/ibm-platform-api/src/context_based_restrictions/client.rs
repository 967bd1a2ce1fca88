// Async client for the Context Based Restrictions API (v1).
//
// Base URL: https://cbr.cloud.ibm.com
// Zones:    /v1/zones[/{zone_id}]
// Rules:    /v1/rules[/{rule_id}]

use std::time::Duration;

use reqwest::Method;

use super::types::{
    CreateRuleOptions, CreateZoneOptions, DeleteRuleOptions, DeleteZoneOptions,
    GetAccountSettingsOptions, GetRuleOptions, GetZoneOptions,
    ListAvailableServiceRefTargetsOptions, ListRulesOptions, ListZonesOptions,
    OutAccountSettings, OutRule, OutRulePage, OutZone, OutZonePage, ReplaceRuleOptions,
    ReplaceZoneOptions, ServiceRefTargetPage,
};
use crate::error::Error;
use crate::request::RequestBuilder;
use crate::service::{BaseService, DetailedResponse, ServiceOptions};

pub const DEFAULT_SERVICE_URL: &str = "https://cbr.cloud.ibm.com";
pub const DEFAULT_SERVICE_NAME: &str = "context_based_restrictions";
const SERVICE_VERSION: &str = "V1";

/// Client for network zones, rules, and account settings.
#[derive(Debug, Clone)]
pub struct ContextBasedRestrictionsClient {
    service: BaseService,
}

impl ContextBasedRestrictionsClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(options: ServiceOptions) -> Result<Self, Error> {
        let service = BaseService::new(
            DEFAULT_SERVICE_NAME,
            SERVICE_VERSION,
            DEFAULT_SERVICE_URL,
            options,
        )?;
        Ok(Self { service })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(service_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let service =
            BaseService::from_reqwest(DEFAULT_SERVICE_NAME, SERVICE_VERSION, service_url, http)?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &BaseService {
        &self.service
    }

    pub fn set_service_url(&mut self, url: &str) -> Result<(), Error> {
        self.service.set_service_url(url)
    }

    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.service.enable_retries(max_retries, max_interval);
    }

    pub fn disable_retries(&mut self) {
        self.service.disable_retries();
    }

    // ── Zones ────────────────────────────────────────────────────────

    pub async fn create_zone(
        &self,
        opts: &CreateZoneOptions,
    ) -> Result<DetailedResponse<OutZone>, Error> {
        let request = RequestBuilder::new(Method::POST, "/v1/zones", "create_zone")
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers)
            .json(opts)?;
        self.service.send(request).await
    }

    pub async fn list_zones(
        &self,
        opts: &ListZonesOptions,
    ) -> Result<DetailedResponse<OutZonePage>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        let request = RequestBuilder::new(Method::GET, "/v1/zones", "list_zones")
            .query("account_id", &opts.account_id)
            .query_opt("name", opts.name.as_deref())
            .query_opt("sort", opts.sort.as_deref())
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn get_zone(&self, opts: &GetZoneOptions) -> Result<DetailedResponse<OutZone>, Error> {
        if opts.zone_id.is_empty() {
            return Err(Error::required("zone_id"));
        }
        let request = RequestBuilder::new(Method::GET, "/v1/zones/{zone_id}", "get_zone")
            .path_param("zone_id", &opts.zone_id)
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    /// Replace a zone. `if_match` must carry the `ETag` of the current
    /// revision; a stale token is rejected by the server with 412.
    pub async fn replace_zone(
        &self,
        opts: &ReplaceZoneOptions,
    ) -> Result<DetailedResponse<OutZone>, Error> {
        if opts.zone_id.is_empty() {
            return Err(Error::required("zone_id"));
        }
        if opts.if_match.is_empty() {
            return Err(Error::required("if_match"));
        }
        let request = RequestBuilder::new(Method::PUT, "/v1/zones/{zone_id}", "replace_zone")
            .path_param("zone_id", &opts.zone_id)
            .header("If-Match", &opts.if_match)
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers)
            .json(opts)?;
        self.service.send(request).await
    }

    pub async fn delete_zone(
        &self,
        opts: &DeleteZoneOptions,
    ) -> Result<DetailedResponse<()>, Error> {
        if opts.zone_id.is_empty() {
            return Err(Error::required("zone_id"));
        }
        let request = RequestBuilder::new(Method::DELETE, "/v1/zones/{zone_id}", "delete_zone")
            .path_param("zone_id", &opts.zone_id)
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers);
        self.service.send_empty(request).await
    }

    pub async fn list_available_serviceref_targets(
        &self,
        opts: &ListAvailableServiceRefTargetsOptions,
    ) -> Result<DetailedResponse<ServiceRefTargetPage>, Error> {
        let request = RequestBuilder::new(
            Method::GET,
            "/v1/zones/serviceref_targets",
            "list_available_serviceref_targets",
        )
        .query_opt("type", opts.target_type)
        .header_opt("Transaction-Id", opts.transaction_id.as_deref())
        .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    // ── Rules ────────────────────────────────────────────────────────

    pub async fn create_rule(
        &self,
        opts: &CreateRuleOptions,
    ) -> Result<DetailedResponse<OutRule>, Error> {
        let request = RequestBuilder::new(Method::POST, "/v1/rules", "create_rule")
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers)
            .json(opts)?;
        self.service.send(request).await
    }

    pub async fn list_rules(
        &self,
        opts: &ListRulesOptions,
    ) -> Result<DetailedResponse<OutRulePage>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        let request = RequestBuilder::new(Method::GET, "/v1/rules", "list_rules")
            .query("account_id", &opts.account_id)
            .query_opt("region", opts.region.as_deref())
            .query_opt("resource", opts.resource.as_deref())
            .query_opt("resource_type", opts.resource_type.as_deref())
            .query_opt("service_instance", opts.service_instance.as_deref())
            .query_opt("service_name", opts.service_name.as_deref())
            .query_opt("service_type", opts.service_type.as_deref())
            .query_opt("zone_id", opts.zone_id.as_deref())
            .query_opt("sort", opts.sort.as_deref())
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn get_rule(&self, opts: &GetRuleOptions) -> Result<DetailedResponse<OutRule>, Error> {
        if opts.rule_id.is_empty() {
            return Err(Error::required("rule_id"));
        }
        let request = RequestBuilder::new(Method::GET, "/v1/rules/{rule_id}", "get_rule")
            .path_param("rule_id", &opts.rule_id)
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn replace_rule(
        &self,
        opts: &ReplaceRuleOptions,
    ) -> Result<DetailedResponse<OutRule>, Error> {
        if opts.rule_id.is_empty() {
            return Err(Error::required("rule_id"));
        }
        if opts.if_match.is_empty() {
            return Err(Error::required("if_match"));
        }
        let request = RequestBuilder::new(Method::PUT, "/v1/rules/{rule_id}", "replace_rule")
            .path_param("rule_id", &opts.rule_id)
            .header("If-Match", &opts.if_match)
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers)
            .json(opts)?;
        self.service.send(request).await
    }

    pub async fn delete_rule(
        &self,
        opts: &DeleteRuleOptions,
    ) -> Result<DetailedResponse<()>, Error> {
        if opts.rule_id.is_empty() {
            return Err(Error::required("rule_id"));
        }
        let request = RequestBuilder::new(Method::DELETE, "/v1/rules/{rule_id}", "delete_rule")
            .path_param("rule_id", &opts.rule_id)
            .header_opt("Transaction-Id", opts.transaction_id.as_deref())
            .custom_headers(&opts.headers);
        self.service.send_empty(request).await
    }

    // ── Account settings ─────────────────────────────────────────────

    pub async fn get_account_settings(
        &self,
        opts: &GetAccountSettingsOptions,
    ) -> Result<DetailedResponse<OutAccountSettings>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        let request = RequestBuilder::new(
            Method::GET,
            "/v1/account_settings/{account_id}",
            "get_account_settings",
        )
        .path_param("account_id", &opts.account_id)
        .header_opt("Transaction-Id", opts.transaction_id.as_deref())
        .custom_headers(&opts.headers);
        self.service.send(request).await
    }
}
