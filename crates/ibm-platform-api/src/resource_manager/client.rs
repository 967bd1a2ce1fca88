// Async client for the Resource Manager API (v2).
//
// Base URL: https://resource-controller.cloud.ibm.com/v2
// Groups: /resource_groups[/{id}]
// Quotas: /quota_definitions[/{id}]
//         /quota_definitions/accounts/{account_id}[/resource_types/{resource_type}]
//         /quota_definitions/resource_types/{resource_type}[/schemas]

use std::time::Duration;

use reqwest::Method;

use super::types::{
    AccountQuotaOptions, CreateResourceGroupOptions, ErrorCollection,
    ListQuotaDefinitionsOptions, ListResourceGroupsOptions, QuotaDefinition,
    QuotaDefinitionList, ResCreateResourceGroup, ResourceGroup, ResourceGroupsList,
    ResourceIdOptions, ResourceQuota, ResourceQuotaOptions, ResourceTypeOptions,
    UpdateResourceGroupOptions,
};
use crate::error::Error;
use crate::request::RequestBuilder;
use crate::service::{BaseService, DetailedResponse, ServiceOptions};

pub const DEFAULT_SERVICE_URL: &str = "https://resource-controller.cloud.ibm.com/v2";
pub const DEFAULT_SERVICE_NAME: &str = "resource_manager";
const SERVICE_VERSION: &str = "V2";

/// Client for resource groups and quota definitions.
#[derive(Debug, Clone)]
pub struct ResourceManagerClient {
    service: BaseService,
}

impl ResourceManagerClient {
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

    // ── Resource groups ──────────────────────────────────────────────

    pub async fn list_resource_groups(
        &self,
        opts: &ListResourceGroupsOptions,
    ) -> Result<DetailedResponse<ResourceGroupsList>, Error> {
        let request = RequestBuilder::new(Method::GET, "/resource_groups", "list_resource_groups")
            .query_opt("account_id", opts.account_id.as_deref())
            .query_opt("date", opts.date.as_deref())
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn create_resource_group(
        &self,
        opts: &CreateResourceGroupOptions,
    ) -> Result<DetailedResponse<ResCreateResourceGroup>, Error> {
        let request =
            RequestBuilder::new(Method::POST, "/resource_groups", "create_resource_group")
                .custom_headers(&opts.headers)
                .json(opts)?;
        self.service.send(request).await
    }

    pub async fn get_resource_group(
        &self,
        opts: &ResourceIdOptions,
    ) -> Result<DetailedResponse<ResourceGroup>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request =
            RequestBuilder::new(Method::GET, "/resource_groups/{id}", "get_resource_group")
                .path_param("id", &opts.id)
                .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    /// Rename a group or change its state. Unset fields are left alone.
    pub async fn update_resource_group(
        &self,
        opts: &UpdateResourceGroupOptions,
    ) -> Result<DetailedResponse<ResourceGroup>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request =
            RequestBuilder::new(Method::PATCH, "/resource_groups/{id}", "update_resource_group")
                .path_param("id", &opts.id)
                .custom_headers(&opts.headers)
                .json(opts)?;
        self.service.send(request).await
    }

    pub async fn delete_resource_group(
        &self,
        opts: &ResourceIdOptions,
    ) -> Result<DetailedResponse<()>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request =
            RequestBuilder::new(Method::DELETE, "/resource_groups/{id}", "delete_resource_group")
                .path_param("id", &opts.id)
                .custom_headers(&opts.headers);
        self.service.send_empty(request).await
    }

    // ── Quota definitions ────────────────────────────────────────────

    pub async fn list_quota_definitions(
        &self,
        opts: &ListQuotaDefinitionsOptions,
    ) -> Result<DetailedResponse<QuotaDefinitionList>, Error> {
        let request =
            RequestBuilder::new(Method::GET, "/quota_definitions", "list_quota_definitions")
                .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn get_quota_definition(
        &self,
        opts: &ResourceIdOptions,
    ) -> Result<DetailedResponse<QuotaDefinition>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request =
            RequestBuilder::new(Method::GET, "/quota_definitions/{id}", "get_quota_definition")
                .path_param("id", &opts.id)
                .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    // ── Account quotas ───────────────────────────────────────────────

    /// The quota definition applied to an account.
    pub async fn get_account_quota_list(
        &self,
        opts: &AccountQuotaOptions,
    ) -> Result<DetailedResponse<QuotaDefinition>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        let request = RequestBuilder::new(
            Method::GET,
            "/quota_definitions/accounts/{account_id}",
            "get_account_quota_list",
        )
        .path_param("account_id", &opts.account_id)
        .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    /// The default quota for a resource type merged with the account's
    /// override, if any.
    pub async fn get_resource_quota(
        &self,
        opts: &ResourceQuotaOptions,
    ) -> Result<DetailedResponse<ResourceQuota>, Error> {
        self.send_resource_quota(Method::GET, "get_resource_quota", opts)
            .await
    }

    pub async fn update_resource_quota(
        &self,
        opts: &ResourceQuotaOptions,
    ) -> Result<DetailedResponse<ErrorCollection>, Error> {
        self.send_resource_quota(Method::PUT, "update_resource_quota", opts)
            .await
    }

    /// Drop the account's override; the default quota applies again.
    pub async fn delete_resource_quota(
        &self,
        opts: &ResourceQuotaOptions,
    ) -> Result<DetailedResponse<ErrorCollection>, Error> {
        self.send_resource_quota(Method::DELETE, "delete_resource_quota", opts)
            .await
    }

    async fn send_resource_quota<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        operation_id: &'static str,
        opts: &ResourceQuotaOptions,
    ) -> Result<DetailedResponse<T>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        if opts.resource_type.is_empty() {
            return Err(Error::required("resource_type"));
        }
        let request = RequestBuilder::new(
            method,
            "/quota_definitions/accounts/{account_id}/resource_types/{resource_type}",
            operation_id,
        )
        .path_param("account_id", &opts.account_id)
        .path_param("resource_type", &opts.resource_type)
        .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    // ── Resource types ───────────────────────────────────────────────

    pub async fn create_default_resource_quota(
        &self,
        opts: &ResourceTypeOptions,
    ) -> Result<DetailedResponse<ErrorCollection>, Error> {
        self.send_resource_type(
            Method::POST,
            "/quota_definitions/resource_types/{resource_type}",
            "create_default_resource_quota",
            opts,
        )
        .await
    }

    /// Register the quota schema of a resource type.
    pub async fn create_schema(
        &self,
        opts: &ResourceTypeOptions,
    ) -> Result<DetailedResponse<ErrorCollection>, Error> {
        self.send_resource_type(
            Method::POST,
            "/quota_definitions/resource_types/{resource_type}/schemas",
            "create_schema",
            opts,
        )
        .await
    }

    pub async fn get_schema(
        &self,
        opts: &ResourceTypeOptions,
    ) -> Result<DetailedResponse<ResourceQuota>, Error> {
        self.send_resource_type(
            Method::GET,
            "/quota_definitions/resource_types/{resource_type}/schemas",
            "get_schema",
            opts,
        )
        .await
    }

    async fn send_resource_type<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        template: &'static str,
        operation_id: &'static str,
        opts: &ResourceTypeOptions,
    ) -> Result<DetailedResponse<T>, Error> {
        if opts.resource_type.is_empty() {
            return Err(Error::required("resource_type"));
        }
        let request = RequestBuilder::new(method, template, operation_id)
            .path_param("resource_type", &opts.resource_type)
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }
}
