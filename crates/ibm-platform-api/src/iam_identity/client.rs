// Async client for the IAM Identity Services API (v1).
//
// Base URL: https://iam.cloud.ibm.com
// API keys:    /v1/apikeys[/{id}[/lock]]
// Service IDs: /v1/serviceids/[{id}[/lock]]

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;

use super::types::{
    ApiKeyDetails, ApiKeyIdOptions, ApiKeyList, CreateApiKeyOptions, CreateServiceIdOptions,
    GetApiKeyOptions, GetApiKeysDetailsOptions, GetServiceIdOptions, ListApiKeysOptions,
    ListServiceIdsOptions, ServiceIdDetails, ServiceIdIdOptions, ServiceIdList,
    UpdateApiKeyOptions, UpdateServiceIdOptions,
};
use crate::error::Error;
use crate::request::RequestBuilder;
use crate::service::{BaseService, DetailedResponse, ServiceOptions};

pub const DEFAULT_SERVICE_URL: &str = "https://iam.cloud.ibm.com";
pub const DEFAULT_SERVICE_NAME: &str = "iam_identity";
const SERVICE_VERSION: &str = "V1";

/// Client for IAM API keys and service IDs.
#[derive(Debug, Clone)]
pub struct IamIdentityClient {
    service: BaseService,
}

impl IamIdentityClient {
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

    // ── API keys ─────────────────────────────────────────────────────

    /// One page of API keys; follow `next_pagetoken()` for more.
    pub async fn list_api_keys(
        &self,
        opts: &ListApiKeysOptions,
    ) -> Result<DetailedResponse<ApiKeyList>, Error> {
        let request = RequestBuilder::new(Method::GET, "/v1/apikeys", "list_api_keys")
            .query_opt("account_id", opts.account_id.as_deref())
            .query_opt("iam_id", opts.iam_id.as_deref())
            .query_opt("pagesize", opts.pagesize)
            .query_opt("pagetoken", opts.pagetoken.as_deref())
            .query_opt("scope", opts.scope)
            .query_opt("type", opts.owner_type)
            .query_opt("sort", opts.sort.as_deref())
            .query_opt("order", opts.order)
            .query_opt("include_history", opts.include_history)
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn create_api_key(
        &self,
        opts: &CreateApiKeyOptions,
    ) -> Result<DetailedResponse<ApiKeyDetails>, Error> {
        if opts.name.is_empty() {
            return Err(Error::required("name"));
        }
        if opts.iam_id.is_empty() {
            return Err(Error::required("iam_id"));
        }
        let request = RequestBuilder::new(Method::POST, "/v1/apikeys", "create_api_key")
            .header_opt("Entity-Lock", opts.entity_lock.map(|lock| lock.to_string()))
            .custom_headers(&opts.headers)
            .json(opts)?;
        self.service.send(request).await
    }

    /// Look up the key passed in the `IAM-ApiKey` header.
    pub async fn get_api_keys_details(
        &self,
        opts: &GetApiKeysDetailsOptions,
    ) -> Result<DetailedResponse<ApiKeyDetails>, Error> {
        let request =
            RequestBuilder::new(Method::GET, "/v1/apikeys/details", "get_api_keys_details")
                .header_opt("IAM-ApiKey", opts.iam_api_key.as_deref())
                .query_opt("include_history", opts.include_history)
                .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn get_api_key(
        &self,
        opts: &GetApiKeyOptions,
    ) -> Result<DetailedResponse<ApiKeyDetails>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request = RequestBuilder::new(Method::GET, "/v1/apikeys/{id}", "get_api_key")
            .path_param("id", &opts.id)
            .query_opt("include_history", opts.include_history)
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn update_api_key(
        &self,
        opts: &UpdateApiKeyOptions,
    ) -> Result<DetailedResponse<ApiKeyDetails>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        if opts.if_match.is_empty() {
            return Err(Error::required("if_match"));
        }
        let request = RequestBuilder::new(Method::PUT, "/v1/apikeys/{id}", "update_api_key")
            .path_param("id", &opts.id)
            .header("If-Match", &opts.if_match)
            .custom_headers(&opts.headers)
            .json(opts)?;
        self.service.send(request).await
    }

    pub async fn delete_api_key(
        &self,
        opts: &ApiKeyIdOptions,
    ) -> Result<DetailedResponse<()>, Error> {
        self.send_by_id(
            Method::DELETE,
            "/v1/apikeys/{id}",
            "delete_api_key",
            &opts.id,
            &opts.headers,
        )
        .await
    }

    pub async fn lock_api_key(&self, opts: &ApiKeyIdOptions) -> Result<DetailedResponse<()>, Error> {
        self.send_by_id(
            Method::POST,
            "/v1/apikeys/{id}/lock",
            "lock_api_key",
            &opts.id,
            &opts.headers,
        )
        .await
    }

    pub async fn unlock_api_key(
        &self,
        opts: &ApiKeyIdOptions,
    ) -> Result<DetailedResponse<()>, Error> {
        self.send_by_id(
            Method::DELETE,
            "/v1/apikeys/{id}/lock",
            "unlock_api_key",
            &opts.id,
            &opts.headers,
        )
        .await
    }

    // ── Service IDs ──────────────────────────────────────────────────

    pub async fn list_service_ids(
        &self,
        opts: &ListServiceIdsOptions,
    ) -> Result<DetailedResponse<ServiceIdList>, Error> {
        let request = RequestBuilder::new(Method::GET, "/v1/serviceids/", "list_service_ids")
            .query_opt("account_id", opts.account_id.as_deref())
            .query_opt("name", opts.name.as_deref())
            .query_opt("pagesize", opts.pagesize)
            .query_opt("pagetoken", opts.pagetoken.as_deref())
            .query_opt("sort", opts.sort.as_deref())
            .query_opt("order", opts.order)
            .query_opt("include_history", opts.include_history)
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn create_service_id(
        &self,
        opts: &CreateServiceIdOptions,
    ) -> Result<DetailedResponse<ServiceIdDetails>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        if opts.name.is_empty() {
            return Err(Error::required("name"));
        }
        let request = RequestBuilder::new(Method::POST, "/v1/serviceids/", "create_service_id")
            .header_opt("Entity-Lock", opts.entity_lock.map(|lock| lock.to_string()))
            .custom_headers(&opts.headers)
            .json(opts)?;
        self.service.send(request).await
    }

    pub async fn get_service_id(
        &self,
        opts: &GetServiceIdOptions,
    ) -> Result<DetailedResponse<ServiceIdDetails>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request = RequestBuilder::new(Method::GET, "/v1/serviceids/{id}", "get_service_id")
            .path_param("id", &opts.id)
            .query_opt("include_history", opts.include_history)
            .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn update_service_id(
        &self,
        opts: &UpdateServiceIdOptions,
    ) -> Result<DetailedResponse<ServiceIdDetails>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        if opts.if_match.is_empty() {
            return Err(Error::required("if_match"));
        }
        let request =
            RequestBuilder::new(Method::PUT, "/v1/serviceids/{id}", "update_service_id")
                .path_param("id", &opts.id)
                .header("If-Match", &opts.if_match)
                .custom_headers(&opts.headers)
                .json(opts)?;
        self.service.send(request).await
    }

    pub async fn delete_service_id(
        &self,
        opts: &ServiceIdIdOptions,
    ) -> Result<DetailedResponse<()>, Error> {
        self.send_by_id(
            Method::DELETE,
            "/v1/serviceids/{id}",
            "delete_service_id",
            &opts.id,
            &opts.headers,
        )
        .await
    }

    /// Lock a service ID. Some deployments answer 204, others echo the
    /// updated service ID.
    pub async fn lock_service_id(
        &self,
        opts: &ServiceIdIdOptions,
    ) -> Result<DetailedResponse<ServiceIdDetails>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request =
            RequestBuilder::new(Method::POST, "/v1/serviceids/{id}/lock", "lock_service_id")
                .path_param("id", &opts.id)
                .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn unlock_service_id(
        &self,
        opts: &ServiceIdIdOptions,
    ) -> Result<DetailedResponse<ServiceIdDetails>, Error> {
        if opts.id.is_empty() {
            return Err(Error::required("id"));
        }
        let request =
            RequestBuilder::new(Method::DELETE, "/v1/serviceids/{id}/lock", "unlock_service_id")
                .path_param("id", &opts.id)
                .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn send_by_id(
        &self,
        method: Method,
        template: &'static str,
        operation_id: &'static str,
        id: &str,
        headers: &HashMap<String, String>,
    ) -> Result<DetailedResponse<()>, Error> {
        if id.is_empty() {
            return Err(Error::required("id"));
        }
        let request = RequestBuilder::new(method, template, operation_id)
            .path_param("id", id)
            .custom_headers(headers);
        self.service.send_empty(request).await
    }
}
