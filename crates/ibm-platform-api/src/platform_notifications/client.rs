// Async client for the Platform Notifications distribution list API (v1).
//
// Base URL: https://cloud.ibm.com/notification-api
// Destinations: /v1/distribution_lists/{account_id}/destinations[/{destination_id}[/test]]

use std::time::Duration;

use reqwest::Method;

use super::types::{
    AddDestination, AddDestinationCollection, CreateDistributionListDestinationOptions,
    DistributionListDestinationOptions, ListDistributionListDestinationsOptions,
    TestDestinationResponseBody, TestDistributionListDestinationOptions,
};
use crate::error::Error;
use crate::request::RequestBuilder;
use crate::service::{BaseService, DetailedResponse, ServiceOptions};

pub const DEFAULT_SERVICE_URL: &str = "https://cloud.ibm.com/notification-api";
pub const DEFAULT_SERVICE_NAME: &str = "platform_notifications";
const SERVICE_VERSION: &str = "V1";

const DESTINATIONS: &str = "/v1/distribution_lists/{account_id}/destinations";
const DESTINATION: &str = "/v1/distribution_lists/{account_id}/destinations/{destination_id}";

/// Client for an account's notification distribution list.
#[derive(Debug, Clone)]
pub struct PlatformNotificationsClient {
    service: BaseService,
}

impl PlatformNotificationsClient {
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

    // ── Destinations ─────────────────────────────────────────────────

    pub async fn list_distribution_list_destinations(
        &self,
        opts: &ListDistributionListDestinationsOptions,
    ) -> Result<DetailedResponse<AddDestinationCollection>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        let request = RequestBuilder::new(
            Method::GET,
            DESTINATIONS,
            "list_distribution_list_destinations",
        )
        .path_param("account_id", &opts.account_id)
        .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn create_distribution_list_destination(
        &self,
        opts: &CreateDistributionListDestinationOptions,
    ) -> Result<DetailedResponse<AddDestination>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        let request = RequestBuilder::new(
            Method::POST,
            DESTINATIONS,
            "create_distribution_list_destination",
        )
        .path_param("account_id", &opts.account_id)
        .custom_headers(&opts.headers)
        .json(&opts.destination)?;
        self.service.send(request).await
    }

    pub async fn get_distribution_list_destination(
        &self,
        opts: &DistributionListDestinationOptions,
    ) -> Result<DetailedResponse<AddDestination>, Error> {
        validate_destination(opts)?;
        let request =
            RequestBuilder::new(Method::GET, DESTINATION, "get_distribution_list_destination")
                .path_param("account_id", &opts.account_id)
                .path_param("destination_id", &opts.destination_id)
                .custom_headers(&opts.headers);
        self.service.send(request).await
    }

    pub async fn delete_distribution_list_destination(
        &self,
        opts: &DistributionListDestinationOptions,
    ) -> Result<DetailedResponse<()>, Error> {
        validate_destination(opts)?;
        let request = RequestBuilder::new(
            Method::DELETE,
            DESTINATION,
            "delete_distribution_list_destination",
        )
        .path_param("account_id", &opts.account_id)
        .path_param("destination_id", &opts.destination_id)
        .custom_headers(&opts.headers);
        self.service.send_empty(request).await
    }

    /// Send a test notification of the requested type to a destination.
    pub async fn test_distribution_list_destination(
        &self,
        opts: &TestDistributionListDestinationOptions,
    ) -> Result<DetailedResponse<TestDestinationResponseBody>, Error> {
        if opts.account_id.is_empty() {
            return Err(Error::required("account_id"));
        }
        if opts.destination_id.is_empty() {
            return Err(Error::required("destination_id"));
        }
        let request = RequestBuilder::new(
            Method::POST,
            "/v1/distribution_lists/{account_id}/destinations/{destination_id}/test",
            "test_distribution_list_destination",
        )
        .path_param("account_id", &opts.account_id)
        .path_param("destination_id", &opts.destination_id)
        .custom_headers(&opts.headers)
        .json(&opts.body)?;
        self.service.send(request).await
    }
}

fn validate_destination(opts: &DistributionListDestinationOptions) -> Result<(), Error> {
    if opts.account_id.is_empty() {
        return Err(Error::required("account_id"));
    }
    if opts.destination_id.is_empty() {
        return Err(Error::required("destination_id"));
    }
    Ok(())
}
