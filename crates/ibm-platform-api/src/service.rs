// Shared machinery behind every service client: URL and header handling,
// authentication, retries, and response decoding.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Authenticator;
use crate::error::{Error, ErrorResponse};
use crate::request::RequestBuilder;
use crate::transport::TransportConfig;
use crate::union;

const SDK_ANALYTICS_HEADER: &str = "X-IBMCloud-SDK-Analytics";

// ── Detailed response ────────────────────────────────────────────────

/// A successful (2xx) response.
///
/// `result` is `None` when the server sent no body, which is the normal
/// outcome of 204 operations.
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub result: Option<T>,
}

impl<T> DetailedResponse<T> {
    /// The decoded body, or [`Error::EmptyBody`] when there was none.
    pub fn into_result(self) -> Result<T, Error> {
        self.result.ok_or(Error::EmptyBody {
            status: self.status.as_u16(),
        })
    }

    /// The `ETag` revision token, needed as `If-Match` on replace/update.
    pub fn etag(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

// ── Error response shape shared by the platform services ─────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "errorMessage")]
    error_message: Option<String>,
    #[serde(default, rename = "errorCode", alias = "error_code")]
    error_code: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    trace: Option<String>,
}

#[derive(serde::Deserialize)]
struct ErrorItem {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        self.errors
            .iter()
            .find_map(|e| e.message.clone())
            .or_else(|| match &self.error {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(serde_json::Value::Array(items)) => items
                    .iter()
                    .find_map(|i| i.get("message").and_then(|m| m.as_str()))
                    .map(str::to_owned),
                _ => None,
            })
            .or_else(|| self.message.clone())
            .or_else(|| self.error_message.clone())
    }

    fn code(&self) -> Option<String> {
        self.errors
            .iter()
            .find_map(|e| e.code.clone())
            .or_else(|| self.error_code.clone())
            .or_else(|| match &self.code {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
    }
}

// ── Retry policy ─────────────────────────────────────────────────────

/// Automatic retry of transient failures.
///
/// Retries 429, 5xx other than 501, and connect/timeout errors, backing
/// off exponentially from one second up to `max_interval`. A `Retry-After`
/// header given in seconds takes precedence over the computed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            max_interval: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Zero values fall back to the defaults.
    pub fn new(max_retries: u32, max_interval: Duration) -> Self {
        let defaults = Self::default();
        Self {
            max_retries: if max_retries == 0 {
                defaults.max_retries
            } else {
                max_retries
            },
            max_interval: if max_interval.is_zero() {
                defaults.max_interval
            } else {
                max_interval
            },
        }
    }

    pub fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS
            || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
    }

    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after
            .unwrap_or_else(|| Duration::from_secs(1u64.checked_shl(attempt).unwrap_or(u64::MAX)))
            .min(self.max_interval)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

// ── Service options ──────────────────────────────────────────────────

/// Everything needed to construct a service client.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Overrides the service's default endpoint.
    pub service_url: Option<String>,
    pub authenticator: Authenticator,
    pub transport: TransportConfig,
    pub retry: Option<RetryPolicy>,
    pub default_headers: HeaderMap,
}

impl ServiceOptions {
    pub fn new(authenticator: Authenticator) -> Self {
        Self {
            service_url: None,
            authenticator,
            transport: TransportConfig::default(),
            retry: None,
            default_headers: HeaderMap::new(),
        }
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    pub fn with_retries(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

// ── Base service ─────────────────────────────────────────────────────

/// HTTP plumbing shared by the service clients.
#[derive(Debug, Clone)]
pub struct BaseService {
    http: reqwest::Client,
    service_url: Url,
    service_name: &'static str,
    service_version: &'static str,
    authenticator: Authenticator,
    retry: Option<RetryPolicy>,
    default_headers: HeaderMap,
}

impl BaseService {
    pub fn new(
        service_name: &'static str,
        service_version: &'static str,
        default_url: &str,
        options: ServiceOptions,
    ) -> Result<Self, Error> {
        let http = options.transport.build_client()?;
        let url = options.service_url.as_deref().unwrap_or(default_url);
        Ok(Self {
            http,
            service_url: Url::parse(url)?,
            service_name,
            service_version,
            authenticator: options.authenticator,
            retry: options.retry,
            default_headers: options.default_headers,
        })
    }

    /// Wrap an existing `reqwest::Client` (no authentication).
    pub fn from_reqwest(
        service_name: &'static str,
        service_version: &'static str,
        service_url: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            service_url: Url::parse(service_url)?,
            service_name,
            service_version,
            authenticator: Authenticator::NoAuth,
            retry: None,
            default_headers: HeaderMap::new(),
        })
    }

    pub fn service_name(&self) -> &'static str {
        self.service_name
    }

    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    pub fn set_service_url(&mut self, url: &str) -> Result<(), Error> {
        self.service_url = Url::parse(url)?;
        Ok(())
    }

    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        self.default_headers = headers;
    }

    pub fn set_authenticator(&mut self, authenticator: Authenticator) {
        self.authenticator = authenticator;
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.retry = Some(RetryPolicy::new(max_retries, max_interval));
    }

    pub fn disable_retries(&mut self) {
        self.retry = None;
    }

    // ── Sending ──────────────────────────────────────────────────────

    /// Send the request and decode a JSON body into `T` when one is present.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<DetailedResponse<T>, Error> {
        let resp = self.execute(&request.accept_json()).await?;
        Self::handle_response(resp).await
    }

    /// Send a request whose successful response carries no result.
    pub async fn send_empty(
        &self,
        request: RequestBuilder,
    ) -> Result<DetailedResponse<()>, Error> {
        let resp = self.execute(&request).await?;
        let status = resp.status();
        if status.is_success() {
            Ok(DetailedResponse {
                status,
                headers: resp.headers().clone(),
                result: None,
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn execute(&self, request: &RequestBuilder) -> Result<reqwest::Response, Error> {
        let url = request.resolve_url(&self.service_url)?;
        let headers = self.headers_for(request)?;
        let mut attempt = 0_u32;

        loop {
            debug!("{} {url}", request.method());
            let mut builder = self
                .http
                .request(request.method().clone(), url.clone())
                .headers(headers.clone());
            if let Some(body) = request.body() {
                builder = builder.json(body);
            }
            let builder = self.authenticator.authenticate(builder).await?;
            let outcome = builder.send().await;

            let Some(policy) = self.retry else {
                return Ok(outcome?);
            };

            let delay = match &outcome {
                Ok(resp) if RetryPolicy::should_retry(resp.status()) => {
                    Some(policy.delay(attempt, retry_after(resp.headers())))
                }
                Err(e) if e.is_connect() || e.is_timeout() => Some(policy.delay(attempt, None)),
                _ => None,
            };

            match delay {
                Some(delay) if attempt < policy.max_retries => {
                    attempt += 1;
                    debug!(attempt, ?delay, "retrying {} {url}", request.method());
                    tokio::time::sleep(delay).await;
                }
                Some(_) => {
                    warn!(attempts = attempt + 1, "giving up on {} {url}", request.method());
                    return Ok(outcome?);
                }
                None => return Ok(outcome?),
            }
        }
    }

    fn headers_for(&self, request: &RequestBuilder) -> Result<HeaderMap, Error> {
        let mut headers = self.default_headers.clone();
        let analytics = format!(
            "service_name={};service_version={};operation_id={}",
            self.service_name,
            self.service_version,
            request.operation_id()
        );
        headers.insert(SDK_ANALYTICS_HEADER, header_value(SDK_ANALYTICS_HEADER, &analytics)?);
        if request.accepts_json() {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        for (name, value) in request.headers() {
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::Validation {
                field: name.clone(),
                reason: format!("invalid header name: {e}"),
            })?;
            headers.insert(header, header_value(name, value)?);
        }
        Ok(headers)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<DetailedResponse<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let headers = resp.headers().clone();
        let body = resp.text().await?;
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(DetailedResponse {
                status,
                headers,
                result: None,
            });
        }

        let result = union::from_str(&body).map_err(|source| Error::Decode {
            source,
            status: status.as_u16(),
            body: body.clone(),
        })?;
        Ok(DetailedResponse {
            status,
            headers,
            result: Some(result),
        })
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let headers = resp.headers().clone();
        let raw = resp.text().await.unwrap_or_default();

        let (message, code, trace) = match serde_json::from_str::<ErrorBody>(&raw) {
            Ok(body) => (body.message(), body.code(), body.trace),
            Err(_) => (None, None, None),
        };
        let message = message.unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw.clone()
            }
        });

        Error::Service {
            status: status.as_u16(),
            message,
            code,
            trace,
            response: Box::new(ErrorResponse {
                status,
                headers,
                body: raw,
            }),
        }
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|e| Error::Validation {
        field: name.to_owned(),
        reason: format!("invalid header value: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses() {
        assert!(RetryPolicy::should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(RetryPolicy::should_retry(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!RetryPolicy::should_retry(StatusCode::NOT_IMPLEMENTED));
        assert!(!RetryPolicy::should_retry(StatusCode::NOT_FOUND));
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let policy = RetryPolicy::new(3, Duration::from_secs(5));
        assert_eq!(policy.delay(0, None), Duration::from_secs(1));
        assert_eq!(policy.delay(2, None), Duration::from_secs(4));
        assert_eq!(policy.delay(3, None), Duration::from_secs(5));
        assert_eq!(policy.delay(80, None), Duration::from_secs(5));
        assert_eq!(
            policy.delay(0, Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn zero_retry_settings_use_defaults() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO), RetryPolicy::default());
    }

    #[test]
    fn error_body_message_prefers_errors_array() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"errors":[{"code":"not_found","message":"Zone not found"}],"trace":"abc"}"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(body.message().as_deref(), Some("Zone not found"));
        assert_eq!(body.code().as_deref(), Some("not_found"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"errorCode":"BXNIM0405E","errorMessage":"locked"}"#)
                .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(body.message().as_deref(), Some("locked"));
        assert_eq!(body.code().as_deref(), Some("BXNIM0405E"));
    }
}
