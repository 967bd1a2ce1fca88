// Request authentication.
//
// Every outgoing request passes through an `Authenticator`, which adds the
// `Authorization` header for the configured scheme. The IAM variant trades
// an API key for a short-lived access token and caches it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Default IAM token service.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Refresh window used when a token's lifetime cannot be trusted.
const FALLBACK_REFRESH: Duration = Duration::from_secs(60);

/// IAM tokens live for an hour; anything beyond a day is bogus.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Authentication scheme names as written in external configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum AuthType {
    #[strum(serialize = "iam")]
    Iam,
    #[strum(serialize = "bearerToken")]
    BearerToken,
    #[strum(serialize = "basic")]
    Basic,
    #[strum(serialize = "noAuth")]
    NoAuth,
}

/// How requests are authenticated.
#[derive(Debug, Clone)]
pub enum Authenticator {
    /// No `Authorization` header.
    NoAuth,
    /// A static bearer token supplied by the caller.
    BearerToken(SecretString),
    /// HTTP basic authentication.
    Basic {
        username: String,
        password: SecretString,
    },
    /// IAM API-key exchange with token caching.
    Iam(IamAuthenticator),
}

impl Authenticator {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::BearerToken(SecretString::from(token.into()))
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::NoAuth => AuthType::NoAuth,
            Self::BearerToken(_) => AuthType::BearerToken,
            Self::Basic { .. } => AuthType::Basic,
            Self::Iam(_) => AuthType::Iam,
        }
    }

    /// Add credentials to an outgoing request.
    pub async fn authenticate(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, Error> {
        match self {
            Self::NoAuth => Ok(request),
            Self::BearerToken(token) => Ok(request.header(AUTHORIZATION, bearer_value(token)?)),
            Self::Basic { username, password } => {
                if username.is_empty() {
                    return Err(Error::required("username"));
                }
                Ok(request.basic_auth(username, Some(password.expose_secret())))
            }
            Self::Iam(iam) => {
                let token = iam.access_token().await?;
                Ok(request.header(AUTHORIZATION, bearer_value(&token)?))
            }
        }
    }
}

fn bearer_value(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).map_err(
        |e| Error::Authentication {
            message: format!("invalid bearer token header value: {e}"),
        },
    )?;
    value.set_sensitive(true);
    Ok(value)
}

// ── IAM ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug)]
struct CachedToken {
    access_token: SecretString,
    refresh_at: Instant,
}

/// Exchanges an IAM API key for bearer tokens.
///
/// Clones share the token cache, so one authenticator can back several
/// service clients and concurrent calls trigger at most one exchange.
#[derive(Debug, Clone)]
pub struct IamAuthenticator {
    apikey: SecretString,
    url: Url,
    http: reqwest::Client,
    cache: Arc<Mutex<Option<CachedToken>>>,
}

impl IamAuthenticator {
    /// Authenticator against the public IAM endpoint.
    pub fn new(apikey: impl Into<String>) -> Result<Self, Error> {
        Self::with_url(apikey, DEFAULT_IAM_URL, &TransportConfig::default())
    }

    pub fn with_url(
        apikey: impl Into<String>,
        url: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let apikey = apikey.into();
        if apikey.is_empty() {
            return Err(Error::required("apikey"));
        }
        Ok(Self {
            apikey: SecretString::from(apikey),
            url: Url::parse(url)?,
            http: transport.build_client()?,
            cache: Arc::new(Mutex::new(None)),
        })
    }

    /// The token endpoint (`{url}/identity/token`).
    pub fn token_url(&self) -> Result<Url, Error> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Validation {
                field: "auth_url".into(),
                reason: format!("{} cannot be used as a base URL", self.url),
            })?
            .pop_if_empty()
            .extend(["identity", "token"]);
        Ok(url)
    }

    /// Return a valid access token, exchanging the API key when the cached
    /// token is absent or past 80% of its lifetime.
    pub async fn access_token(&self) -> Result<SecretString, Error> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken, Error> {
        let url = self.token_url()?;
        debug!("POST {url} (IAM token exchange)");

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", APIKEY_GRANT_TYPE),
                ("apikey", self.apikey.expose_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("IAM token request failed (HTTP {status}): {body}"),
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Authentication {
                message: format!("unexpected IAM token response: {e}"),
            })?;
        if token.access_token.is_empty() {
            return Err(Error::Authentication {
                message: "IAM token response carried no access_token".into(),
            });
        }

        debug!(expires_in = token.expires_in, "IAM access token refreshed");
        Ok(CachedToken {
            access_token: SecretString::from(token.access_token),
            refresh_at: refresh_deadline(Instant::now(), token.expires_in),
        })
    }
}

/// When to refresh a token issued at `now`: after 80% of `expires_in`, or
/// after [`FALLBACK_REFRESH`] when the lifetime is implausible or the
/// instant is not representable.
fn refresh_deadline(now: Instant, expires_in: u64) -> Instant {
    let lifetime = Duration::from_secs(expires_in.saturating_mul(8) / 10);
    Some(lifetime)
        .filter(|l| *l <= MAX_TOKEN_LIFETIME)
        .and_then(|l| now.checked_add(l))
        .unwrap_or_else(|| now + FALLBACK_REFRESH)
}
