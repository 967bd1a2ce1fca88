// ibm-platform-api: Async Rust clients for IBM Cloud platform services
// (context-based restrictions, IAM identity, platform notifications,
// resource manager).

pub mod auth;
pub mod context_based_restrictions;
pub mod error;
pub mod iam_identity;
pub mod platform_notifications;
pub mod request;
pub mod resource_manager;
pub mod service;
pub mod transport;
pub mod union;

pub use auth::{AuthType, Authenticator, DEFAULT_IAM_URL, IamAuthenticator};
pub use context_based_restrictions::ContextBasedRestrictionsClient;
pub use error::{Error, ErrorResponse};
pub use iam_identity::IamIdentityClient;
pub use platform_notifications::PlatformNotificationsClient;
pub use resource_manager::ResourceManagerClient;
pub use service::{BaseService, DetailedResponse, RetryPolicy, ServiceOptions};
pub use transport::{TlsMode, TransportConfig};
pub use union::{DecodeError, TaggedUnion};
