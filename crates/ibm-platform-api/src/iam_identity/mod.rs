//! IAM identity: API keys and service IDs.

mod client;
pub mod types;

pub use client::{DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL, IamIdentityClient};
pub use types::*;
