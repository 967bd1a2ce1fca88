//! Resource manager: resource groups and quota definitions.

mod client;
pub mod types;

pub use client::{DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL, ResourceManagerClient};
pub use types::*;
