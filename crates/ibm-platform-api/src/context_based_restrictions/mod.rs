//! Context-based restrictions: network zones and the rules that bind them
//! to resources.

mod client;
pub mod types;

pub use client::{ContextBasedRestrictionsClient, DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL};
pub use types::*;
