//! Platform notifications: the per-account distribution list of
//! notification destinations.

mod client;
pub mod types;

pub use client::{DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL, PlatformNotificationsClient};
pub use types::*;
