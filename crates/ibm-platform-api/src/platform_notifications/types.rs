// Platform notifications wire types: distribution list destinations.
//
// Destinations are polymorphic on `destination_type`. Only Event
// Notifications instances exist today; new kinds become new variants.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::union::{self, DecodeError, TaggedUnion};

const EVENT_NOTIFICATIONS: &str = "event_notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNotificationDestination {
    /// GUID of the Event Notifications instance.
    pub destination_id: Uuid,
}

/// A destination to add to an account's distribution list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "destination_type")]
pub enum AddDestinationPrototype {
    #[serde(rename = "event_notifications")]
    EventNotifications(EventNotificationDestination),
}

impl AddDestinationPrototype {
    pub fn event_notifications(destination_id: Uuid) -> Self {
        Self::EventNotifications(EventNotificationDestination { destination_id })
    }
}

/// A destination as returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "destination_type")]
pub enum AddDestination {
    #[serde(rename = "event_notifications")]
    EventNotifications(EventNotificationDestination),
}

impl AddDestination {
    pub fn destination_id(&self) -> Uuid {
        match self {
            Self::EventNotifications(d) => d.destination_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDestinationCollection {
    pub destinations: Vec<AddDestination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    Announcements,
    BillingAndUsage,
    Incident,
    Maintenance,
    Resource,
    SecurityBulletins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEventNotificationDestination {
    pub notification_type: NotificationType,
}

/// Body of a test-notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "destination_type")]
pub enum TestDestinationRequestBodyPrototype {
    #[serde(rename = "event_notifications")]
    EventNotifications(TestEventNotificationDestination),
}

impl TestDestinationRequestBodyPrototype {
    pub fn event_notifications(notification_type: NotificationType) -> Self {
        Self::EventNotifications(TestEventNotificationDestination { notification_type })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDestinationResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── Union decoding ───────────────────────────────────────────────────

impl TaggedUnion for AddDestinationPrototype {
    const DISCRIMINATOR: &'static str = "destination_type";
    const VARIANTS: &'static [&'static str] = &[EVENT_NOTIFICATIONS];

    fn from_variant(tag: &str, object: Value) -> Result<Self, DecodeError> {
        match tag {
            EVENT_NOTIFICATIONS => union::payload(object).map(Self::EventNotifications),
            other => Err(unknown(Self::DISCRIMINATOR, other)),
        }
    }

    fn variant(&self) -> &'static str {
        EVENT_NOTIFICATIONS
    }
}

impl TaggedUnion for AddDestination {
    const DISCRIMINATOR: &'static str = "destination_type";
    const VARIANTS: &'static [&'static str] = &[EVENT_NOTIFICATIONS];

    fn from_variant(tag: &str, object: Value) -> Result<Self, DecodeError> {
        match tag {
            EVENT_NOTIFICATIONS => union::payload(object).map(Self::EventNotifications),
            other => Err(unknown(Self::DISCRIMINATOR, other)),
        }
    }

    fn variant(&self) -> &'static str {
        EVENT_NOTIFICATIONS
    }
}

impl TaggedUnion for TestDestinationRequestBodyPrototype {
    const DISCRIMINATOR: &'static str = "destination_type";
    const VARIANTS: &'static [&'static str] = &[EVENT_NOTIFICATIONS];

    fn from_variant(tag: &str, object: Value) -> Result<Self, DecodeError> {
        match tag {
            EVENT_NOTIFICATIONS => union::payload(object).map(Self::EventNotifications),
            other => Err(unknown(Self::DISCRIMINATOR, other)),
        }
    }

    fn variant(&self) -> &'static str {
        EVENT_NOTIFICATIONS
    }
}

impl<'de> Deserialize<'de> for AddDestinationPrototype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize(deserializer)
    }
}

impl<'de> Deserialize<'de> for AddDestination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize(deserializer)
    }
}

impl<'de> Deserialize<'de> for TestDestinationRequestBodyPrototype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize(deserializer)
    }
}

fn unknown(field: &str, value: &str) -> DecodeError {
    DecodeError::UnknownVariant {
        field: field.into(),
        value: value.into(),
    }
}

// ── Options ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListDistributionListDestinationsOptions {
    pub account_id: String,
    pub headers: HashMap<String, String>,
}

impl ListDistributionListDestinationsOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateDistributionListDestinationOptions {
    pub account_id: String,
    pub destination: AddDestinationPrototype,
    pub headers: HashMap<String, String>,
}

impl CreateDistributionListDestinationOptions {
    pub fn new(account_id: impl Into<String>, destination: AddDestinationPrototype) -> Self {
        Self {
            account_id: account_id.into(),
            destination,
            headers: HashMap::new(),
        }
    }
}

/// Options for get and delete, which address one destination.
#[derive(Debug, Clone, Default)]
pub struct DistributionListDestinationOptions {
    pub account_id: String,
    pub destination_id: String,
    pub headers: HashMap<String, String>,
}

impl DistributionListDestinationOptions {
    pub fn new(account_id: impl Into<String>, destination_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            destination_id: destination_id.into(),
            headers: HashMap::new(),
        }
    }
}

pub type GetDistributionListDestinationOptions = DistributionListDestinationOptions;
pub type DeleteDistributionListDestinationOptions = DistributionListDestinationOptions;

#[derive(Debug, Clone)]
pub struct TestDistributionListDestinationOptions {
    pub account_id: String,
    pub destination_id: String,
    pub body: TestDestinationRequestBodyPrototype,
    pub headers: HashMap<String, String>,
}

impl TestDistributionListDestinationOptions {
    pub fn new(
        account_id: impl Into<String>,
        destination_id: impl Into<String>,
        body: TestDestinationRequestBodyPrototype,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            destination_id: destination_id.into(),
            body,
            headers: HashMap::new(),
        }
    }
}
