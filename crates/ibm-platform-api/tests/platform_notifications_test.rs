// Integration tests for `PlatformNotificationsClient` using wiremock.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ibm_platform_api::platform_notifications::{
    AddDestination, AddDestinationPrototype, CreateDistributionListDestinationOptions,
    DistributionListDestinationOptions, ListDistributionListDestinationsOptions,
    NotificationType, TestDestinationRequestBodyPrototype,
    TestDistributionListDestinationOptions,
};
use ibm_platform_api::{DecodeError, Error, PlatformNotificationsClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PlatformNotificationsClient) {
    let server = MockServer::start().await;
    let client =
        PlatformNotificationsClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Destinations ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_destinations() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/v1/distribution_lists/A/destinations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "destinations": [{"destination_id": id, "destination_type": "event_notifications"}]
        })))
        .mount(&server)
        .await;

    let list = client
        .list_distribution_list_destinations(&ListDistributionListDestinationsOptions::new("A"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(list.destinations.len(), 1);
    assert_eq!(list.destinations[0].destination_id(), id);
}

#[tokio::test]
async fn test_create_destination_sends_tagged_prototype() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/v1/distribution_lists/A/destinations"))
        .and(body_json(json!({
            "destination_id": id,
            "destination_type": "event_notifications"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "destination_id": id,
            "destination_type": "event_notifications"
        })))
        .mount(&server)
        .await;

    let opts = CreateDistributionListDestinationOptions::new(
        "A",
        AddDestinationPrototype::event_notifications(id),
    );
    let resp = client
        .create_distribution_list_destination(&opts)
        .await
        .unwrap();
    assert_eq!(resp.status.as_u16(), 201);
    assert!(matches!(
        resp.result,
        Some(AddDestination::EventNotifications(d)) if d.destination_id == id
    ));
}

#[tokio::test]
async fn test_get_destination_with_unknown_type_is_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/distribution_lists/A/destinations/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "destination_id": Uuid::nil(),
            "destination_type": "email"
        })))
        .mount(&server)
        .await;

    let err = client
        .get_distribution_list_destination(&DistributionListDestinationOptions::new("A", "d1"))
        .await
        .unwrap_err();
    match err {
        Error::Decode { source, .. } => assert_eq!(
            source,
            DecodeError::UnknownVariant {
                field: "destination_type".into(),
                value: "email".into()
            }
        ),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_destination_204() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/distribution_lists/A/destinations/d1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let resp = client
        .delete_distribution_list_destination(&DistributionListDestinationOptions::new("A", "d1"))
        .await
        .unwrap();
    assert_eq!(resp.status.as_u16(), 204);
    assert!(resp.result.is_none());
}

#[tokio::test]
async fn test_test_destination() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/distribution_lists/A/destinations/d1/test"))
        .and(body_json(json!({
            "destination_type": "event_notifications",
            "notification_type": "incident"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "success"})))
        .mount(&server)
        .await;

    let opts = TestDistributionListDestinationOptions::new(
        "A",
        "d1",
        TestDestinationRequestBodyPrototype::event_notifications(NotificationType::Incident),
    );
    let body = client
        .test_distribution_list_destination(&opts)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(body.message.as_deref(), Some("success"));
}

#[tokio::test]
async fn test_empty_ids_fail_before_io() {
    let (server, client) = setup().await;

    let err = client
        .get_distribution_list_destination(&DistributionListDestinationOptions::new("A", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "destination_id"));

    let err = client
        .list_distribution_list_destinations(&ListDistributionListDestinationsOptions::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "account_id"));

    assert!(server.received_requests().await.unwrap().is_empty());
}
