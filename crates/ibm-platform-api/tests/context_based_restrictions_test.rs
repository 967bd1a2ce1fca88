// Integration tests for `ContextBasedRestrictionsClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ibm_platform_api::context_based_restrictions::{
    Address, CreateRuleOptions, CreateZoneOptions, DeleteZoneOptions, GetAccountSettingsOptions,
    GetZoneOptions, ListAvailableServiceRefTargetsOptions, ListRulesOptions, ListZonesOptions,
    ReplaceZoneOptions, Resource, RuleContext, ServiceRefTargetType, ServiceRefValue,
};
use ibm_platform_api::{ContextBasedRestrictionsClient, DecodeError, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ContextBasedRestrictionsClient) {
    let server = MockServer::start().await;
    let client =
        ContextBasedRestrictionsClient::from_reqwest(&server.uri(), reqwest::Client::new())
            .unwrap();
    (server, client)
}

const AUDIT: [(&str, &str); 4] = [
    ("created_at", "2024-01-01T12:00:00Z"),
    ("created_by_id", "IBMid-1234"),
    ("last_modified_at", "2024-01-02T12:00:00.000Z"),
    ("last_modified_by_id", "IBMid-1234"),
];

fn with_audit(mut body: serde_json::Value) -> serde_json::Value {
    for (k, v) in AUDIT {
        body[k] = json!(v);
    }
    body
}

fn zone_body(addresses: serde_json::Value) -> serde_json::Value {
    with_audit(json!({
        "id": "65810ac762004f22ac19f8f8edf70a34",
        "crn": "crn:v1:bluemix:public:context-based-restrictions:global:a/A::zone:6581",
        "name": "Z",
        "account_id": "A",
        "addresses": addresses,
        "href": "https://cbr.cloud.ibm.com/v1/zones/65810ac762004f22ac19f8f8edf70a34",
    }))
}

fn rule_body() -> serde_json::Value {
    with_audit(json!({
        "id": "r1",
        "crn": "crn:v1:bluemix:public:context-based-restrictions:global:a/A::rule:r1",
        "description": "allow from zone",
        "contexts": [{"attributes": [{"name": "networkZoneId", "value": "z1"}]}],
        "resources": [{
            "attributes": [
                {"name": "accountId", "value": "A"},
                {"name": "serviceName", "value": "iam-groups", "operator": "stringEquals"}
            ],
            "tags": [{"name": "env", "value": "prod"}]
        }],
        "href": "https://cbr.cloud.ibm.com/v1/rules/r1",
    }))
}

// ── Zones ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_zone_decodes_ip_address() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/zones"))
        .and(header("Transaction-Id", "tx-1"))
        .and(body_json(json!({
            "name": "Z",
            "account_id": "A",
            "addresses": [{"type": "ipAddress", "value": "1.2.3.4"}]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(zone_body(json!([{"type": "ipAddress", "value": "1.2.3.4"}]))),
        )
        .mount(&server)
        .await;

    let opts = CreateZoneOptions {
        transaction_id: Some("tx-1".into()),
        ..CreateZoneOptions::new("Z", "A", vec![Address::ip_address("1.2.3.4")])
    };
    let resp = client.create_zone(&opts).await.unwrap();

    assert_eq!(resp.status.as_u16(), 201);
    let zone = resp.into_result().unwrap();
    assert_eq!(zone.name, "Z");
    assert_eq!(zone.addresses, vec![Address::ip_address("1.2.3.4")]);
    assert!(zone.excluded.is_empty());
}

#[tokio::test]
async fn test_get_zone_decodes_every_address_variant_and_etag() {
    let (server, client) = setup().await;

    let addresses = json!([
        {"type": "ipAddress", "value": "169.23.56.234"},
        {"type": "ipRange", "value": "169.23.22.0-169.23.22.255"},
        {"type": "subnet", "value": "192.0.2.0/24"},
        {"type": "vpc", "value": "crn:v1:bluemix:public:is:us-south:a/A::vpc:r006"},
        {"type": "serviceRef", "ref": {"account_id": "A", "service_name": "cloud-object-storage"}}
    ]);

    Mock::given(method("GET"))
        .and(path("/v1/zones/z1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"rev-7\"")
                .set_body_json(zone_body(addresses)),
        )
        .mount(&server)
        .await;

    let resp = client.get_zone(&GetZoneOptions::new("z1")).await.unwrap();
    assert_eq!(resp.etag(), Some("\"rev-7\""));

    let zone = resp.result.unwrap();
    let variants: Vec<&str> = zone
        .addresses
        .iter()
        .map(ibm_platform_api::TaggedUnion::variant)
        .collect();
    assert_eq!(variants, ["ipAddress", "ipRange", "subnet", "vpc", "serviceRef"]);
    assert_eq!(
        zone.addresses[4],
        Address::service_ref(ServiceRefValue {
            service_name: Some("cloud-object-storage".into()),
            ..ServiceRefValue::new("A")
        })
    );
}

#[tokio::test]
async fn test_unknown_address_type_fails_the_whole_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/zones/z1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(zone_body(json!([{"type": "carrierPigeon", "value": "x"}]))),
        )
        .mount(&server)
        .await;

    let err = client.get_zone(&GetZoneOptions::new("z1")).await.unwrap_err();
    match err {
        Error::Decode { source, status, .. } => {
            assert_eq!(status, 200);
            assert_eq!(
                source,
                DecodeError::UnknownVariant {
                    field: "type".into(),
                    value: "carrierPigeon".into()
                }
            );
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_address_type_is_missing_discriminator() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/zones/z1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(zone_body(json!([{"value": "1.2.3.4"}]))),
        )
        .mount(&server)
        .await;

    let err = client.get_zone(&GetZoneOptions::new("z1")).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Decode {
            source: DecodeError::MissingDiscriminator { ref field },
            ..
        } if field == "type"
    ));
}

#[tokio::test]
async fn test_list_zones_sends_only_set_query_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/zones"))
        .and(query_param("account_id", "A"))
        .and(query_param("name", "office"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "zones": []})))
        .mount(&server)
        .await;

    let opts = ListZonesOptions {
        name: Some("office".into()),
        ..ListZonesOptions::new("A")
    };
    let page = client.list_zones(&opts).await.unwrap().into_result().unwrap();
    assert_eq!(page.count, 0);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("account_id=A&name=office"));
}

#[tokio::test]
async fn test_replace_zone_sends_if_match_and_partial_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/zones/z1"))
        .and(header("If-Match", "\"rev-7\""))
        .and(body_json(json!({"name": "Z", "description": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(zone_body(json!([]))))
        .mount(&server)
        .await;

    let opts = ReplaceZoneOptions {
        name: Some("Z".into()),
        description: Some(String::new()),
        ..ReplaceZoneOptions::new("z1", "\"rev-7\"")
    };
    let zone = client.replace_zone(&opts).await.unwrap().into_result().unwrap();
    assert_eq!(zone.name, "Z");
}

#[tokio::test]
async fn test_replace_zone_requires_if_match_before_any_request() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .replace_zone(&ReplaceZoneOptions::new("z1", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "if_match"));

    let err = client.get_zone(&GetZoneOptions::new("")).await.unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "zone_id"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_zone_204_has_no_result() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/zones/z1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let resp = client.delete_zone(&DeleteZoneOptions::new("z1")).await.unwrap();
    assert_eq!(resp.status.as_u16(), 204);
    assert!(resp.result.is_none());
}

#[tokio::test]
async fn test_list_serviceref_targets() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/zones/serviceref_targets"))
        .and(query_param("type", "platform_service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "targets": [{"service_name": "iam-groups", "service_type": "platform_service"}]
        })))
        .mount(&server)
        .await;

    let opts = ListAvailableServiceRefTargetsOptions {
        target_type: Some(ServiceRefTargetType::PlatformService),
        ..Default::default()
    };
    let page = client
        .list_available_serviceref_targets(&opts)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(page.targets[0].service_name.as_deref(), Some("iam-groups"));
}

// ── Rules ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_rules_query_string_is_exact() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/rules"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"count": 1, "rules": [rule_body()]})),
        )
        .mount(&server)
        .await;

    let page = client
        .list_rules(&ListRulesOptions::new("A"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(page.rules[0].resources[0].attribute("serviceName"), Some("iam-groups"));

    let opts = ListRulesOptions {
        region: Some("us-south".into()),
        ..ListRulesOptions::new("A")
    };
    client.list_rules(&opts).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("account_id=A"));
    assert_eq!(requests[1].url.query(), Some("account_id=A&region=us-south"));
}

#[tokio::test]
async fn test_create_rule_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/rules"))
        .and(body_json(json!({
            "description": "allow from zone",
            "contexts": [{"attributes": [{"name": "networkZoneId", "value": "z1"}]}],
            "resources": [{"attributes": [{"name": "accountId", "value": "A"}]}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(rule_body()))
        .mount(&server)
        .await;

    let opts = CreateRuleOptions {
        description: Some("allow from zone".into()),
        contexts: Some(vec![RuleContext::zone("z1")]),
        resources: Some(vec![Resource::with_attributes([("accountId", "A")])]),
        ..Default::default()
    };
    let rule = client.create_rule(&opts).await.unwrap().into_result().unwrap();
    assert_eq!(rule.id, "r1");
    assert_eq!(rule.resources[0].tags[0].value, "prod");
}

#[tokio::test]
async fn test_get_rule_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/rules/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "not_found",
            "message": "The requested rule was not found",
            "trace": "trace-123"
        })))
        .mount(&server)
        .await;

    let err = client
        .get_rule(&ibm_platform_api::context_based_restrictions::GetRuleOptions::new("missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::Service {
            message,
            code,
            trace,
            response,
            ..
        } => {
            assert_eq!(message, "The requested rule was not found");
            assert_eq!(code.as_deref(), Some("not_found"));
            assert_eq!(trace.as_deref(), Some("trace-123"));
            assert!(response.body.contains("not_found"));
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

// ── Account settings ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_account_settings_sends_sdk_headers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/account_settings/A"))
        .and(header("Accept", "application/json"))
        .and(header(
            "X-IBMCloud-SDK-Analytics",
            "service_name=context_based_restrictions;service_version=V1;operation_id=get_account_settings",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(with_audit(json!({
            "id": "A",
            "crn": "crn:v1:bluemix:public:context-based-restrictions:global:a/A:::",
            "rule_count_limit": 1000,
            "zone_count_limit": 500,
            "current_rule_count": 3,
            "current_zone_count": 2,
            "href": "https://cbr.cloud.ibm.com/v1/account_settings/A"
        }))))
        .mount(&server)
        .await;

    let settings = client
        .get_account_settings(&GetAccountSettingsOptions::new("A"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(settings.zone_count_limit, 500);
    assert_eq!(settings.current_rule_count, 3);
}
