// Integration tests for `IamIdentityClient` using wiremock.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ibm_platform_api::iam_identity::{
    ApiKeyIdOptions, ApiKeyInsideCreateServiceIdRequest, CreateApiKeyOptions,
    CreateServiceIdOptions, GetApiKeyOptions, GetApiKeysDetailsOptions, GetServiceIdOptions,
    ListApiKeysOptions, ListServiceIdsOptions, ServiceIdIdOptions, SortOrder,
    UpdateApiKeyOptions, UpdateServiceIdOptions,
};
use ibm_platform_api::{Error, IamIdentityClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, IamIdentityClient) {
    let server = MockServer::start().await;
    let client = IamIdentityClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn api_key_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "entity_tag": "1-abc",
        "crn": format!("crn:v1:bluemix:public:iam-identity::a/A::apikey:{id}"),
        "locked": false,
        "created_at": "2024-01-01T12:00+0000",
        "created_by": "IBMid-1234",
        "name": "ci-key",
        "iam_id": "IBMid-1234",
        "account_id": "A",
        "apikey": "xxxx"
    })
}

fn service_id_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "iam_id": format!("iam-{id}"),
        "entity_tag": "2-def",
        "crn": format!("crn:v1:bluemix:public:iam-identity::a/A::serviceid:{id}"),
        "locked": true,
        "account_id": "A",
        "name": "builder",
        "unique_instance_crns": ["crn:v1:instance"],
        "apikey": api_key_body("key-of-service-id")
    })
}

// ── API keys ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_api_keys_and_next_pagetoken() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/apikeys"))
        .and(query_param("account_id", "A"))
        .and(query_param("pagesize", "1"))
        .and(query_param("order", "desc"))
        .and(query_param("include_history", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "limit": 1,
            "first": "https://iam.cloud.ibm.com/v1/apikeys?pagesize=1",
            "next": "https://iam.cloud.ibm.com/v1/apikeys?pagesize=1&pagetoken=page-2",
            "apikeys": [api_key_body("k1")]
        })))
        .mount(&server)
        .await;

    let opts = ListApiKeysOptions {
        account_id: Some("A".into()),
        pagesize: Some(1),
        order: Some(SortOrder::Desc),
        include_history: Some(false),
        ..Default::default()
    };
    let list = client.list_api_keys(&opts).await.unwrap().into_result().unwrap();

    assert_eq!(list.apikeys.len(), 1);
    assert_eq!(list.apikeys[0].id, "k1");
    assert_eq!(list.next_pagetoken().as_deref(), Some("page-2"));
}

#[tokio::test]
async fn test_create_api_key_sends_entity_lock() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/apikeys"))
        .and(header("Entity-Lock", "true"))
        .and(body_json(json!({
            "name": "ci-key",
            "iam_id": "IBMid-1234",
            "store_value": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(api_key_body("k1")))
        .mount(&server)
        .await;

    let opts = CreateApiKeyOptions {
        store_value: Some(true),
        entity_lock: Some(true),
        ..CreateApiKeyOptions::new("ci-key", "IBMid-1234")
    };
    let resp = client.create_api_key(&opts).await.unwrap();
    assert_eq!(resp.status.as_u16(), 201);
    assert_eq!(resp.result.unwrap().name, "ci-key");
}

#[tokio::test]
async fn test_create_api_key_requires_name_and_iam_id() {
    let (server, client) = setup().await;

    let err = client
        .create_api_key(&CreateApiKeyOptions::new("", "IBMid-1234"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "name"));

    let err = client
        .create_api_key(&CreateApiKeyOptions::new("ci-key", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "iam_id"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_api_keys_details_sends_iam_apikey_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/apikeys/details"))
        .and(header("IAM-ApiKey", "secret-value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_key_body("k1")))
        .mount(&server)
        .await;

    let opts = GetApiKeysDetailsOptions {
        iam_api_key: Some("secret-value".into()),
        ..Default::default()
    };
    let key = client
        .get_api_keys_details(&opts)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(key.account_id, "A");
}

#[tokio::test]
async fn test_get_api_key_with_history() {
    let (server, client) = setup().await;

    let mut body = api_key_body("k1");
    body["history"] = json!([{
        "timestamp": "2024-01-01T12:00+0000",
        "iam_id": "IBMid-1234",
        "iam_id_account": "A",
        "action": "create",
        "params": ["ci-key"],
        "message": "created"
    }]);

    Mock::given(method("GET"))
        .and(path("/v1/apikeys/k1"))
        .and(query_param("include_history", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let opts = GetApiKeyOptions {
        include_history: Some(true),
        ..GetApiKeyOptions::new("k1")
    };
    let key = client.get_api_key(&opts).await.unwrap().into_result().unwrap();
    assert_eq!(key.history.len(), 1);
    assert_eq!(key.history[0].action, "create");
}

#[tokio::test]
async fn test_update_api_key_partial_body_with_if_match() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/apikeys/k1"))
        .and(header("If-Match", "1-abc"))
        .and(body_json(json!({"description": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_key_body("k1")))
        .mount(&server)
        .await;

    let opts = UpdateApiKeyOptions {
        description: Some(String::new()),
        ..UpdateApiKeyOptions::new("k1", "1-abc")
    };
    client.update_api_key(&opts).await.unwrap();
}

#[tokio::test]
async fn test_update_api_key_stale_revision_is_service_error() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/apikeys/k1"))
        .respond_with(ResponseTemplate::new(412).set_body_json(json!({
            "errorCode": "BXNIM0509E",
            "errorMessage": "Entity tag does not match",
            "context": {"transaction_id": "tx"}
        })))
        .mount(&server)
        .await;

    let err = client
        .update_api_key(&UpdateApiKeyOptions::new("k1", "stale"))
        .await
        .unwrap_err();
    assert!(err.is_precondition_failed());
    assert_eq!(err.api_error_code(), Some("BXNIM0509E"));
    assert_eq!(err.response().unwrap().status.as_u16(), 412);
}

#[tokio::test]
async fn test_lock_unlock_and_delete_api_key_return_no_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/apikeys/k1/lock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/apikeys/k1/lock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/apikeys/k1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let opts = ApiKeyIdOptions::new("k1");
    assert!(client.lock_api_key(&opts).await.unwrap().result.is_none());
    assert!(client.unlock_api_key(&opts).await.unwrap().result.is_none());
    let resp = client.delete_api_key(&opts).await.unwrap();
    assert_eq!(resp.status.as_u16(), 204);
}

// ── Service IDs ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_service_ids_uses_trailing_slash() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/serviceids/"))
        .and(query_param("name", "builder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serviceids": [service_id_body("s1")]
        })))
        .mount(&server)
        .await;

    let opts = ListServiceIdsOptions {
        name: Some("builder".into()),
        ..Default::default()
    };
    let list = client.list_service_ids(&opts).await.unwrap().into_result().unwrap();
    assert_eq!(
        list.serviceids[0].apikey.as_ref().map(|k| k.id.as_str()),
        Some("key-of-service-id")
    );
    assert_eq!(list.next_pagetoken(), None);
}

#[tokio::test]
async fn test_create_service_id_with_nested_api_key() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/serviceids/"))
        .and(body_json(json!({
            "account_id": "A",
            "name": "builder",
            "apikey": {"name": "builder-key", "store_value": false}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(service_id_body("s1")))
        .mount(&server)
        .await;

    let opts = CreateServiceIdOptions {
        apikey: Some(ApiKeyInsideCreateServiceIdRequest {
            name: "builder-key".into(),
            store_value: Some(false),
            ..Default::default()
        }),
        ..CreateServiceIdOptions::new("A", "builder")
    };
    let sid = client.create_service_id(&opts).await.unwrap().into_result().unwrap();
    assert!(sid.locked);
    assert_eq!(sid.unique_instance_crns, vec!["crn:v1:instance".to_owned()]);
}

#[tokio::test]
async fn test_update_service_id_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/serviceids/s1"))
        .and(header("If-Match", "*"))
        .and(body_json(json!({"unique_instance_crns": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_id_body("s1")))
        .mount(&server)
        .await;

    let opts = UpdateServiceIdOptions {
        unique_instance_crns: Some(Vec::new()),
        ..UpdateServiceIdOptions::new("s1", "*")
    };
    client.update_service_id(&opts).await.unwrap();
}

#[tokio::test]
async fn test_lock_service_id_decodes_body_when_present() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/serviceids/s1/lock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_id_body("s1")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/serviceids/s1/lock"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let opts = ServiceIdIdOptions::new("s1");
    let locked = client.lock_service_id(&opts).await.unwrap();
    assert!(locked.result.unwrap().locked);

    let unlocked = client.unlock_service_id(&opts).await.unwrap();
    assert_eq!(unlocked.status.as_u16(), 204);
    assert!(matches!(
        unlocked.into_result(),
        Err(Error::EmptyBody { status: 204 })
    ));
}

// ── Key value omitted ───────────────────────────────────────────────

#[tokio::test]
async fn test_get_decodes_bodies_without_key_value() {
    let (server, client) = setup().await;

    let mut key = api_key_body("k1");
    key.as_object_mut().unwrap().remove("apikey");
    let mut sid = service_id_body("s1");
    sid.as_object_mut().unwrap().remove("apikey");

    Mock::given(method("GET"))
        .and(path("/v1/apikeys/k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&key))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/serviceids/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&sid))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/apikeys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"apikeys": [key]})))
        .mount(&server)
        .await;

    let got = client
        .get_api_key(&GetApiKeyOptions::new("k1"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(got.id, "k1");
    assert_eq!(got.apikey, None);

    let got = client
        .get_service_id(&GetServiceIdOptions::new("s1"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(got.name, "builder");
    assert!(got.apikey.is_none());

    let list = client
        .list_api_keys(&ListApiKeysOptions::default())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(list.apikeys.len(), 1);
    assert_eq!(list.apikeys[0].apikey, None);
}
