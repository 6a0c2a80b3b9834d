//! Integration tests for RemoteCatalogClient
//!
//! These tests use httpmock to simulate the catalog's client app endpoints

use std::sync::Arc;
use std::time::Duration;

use client_app_registry::{
    CatalogConfig, CatalogError, ClientAppCatalog, ProtocolType, ReadinessGate,
    RemoteCatalogClient,
};
use httpmock::prelude::*;
use serde_json::json;

fn config(base_url: String) -> CatalogConfig {
    CatalogConfig {
        base_url,
        auth_token: Some("test-token".to_owned()),
        timeout_secs: 1,
        connect_timeout_secs: 1,
        health_path: "/health".to_owned(),
        bootstrap_retry_interval_ms: 20,
    }
}

fn client(server: &MockServer) -> RemoteCatalogClient {
    RemoteCatalogClient::new(&config(server.base_url()), ReadinessGate::new()).unwrap()
}

fn oidc_record(id: i64, name: &str) -> serde_json::Value {
    json!({
        "type": "OIDCRP",
        "id": id,
        "name": name,
        "clientId": format!("{name}-client"),
        "redirectUris": [format!("https://{name}.example.com/cb")]
    })
}

#[tokio::test]
async fn test_list_preserves_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wa/clientApps")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!([
                {"type": "CASSP", "id": 3, "name": "portal", "serviceId": "https://portal/.*"},
                oidc_record(1, "app1"),
                {"type": "SAML2SP", "id": 2, "name": "sp", "entityId": "urn:sp"}
            ]));
        })
        .await;

    let apps = client(&server).list().await.unwrap();

    let ids: Vec<i64> = apps.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(apps[1].protocol_type(), ProtocolType::OidcRp);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_by_id_sends_type_filter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wa/clientApps/42")
                .query_param("type", "OIDCRP");
            then.status(200).json_body(oidc_record(42, "app1"));
        })
        .await;

    let app = client(&server)
        .get_by_id(42, Some(ProtocolType::OidcRp))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(app.id, 42);
    assert_eq!(app.name, "app1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_by_name() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/wa/clientApps/byName/app1");
            then.status(200).json_body(oidc_record(42, "app1"));
        })
        .await;

    let app = client(&server).get_by_name("app1", None).await.unwrap();

    assert_eq!(app.map(|a| a.id), Some(42));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_is_absent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wa/clientApps/404");
            then.status(404);
        })
        .await;

    let app = client(&server).get_by_id(404, None).await.unwrap();
    assert!(app.is_none());
}

#[tokio::test]
async fn test_server_error_maps_to_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wa/clientApps");
            then.status(500).body("boom");
        })
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::Http {
            status: 500,
            body: "boom".to_owned()
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_invalid_json_maps_to_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wa/clientApps/1");
            then.status(200).body("not json");
        })
        .await;

    let err = client(&server).get_by_id(1, None).await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unknown_protocol_tag_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wa/clientApps");
            then.status(200).json_body(json!([
                oidc_record(1, "app1"),
                {"type": "WSFED", "id": 2, "name": "legacy"}
            ]));
        })
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::UnsupportedProtocol {
            tag: "WSFED".to_owned()
        }
    );
}

#[tokio::test]
async fn test_record_without_protocol_type_is_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wa/clientApps/9");
            then.status(200).json_body(json!({"id": 9, "name": "untagged"}));
        })
        .await;

    let err = client(&server).get_by_id(9, None).await.unwrap_err();
    assert!(
        matches!(err, CatalogError::InvalidResponse(_)),
        "expected invalid response, got {err:?}"
    );
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wa/clientApps");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!([]));
        })
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn test_connection_refused() {
    let client =
        RemoteCatalogClient::new(&config("http://127.0.0.1:1".to_owned()), ReadinessGate::new())
            .unwrap();

    let err = client.list().await.unwrap_err();
    assert!(err.is_connection(), "expected connection error, got {err:?}");
}

#[tokio::test]
async fn test_bootstrap_once_marks_ready_on_success() {
    let server = MockServer::start_async().await;
    let client = client(&server);

    // No health mock yet: httpmock answers 404.
    assert!(!client.bootstrap_once().await);
    assert!(!client.is_ready());

    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;

    assert!(client.bootstrap_once().await);
    assert!(client.is_ready());
}

#[tokio::test]
async fn test_bootstrap_retries_until_ready() {
    let server = MockServer::start_async().await;
    let mut unhealthy = server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(503);
        })
        .await;

    let client = Arc::new(client(&server));
    let readiness = client.readiness();
    let handle = client.start_bootstrap(&tokio::runtime::Handle::current());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!readiness.is_ready());
    assert!(!handle.is_finished());

    unhealthy.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;

    tokio::time::timeout(Duration::from_secs(5), handle.finished())
        .await
        .expect("bootstrap should finish once the catalog is healthy");
    assert!(readiness.is_ready());
}

#[tokio::test]
async fn test_dropping_bootstrap_handle_stops_probe() {
    let client = Arc::new(
        RemoteCatalogClient::new(&config("http://127.0.0.1:1".to_owned()), ReadinessGate::new())
            .unwrap(),
    );

    let handle = client.start_bootstrap(&tokio::runtime::Handle::current());
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(handle);

    // The task holds the only other strong reference; it ends once cancelled.
    tokio::time::timeout(Duration::from_secs(5), async {
        while Arc::strong_count(&client) > 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("bootstrap task should stop after the handle is dropped");
    assert!(!client.is_ready());
}

#[tokio::test]
async fn test_stop_returns_while_catalog_is_unreachable() {
    let client = Arc::new(
        RemoteCatalogClient::new(&config("http://127.0.0.1:1".to_owned()), ReadinessGate::new())
            .unwrap(),
    );

    let handle = client.start_bootstrap(&tokio::runtime::Handle::current());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_finished());

    tokio::time::timeout(Duration::from_secs(5), handle.stop())
        .await
        .expect("stop should cancel the probe");
    assert!(!client.is_ready());
    assert_eq!(Arc::strong_count(&client), 1);
}
