// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end gateway tests over the full in-process pipeline.
//!
//! Each test builds an isolated router backed by mock transport and
//! storage; requests go through `tower::ServiceExt::oneshot` exactly as
//! axum would serve them.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use ndira_config::model::BrandingConfig;
use ndira_dispatch::{DispatchQueue, RetryPolicy};
use ndira_gateway::{build_router, GatewayState};
use ndira_notify::Notifier;
use ndira_store::ArtifactPublisher;
use ndira_test_utils::{MockObjectStore, MockTransport, SendKind};
use ndira_transport::{ConnectionMonitor, RecipientResolver, RegionRules, TransportEvent};

struct Harness {
    router: axum::Router,
    transport: Arc<MockTransport>,
    monitor: ConnectionMonitor,
}

fn harness(send_delay: Duration) -> Harness {
    let transport = Arc::new(MockTransport::new().with_send_delay(send_delay));
    let store = Arc::new(MockObjectStore::new());
    let monitor = ConnectionMonitor::new();

    let notifier = Notifier::new(
        monitor.clone(),
        transport.clone(),
        RecipientResolver::new(
            transport.clone(),
            RegionRules {
                country_code: "263".into(),
                trunk_prefix: "0".into(),
            },
        ),
        ArtifactPublisher::new(store.clone()),
        DispatchQueue::new(Duration::from_millis(1), None),
        RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
        },
        BrandingConfig::default(),
    );

    let router = build_router(GatewayState::new(Arc::new(notifier)));
    Harness {
        router,
        transport,
        monitor,
    }
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn message_while_disconnected_returns_503() {
    let h = harness(Duration::ZERO);

    let response = h
        .router
        .oneshot(post(
            "/api/notify/send",
            json!({"type": "message", "phone": "0775123456", "message": "Hello"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response).await;
    assert_eq!(body["error"], "WhatsApp client is not connected");
}

#[tokio::test]
async fn receipt_while_connected_returns_sale_number_and_artifact_url() {
    let h = harness(Duration::ZERO);
    h.monitor.apply(&TransportEvent::Connected);
    h.transport.register("263775123456").await;

    let response = h
        .router
        .oneshot(post(
            "/api/receipt/send",
            json!({
                "type": "receipt",
                "phone": "+263775123456",
                "receipt": {
                    "products": [{"name": "Case", "price": "10"}],
                    "revenue": 10
                }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["mode"], "receipt");
    assert_eq!(body["recipient"], "263775123456@c.us");

    let sale_number = body["saleNumber"].as_str().expect("saleNumber present");
    assert_eq!(sale_number.len(), 8);
    assert_eq!(sale_number, sale_number.to_ascii_uppercase());
    assert!(body["artifactUrl"].as_str().unwrap().contains("receipts/"));

    let sends = h.transport.sent().await;
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0].kind, SendKind::Text);
    assert_eq!(sends[1].kind, SendKind::Media);
}

#[tokio::test]
async fn empty_message_returns_400_with_field_error() {
    let h = harness(Duration::ZERO);

    let response = h
        .router
        .oneshot(post(
            "/api/notify/send",
            json!({"phone": "123", "message": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "message is required for message mode");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_succeed_without_overlapping() {
    let h = harness(Duration::from_millis(25));
    h.monitor.apply(&TransportEvent::Connected);
    h.transport.register("263775123456").await;
    h.transport.register("263712345678").await;

    let first = h.router.clone().oneshot(post(
        "/send-message",
        json!({"phone": "0775123456", "message": "first"}),
    ));
    let second = h.router.clone().oneshot(post(
        "/send-message",
        json!({"phone": "0712345678", "message": "second"}),
    ));

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().status(), StatusCode::OK);
    assert_eq!(second.unwrap().status(), StatusCode::OK);

    let sends = h.transport.sent().await;
    assert_eq!(sends.len(), 2);
    for pair in sends.windows(2) {
        assert!(
            pair[1].started_at >= pair[0].finished_at,
            "transport sends overlapped in time"
        );
    }
}

#[tokio::test]
async fn send_message_aliases_serve_the_same_handler() {
    let h = harness(Duration::ZERO);
    h.monitor.apply(&TransportEvent::Connected);
    h.transport.register("263775123456").await;

    for path in ["/api/whatsapp/send", "/send-message"] {
        let response = h
            .router
            .clone()
            .oneshot(post(
                path,
                json!({"phone": "0775123456", "message": "Hello"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        let body = response_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["chatId"], "263775123456@c.us");
    }
}

#[tokio::test]
async fn send_message_requires_phone() {
    let h = harness(Duration::ZERO);
    h.monitor.apply(&TransportEvent::Connected);

    let response = h
        .router
        .oneshot(post("/api/whatsapp/send", json!({"message": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("phone"));
}

#[tokio::test]
async fn unregistered_number_returns_400_with_both_forms() {
    let h = harness(Duration::ZERO);
    h.monitor.apply(&TransportEvent::Connected);

    let response = h
        .router
        .oneshot(post(
            "/send-message",
            json!({"phone": "0712000000", "message": "Hello"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("0712000000"));
    assert!(error.contains("263712000000"));
}

#[tokio::test]
async fn status_endpoint_tracks_connection_lifecycle() {
    let h = harness(Duration::ZERO);

    let response = h
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/whatsapp/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["ready"], false);
    assert_eq!(body["hasPendingCode"], false);

    h.monitor
        .apply(&TransportEvent::PairingCode("ABCD-1234".into()));
    let body = response_json(
        h.router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/whatsapp/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["ready"], false);
    assert_eq!(body["hasPendingCode"], true);

    h.monitor.apply(&TransportEvent::Connected);
    let body = response_json(
        h.router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/whatsapp/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["hasPendingCode"], false);
}
