// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification orchestration.
//!
//! Ties the whole pipeline together per request: normalize, readiness gate,
//! recipient resolution, render + publish for receipts, then the serialized
//! queue with retried transport sends. Pre-queue steps of concurrent
//! requests may interleave freely; only the final sends are serialized.

use std::sync::Arc;

use tracing::{debug, info};

use ndira_config::model::BrandingConfig;
use ndira_core::{ChatHandle, NdiraError, NotifyMode, Transport};
use ndira_dispatch::{with_retry, DispatchQueue, RetryPolicy};
use ndira_receipt::render_receipt;
use ndira_store::ArtifactPublisher;
use ndira_transport::{ConnectionMonitor, RecipientResolver};

use crate::normalize::{normalize_request, NotifyRequest};

/// Successful notification result, reported back to the HTTP caller.
#[derive(Debug, Clone)]
pub struct NotifyOutcome {
    pub mode: NotifyMode,
    pub recipient: ChatHandle,
    pub sale_number: Option<String>,
    pub artifact_url: Option<String>,
}

/// The orchestrating notification service.
///
/// There is no partial-success surface: if the text send lands but the
/// media send fails, the whole request fails even though a message may
/// already have reached the recipient (at-least-once, possibly partial).
pub struct Notifier {
    monitor: ConnectionMonitor,
    transport: Arc<dyn Transport>,
    resolver: RecipientResolver,
    publisher: ArtifactPublisher,
    queue: DispatchQueue,
    retry: RetryPolicy,
    branding: BrandingConfig,
}

impl Notifier {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        monitor: ConnectionMonitor,
        transport: Arc<dyn Transport>,
        resolver: RecipientResolver,
        publisher: ArtifactPublisher,
        queue: DispatchQueue,
        retry: RetryPolicy,
        branding: BrandingConfig,
    ) -> Self {
        Self {
            monitor,
            transport,
            resolver,
            publisher,
            queue,
            retry,
            branding,
        }
    }

    /// The connection monitor backing the status endpoint.
    pub fn monitor(&self) -> &ConnectionMonitor {
        &self.monitor
    }

    /// Handle a flexible notification body end to end.
    pub async fn notify(&self, body: &serde_json::Value) -> Result<NotifyOutcome, NdiraError> {
        let today = chrono::Utc::now().date_naive();
        let request = normalize_request(body, &self.branding.file_prefix, today)?;

        // Fail fast before any network work.
        if !self.monitor.is_ready() {
            return Err(NdiraError::NotConnected);
        }

        match request {
            NotifyRequest::Message(message) => {
                let handle = self.resolver.resolve(&message.recipient_raw).await?;
                self.send_text_queued(handle.clone(), message.body).await?;
                info!(recipient = %handle, "message notification delivered");
                Ok(NotifyOutcome {
                    mode: NotifyMode::Message,
                    recipient: handle,
                    sale_number: None,
                    artifact_url: None,
                })
            }
            NotifyRequest::Receipt(request) => {
                let handle = self.resolver.resolve(&request.recipient_raw).await?;

                let artifact = if request.send_pdf {
                    let bytes = render_receipt(&request.receipt, &self.branding, today)?;
                    let artifact = self
                        .publisher
                        .publish(bytes, &request.file_name, &request.receipt.sale_number)
                        .await?;
                    Some(artifact)
                } else {
                    debug!(
                        sale_number = %request.receipt.sale_number,
                        "pdf disabled by caller, sending text only"
                    );
                    None
                };

                let transport = self.transport.clone();
                let retry = self.retry.clone();
                let send_handle = handle.clone();
                let text = request.body.clone();
                let media = artifact
                    .as_ref()
                    .map(|a| (a.public_url.clone(), request.caption.clone(), request.file_name.clone()));

                // One queued task sends the text and then the media, each
                // independently retried, so nothing interleaves between them.
                self.queue
                    .enqueue(move || async move {
                        with_retry(&retry, "send_text", || {
                            transport.send_text(&send_handle, &text)
                        })
                        .await?;

                        if let Some((url, caption, file_name)) = &media {
                            with_retry(&retry, "send_media", || {
                                transport.send_media(&send_handle, url, caption, file_name)
                            })
                            .await?;
                        }
                        Ok(())
                    })
                    .await?;

                info!(
                    recipient = %handle,
                    sale_number = %request.receipt.sale_number,
                    "receipt notification delivered"
                );
                Ok(NotifyOutcome {
                    mode: NotifyMode::Receipt,
                    recipient: handle,
                    sale_number: Some(request.receipt.sale_number.clone()),
                    artifact_url: artifact.map(|a| a.public_url),
                })
            }
        }
    }

    /// Handle the simple `{phone, message}` endpoint shape.
    pub async fn send_plain(&self, phone: &str, message: &str) -> Result<ChatHandle, NdiraError> {
        if phone.trim().is_empty() {
            return Err(NdiraError::BadRequest("phone is required".into()));
        }
        if message.trim().is_empty() {
            return Err(NdiraError::BadRequest("message is required".into()));
        }
        if !self.monitor.is_ready() {
            return Err(NdiraError::NotConnected);
        }

        let handle = self.resolver.resolve(phone).await?;
        self.send_text_queued(handle.clone(), message.to_string())
            .await?;
        Ok(handle)
    }

    async fn send_text_queued(&self, handle: ChatHandle, body: String) -> Result<(), NdiraError> {
        let transport = self.transport.clone();
        let retry = self.retry.clone();
        self.queue
            .enqueue(move || async move {
                with_retry(&retry, "send_text", || transport.send_text(&handle, &body)).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndira_test_utils::{MockObjectStore, MockTransport, SendKind};
    use serde_json::json;
    use std::time::Duration;
    use ndira_transport::{RegionRules, TransportEvent};

    struct Harness {
        notifier: Notifier,
        transport: Arc<MockTransport>,
        store: Arc<MockObjectStore>,
    }

    fn harness(connected: bool) -> Harness {
        let transport = Arc::new(MockTransport::new());
        let store = Arc::new(MockObjectStore::new());
        let monitor = ConnectionMonitor::new();
        if connected {
            monitor.apply(&TransportEvent::Connected);
        }

        let notifier = Notifier::new(
            monitor,
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

        Harness {
            notifier,
            transport,
            store,
        }
    }

    #[tokio::test]
    async fn plain_message_flows_through_queue_and_transport() {
        let h = harness(true);
        h.transport.register("263775123456").await;

        let handle = h.notifier.send_plain("0775123456", "Hello").await.unwrap();
        assert_eq!(handle.0, "263775123456@c.us");

        let sends = h.transport.sent().await;
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].kind, SendKind::Text);
        assert_eq!(sends[0].content, "Hello");
    }

    #[tokio::test]
    async fn not_connected_fails_before_any_lookup() {
        let h = harness(false);
        let err = h
            .notifier
            .notify(&json!({"phone": "0775123456", "message": "Hello"}))
            .await
            .unwrap_err();

        assert!(matches!(err, NdiraError::NotConnected));
        assert!(h.transport.lookups().await.is_empty());
    }

    #[tokio::test]
    async fn validation_errors_win_over_connection_state() {
        // The state machine validates before the readiness gate.
        let h = harness(false);
        let err = h
            .notifier
            .notify(&json!({"phone": "123", "message": ""}))
            .await
            .unwrap_err();
        assert!(matches!(err, NdiraError::BadRequest(_)));
    }

    #[tokio::test]
    async fn receipt_renders_publishes_then_sends_text_and_media() {
        let h = harness(true);
        h.transport.register("263775123456").await;

        let outcome = h
            .notifier
            .notify(&json!({
                "phone": "0775123456",
                "receipt": {
                    "products": [{"name": "Case", "price": "10"}],
                    "revenue": 10
                }
            }))
            .await
            .unwrap();

        assert_eq!(outcome.mode, NotifyMode::Receipt);
        let sale = outcome.sale_number.expect("generated sale number");
        assert_eq!(sale.len(), 8);
        let url = outcome.artifact_url.expect("artifact url");
        assert!(url.contains("receipts/"));
        assert!(url.ends_with(&format!("ACCESSORIES-WORLD-{sale}.pdf")));

        assert_eq!(h.store.object_count().await, 1);
        let sends = h.transport.sent().await;
        assert_eq!(sends.len(), 2);
        assert_eq!(sends[0].kind, SendKind::Text);
        assert_eq!(sends[1].kind, SendKind::Media);
        assert_eq!(sends[1].media_url.as_deref(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn send_pdf_false_skips_render_and_upload() {
        let h = harness(true);
        h.transport.register("263775123456").await;

        let outcome = h
            .notifier
            .notify(&json!({
                "phone": "0775123456",
                "sendPdf": false,
                "receipt": {
                    "products": [{"name": "Case", "price": "10"}],
                    "revenue": 10
                }
            }))
            .await
            .unwrap();

        assert!(outcome.artifact_url.is_none());
        assert!(outcome.sale_number.is_some());
        assert_eq!(h.store.object_count().await, 0);
        assert_eq!(h.transport.sent_count().await, 1);
    }

    #[tokio::test]
    async fn unregistered_recipient_fails_before_render() {
        let h = harness(true);
        let err = h
            .notifier
            .notify(&json!({
                "phone": "0712000000",
                "receipt": {
                    "products": [{"name": "Case", "price": "10"}],
                    "revenue": 10
                }
            }))
            .await
            .unwrap_err();

        assert!(matches!(err, NdiraError::RecipientInvalid { .. }));
        assert_eq!(h.store.object_count().await, 0);
        assert_eq!(h.transport.sent_count().await, 0);
    }

    #[tokio::test]
    async fn transient_text_failure_is_retried_within_the_task() {
        let h = harness(true);
        h.transport.register("263775123456").await;
        h.transport.fail_next_text_sends(1);

        h.notifier.send_plain("0775123456", "Hello").await.unwrap();
        assert_eq!(h.transport.text_attempts(), 2);
        assert_eq!(h.transport.sent_count().await, 1);
    }

    #[tokio::test]
    async fn media_failure_fails_the_whole_request_after_text_delivery() {
        let h = harness(true);
        h.transport.register("263775123456").await;
        // More failures than max_retries + 1 attempts.
        h.transport.fail_next_media_sends(10);

        let err = h
            .notifier
            .notify(&json!({
                "phone": "0775123456",
                "receipt": {
                    "products": [{"name": "Case", "price": "10"}],
                    "revenue": 10
                }
            }))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        // The text went out before the media send gave up: accepted
        // at-least-once, possibly-partial delivery.
        let sends = h.transport.sent().await;
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].kind, SendKind::Text);
        assert_eq!(h.transport.media_attempts(), 3);
    }

    #[tokio::test]
    async fn upload_failure_rejects_before_any_send() {
        let h = harness(true);
        h.transport.register("263775123456").await;
        h.store.fail_uploads(true);

        let err = h
            .notifier
            .notify(&json!({
                "phone": "0775123456",
                "receipt": {
                    "products": [{"name": "Case", "price": "10"}],
                    "revenue": 10
                }
            }))
            .await
            .unwrap_err();

        assert!(matches!(err, NdiraError::Upload { .. }));
        assert_eq!(h.transport.sent_count().await, 0);
    }
}
