// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport client for the headless WhatsApp bridge sidecar.
//!
//! Sends and number lookups are HTTP calls against the bridge; connection
//! lifecycle events arrive over a WebSocket and are applied to the
//! [`ConnectionMonitor`]. The bridge owns the session credential cache; to
//! Ndira it is an opaque collaborator.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use ndira_config::model::WhatsappConfig;
use ndira_core::{ChatHandle, NdiraError, Transport};

use crate::state::ConnectionMonitor;
use crate::TransportEvent;

/// Per-request timeout for bridge HTTP calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Cap for the lifecycle socket reconnect backoff.
const RECONNECT_CAP: Duration = Duration::from_secs(30);

/// HTTP transport client against the WhatsApp bridge.
pub struct BridgeTransport {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendTextRequest<'a> {
    chat_id: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMediaRequest<'a> {
    chat_id: &'a str,
    media_url: &'a str,
    caption: &'a str,
    file_name: &'a str,
}

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    number: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    chat_id: Option<String>,
}

impl BridgeTransport {
    /// Create a client for the configured bridge URL.
    pub fn new(config: &WhatsappConfig) -> Result<Self, NdiraError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| NdiraError::Config(format!("failed to build bridge HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.bridge_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Map a non-success bridge response into a transport error.
    async fn check_status(operation: &str, resp: reqwest::Response) -> Result<(), NdiraError> {
        if resp.status().is_success() {
            return Ok(());
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(NdiraError::Transport {
            message: format!("bridge {operation} returned {status}: {body}"),
            source: None,
        })
    }

    fn wrap(operation: &str, err: reqwest::Error) -> NdiraError {
        NdiraError::Transport {
            message: format!("bridge {operation} request failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

#[async_trait]
impl Transport for BridgeTransport {
    async fn send_text(&self, handle: &ChatHandle, body: &str) -> Result<(), NdiraError> {
        let resp = self
            .http
            .post(self.endpoint("api/send-text"))
            .json(&SendTextRequest {
                chat_id: &handle.0,
                body,
            })
            .send()
            .await
            .map_err(|e| Self::wrap("send-text", e))?;
        Self::check_status("send-text", resp).await?;
        debug!(handle = %handle, "text message delivered to bridge");
        Ok(())
    }

    async fn send_media(
        &self,
        handle: &ChatHandle,
        media_url: &str,
        caption: &str,
        file_name: &str,
    ) -> Result<(), NdiraError> {
        let resp = self
            .http
            .post(self.endpoint("api/send-media"))
            .json(&SendMediaRequest {
                chat_id: &handle.0,
                media_url,
                caption,
                file_name,
            })
            .send()
            .await
            .map_err(|e| Self::wrap("send-media", e))?;
        Self::check_status("send-media", resp).await?;
        debug!(handle = %handle, file = file_name, "media message delivered to bridge");
        Ok(())
    }

    async fn lookup_number(&self, number: &str) -> Result<Option<ChatHandle>, NdiraError> {
        let resp = self
            .http
            .post(self.endpoint("api/lookup"))
            .json(&LookupRequest { number })
            .send()
            .await
            .map_err(|e| Self::wrap("lookup", e))?;

        if !resp.status().is_success() {
            return Err(NdiraError::Transport {
                message: format!("bridge lookup returned {}", resp.status()),
                source: None,
            });
        }

        let parsed: LookupResponse = resp.json().await.map_err(|e| Self::wrap("lookup", e))?;
        Ok(parsed.chat_id.map(ChatHandle))
    }
}

/// Lifecycle event as emitted by the bridge over the WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum BridgeEvent {
    Connected,
    Disconnected {
        #[serde(default)]
        reason: String,
    },
    PairingCode {
        code: String,
    },
    AuthFailure {
        message: String,
    },
}

impl From<BridgeEvent> for TransportEvent {
    fn from(event: BridgeEvent) -> Self {
        match event {
            BridgeEvent::Connected => TransportEvent::Connected,
            BridgeEvent::Disconnected { reason } => TransportEvent::Disconnected { reason },
            BridgeEvent::PairingCode { code } => TransportEvent::PairingCode(code),
            BridgeEvent::AuthFailure { message } => TransportEvent::AuthFailure { message },
        }
    }
}

/// Derive the lifecycle WebSocket URL from the bridge base URL.
fn events_url(bridge_url: &str) -> String {
    let base = bridge_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws_base}/api/events")
}

/// Spawn the lifecycle listener task.
///
/// Connects to the bridge's event socket and applies every event to the
/// monitor. A dropped socket marks the session disconnected and reconnects
/// with capped exponential backoff; the task runs for the process lifetime.
pub fn spawn_lifecycle_listener(
    config: &WhatsappConfig,
    monitor: ConnectionMonitor,
) -> tokio::task::JoinHandle<()> {
    let url = events_url(&config.bridge_url);

    tokio::spawn(async move {
        let mut failures = 0u32;
        loop {
            match connect_async(&url).await {
                Ok((mut stream, _)) => {
                    info!(url = %url, "lifecycle socket connected");
                    failures = 0;

                    while let Some(message) = stream.next().await {
                        match message {
                            Ok(Message::Text(text)) => {
                                match serde_json::from_str::<BridgeEvent>(text.as_str()) {
                                    Ok(event) => monitor.apply(&event.into()),
                                    Err(e) => {
                                        warn!(error = %e, "unparseable lifecycle event")
                                    }
                                }
                            }
                            Ok(Message::Close(_)) => break,
                            Ok(_) => {}
                            Err(e) => {
                                warn!(error = %e, "lifecycle socket error");
                                break;
                            }
                        }
                    }

                    monitor.apply(&TransportEvent::Disconnected {
                        reason: "lifecycle socket closed".into(),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "lifecycle socket connect failed");
                }
            }

            let delay =
                (Duration::from_secs(1) * 2u32.saturating_pow(failures)).min(RECONNECT_CAP);
            failures = failures.saturating_add(1);
            tokio::time::sleep(delay).await;
        }
    })
}
