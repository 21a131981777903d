// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the notification endpoints.
//!
//! Handles GET /api/whatsapp/status, POST /api/whatsapp/send (and its
//! /send-message alias), and POST /api/receipt/send (aliased as
//! /api/notify/send).

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use ndira_core::{short_uid, NdiraError, NotifyMode};

use crate::server::GatewayState;

/// Response body for GET /api/whatsapp/status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Whether the transport session is ready for sends.
    pub ready: bool,
    /// Whether a pairing handshake is outstanding.
    pub has_pending_code: bool,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
}

/// Request body for the simple send endpoints.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body for the simple send endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub chat_id: String,
}

/// Response body for the flexible notify endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub success: bool,
    pub mode: NotifyMode,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,
}

/// Error response body; never leaks more than the message and a logged
/// correlation id.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper mapping [`NdiraError`] onto HTTP responses.
pub struct ApiError(pub NdiraError);

impl From<NdiraError> for ApiError {
    fn from(err: NdiraError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let correlation = short_uid();
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error!(
            correlation = %correlation,
            status = %status,
            error = %self.0,
            "notification request failed"
        );
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// GET /api/whatsapp/status
pub async fn get_status(State(state): State<GatewayState>) -> Json<StatusResponse> {
    let monitor = state.notifier.monitor();
    Json(StatusResponse {
        ready: monitor.is_ready(),
        has_pending_code: monitor.pairing_code().is_some(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /api/whatsapp/send and POST /send-message
pub async fn post_send_message(
    State(state): State<GatewayState>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let handle = state
        .notifier
        .send_plain(
            body.phone.as_deref().unwrap_or(""),
            body.message.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(SendMessageResponse {
        success: true,
        chat_id: handle.0,
    }))
}

/// POST /api/receipt/send and POST /api/notify/send
pub async fn post_notify(
    State(state): State<GatewayState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<NotifyResponse>, ApiError> {
    let outcome = state.notifier.notify(&body).await?;

    Ok(Json(NotifyResponse {
        success: true,
        mode: outcome.mode,
        recipient: outcome.recipient.0,
        sale_number: outcome.sale_number,
        artifact_url: outcome.artifact_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_uses_camel_case_keys() {
        let resp = StatusResponse {
            ready: false,
            has_pending_code: true,
            uptime_secs: 7,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"hasPendingCode\":true"));
        assert!(json.contains("\"uptimeSecs\":7"));
    }

    #[test]
    fn notify_response_omits_absent_optionals() {
        let resp = NotifyResponse {
            success: true,
            mode: NotifyMode::Message,
            recipient: "263775123456@c.us".into(),
            sale_number: None,
            artifact_url: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("saleNumber"));
        assert!(!json.contains("artifactUrl"));
        assert!(json.contains("\"mode\":\"message\""));
    }

    #[test]
    fn notify_response_includes_receipt_fields_when_present() {
        let resp = NotifyResponse {
            success: true,
            mode: NotifyMode::Receipt,
            recipient: "263775123456@c.us".into(),
            sale_number: Some("A1B2C3D4".into()),
            artifact_url: Some("https://cdn.test/receipts/1-r.pdf".into()),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"saleNumber\":\"A1B2C3D4\""));
        assert!(json.contains("\"artifactUrl\""));
    }

    #[test]
    fn send_message_request_tolerates_missing_fields() {
        let req: SendMessageRequest = serde_json::from_str("{}").unwrap();
        assert!(req.phone.is_none());
        assert!(req.message.is_none());
    }

    #[test]
    fn error_response_serializes_bare_message() {
        let resp = ErrorResponse {
            error: "WhatsApp client is not connected".into(),
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"error":"WhatsApp client is not connected"}"#
        );
    }
}
