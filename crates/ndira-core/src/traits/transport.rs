// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging transport trait: the interface boundary to the stateful
//! WhatsApp connection.
//!
//! The underlying client cannot process more than one outbound operation at
//! a time; implementations are only ever driven from inside the serialized
//! dispatch queue's task bodies.

use async_trait::async_trait;

use crate::error::NdiraError;
use crate::types::ChatHandle;

/// Outbound operations against the messaging transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a plain text message to a resolved chat handle.
    async fn send_text(&self, handle: &ChatHandle, body: &str) -> Result<(), NdiraError>;

    /// Sends a media attachment (by public URL) with a caption.
    async fn send_media(
        &self,
        handle: &ChatHandle,
        media_url: &str,
        caption: &str,
        file_name: &str,
    ) -> Result<(), NdiraError>;

    /// Looks a normalized phone number up on the messaging network.
    ///
    /// Returns the canonical serialized handle, or `None` when the number
    /// has no registered account.
    async fn lookup_number(&self, number: &str) -> Result<Option<ChatHandle>, NdiraError>;
}
