// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request normalization and notification orchestration for the Ndira
//! notification agent.
//!
//! [`normalize`] turns the flexible caller-facing JSON shapes into the two
//! canonical request variants; [`service::Notifier`] drives each request
//! through resolution, rendering, publishing, and the serialized dispatch
//! lane.

pub mod normalize;
pub mod service;

pub use normalize::{
    normalize_message, normalize_receipt, normalize_request, resolve_mode, resolve_recipient,
    MessageRequest, NotifyRequest, ReceiptRequest,
};
pub use service::{Notifier, NotifyOutcome};
