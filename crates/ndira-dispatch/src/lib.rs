// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialized dispatch lane and retry primitives for the Ndira agent.
//!
//! The WhatsApp transport cannot process more than one outbound operation
//! at a time. This crate owns that constraint: [`DispatchQueue`] funnels
//! every send through a single worker task, and [`with_retry`] wraps the
//! individual transport calls in bounded exponential backoff.

pub mod queue;
pub mod retry;

pub use queue::{DispatchQueue, PendingSend};
pub use retry::{with_retry, RetryPolicy};
