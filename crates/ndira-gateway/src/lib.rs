// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Ndira notification agent.
//!
//! Exposes the status and send endpoints consumed by the rest of the
//! platform, mapping the tagged error taxonomy onto HTTP statuses.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState};
