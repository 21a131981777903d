// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp transport layer for the Ndira notification agent.
//!
//! Implements [`ndira_core::Transport`] against a headless WhatsApp bridge
//! sidecar (HTTP for sends and number lookup, WebSocket for connection
//! lifecycle events), and provides the connection state tracker, MSISDN
//! normalization, and the recipient resolver built on top of it.

pub mod bridge;
pub mod phone;
pub mod resolver;
pub mod state;

pub use bridge::{spawn_lifecycle_listener, BridgeTransport};
pub use resolver::{RecipientResolver, RegionRules};
pub use state::{ConnectionMonitor, ConnectionState};

/// Connection lifecycle signals emitted by the transport session.
///
/// These are externally driven events; the agent never retries them, it
/// only tracks the latest state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The session is authenticated and usable.
    Connected,
    /// The session dropped; sends will fail until reconnected.
    Disconnected { reason: String },
    /// A pairing/QR handshake is outstanding with this code.
    PairingCode(String),
    /// Authentication failed; the session stays unusable.
    AuthFailure { message: String },
}
