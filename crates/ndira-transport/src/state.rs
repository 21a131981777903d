// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection state tracker.
//!
//! Holds the single readiness flag and pending pairing code for the
//! transport session. The monitor is injectable and cheap to clone; every
//! request handler reads it, only the lifecycle listener writes it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::TransportEvent;

/// Snapshot of the transport session state.
///
/// Invariant: `pairing_code` is always `None` while `ready` is true. Both
/// fields are replaced together in one `watch` update, so the invariant
/// can never be observed broken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    /// True once the transport session is authenticated and usable.
    pub ready: bool,
    /// Present only while a pairing/QR handshake is outstanding.
    pub pairing_code: Option<String>,
}

/// Shared tracker for the transport connection lifecycle.
///
/// Created at process start as not-ready with no pairing code; lives for
/// the process lifetime.
#[derive(Clone)]
pub struct ConnectionMonitor {
    state: Arc<watch::Sender<ConnectionState>>,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMonitor {
    /// Create a monitor in the initial not-ready state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ConnectionState::default());
        Self {
            state: Arc::new(tx),
        }
    }

    /// Whether the transport session is authenticated and usable.
    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    /// The pending pairing code, if a handshake is outstanding.
    pub fn pairing_code(&self) -> Option<String> {
        self.state.borrow().pairing_code.clone()
    }

    /// Subscribe to state transitions (used by tests and the serve loop).
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Apply a lifecycle event, logging the transition.
    ///
    /// An auth failure never crashes the process; it leaves the session
    /// not-ready so downstream sends fail fast with a clear error.
    pub fn apply(&self, event: &TransportEvent) {
        match event {
            TransportEvent::Connected => {
                info!("whatsapp session ready");
                self.state.send_replace(ConnectionState {
                    ready: true,
                    pairing_code: None,
                });
            }
            TransportEvent::Disconnected { reason } => {
                warn!(reason = %reason, "whatsapp session disconnected");
                self.state.send_replace(ConnectionState {
                    ready: false,
                    pairing_code: None,
                });
            }
            TransportEvent::PairingCode(code) => {
                info!("pairing code issued, waiting for device link");
                self.state.send_replace(ConnectionState {
                    ready: false,
                    pairing_code: Some(code.clone()),
                });
            }
            TransportEvent::AuthFailure { message } => {
                error!(message = %message, "whatsapp authentication failed");
                self.state.send_replace(ConnectionState {
                    ready: false,
                    pairing_code: None,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready_without_pairing_code() {
        let monitor = ConnectionMonitor::new();
        assert!(!monitor.is_ready());
        assert!(monitor.pairing_code().is_none());
    }

    #[test]
    fn connected_sets_ready_and_clears_pairing_code() {
        let monitor = ConnectionMonitor::new();
        monitor.apply(&TransportEvent::PairingCode("ABCD-1234".into()));
        assert_eq!(monitor.pairing_code().as_deref(), Some("ABCD-1234"));
        assert!(!monitor.is_ready());

        monitor.apply(&TransportEvent::Connected);
        assert!(monitor.is_ready());
        assert!(monitor.pairing_code().is_none());
    }

    #[test]
    fn ready_and_pairing_code_are_mutually_exclusive() {
        let monitor = ConnectionMonitor::new();
        let events = [
            TransportEvent::PairingCode("AAAA-0000".into()),
            TransportEvent::Connected,
            TransportEvent::Disconnected {
                reason: "stream error".into(),
            },
            TransportEvent::PairingCode("BBBB-1111".into()),
            TransportEvent::AuthFailure {
                message: "logged out".into(),
            },
            TransportEvent::Connected,
        ];
        for event in &events {
            monitor.apply(event);
            assert!(
                !(monitor.is_ready() && monitor.pairing_code().is_some()),
                "invariant broken after {event:?}"
            );
        }
    }

    #[test]
    fn auth_failure_leaves_session_not_ready() {
        let monitor = ConnectionMonitor::new();
        monitor.apply(&TransportEvent::Connected);
        monitor.apply(&TransportEvent::AuthFailure {
            message: "device unlinked".into(),
        });
        assert!(!monitor.is_ready());
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let monitor = ConnectionMonitor::new();
        let mut rx = monitor.subscribe();

        monitor.apply(&TransportEvent::Connected);
        rx.changed().await.unwrap();
        assert!(rx.borrow().ready);
    }
}
