// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent wiring and serve loop.
//!
//! Builds the transport, monitor, dispatch lane, publisher, and notifier
//! from configuration, then serves the gateway until the process exits.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use ndira_config::NdiraConfig;
use ndira_core::{NdiraError, Transport};
use ndira_dispatch::{DispatchQueue, RetryPolicy};
use ndira_gateway::{start_server, GatewayState};
use ndira_notify::Notifier;
use ndira_store::{ArtifactPublisher, HttpObjectStore};
use ndira_transport::{
    spawn_lifecycle_listener, BridgeTransport, ConnectionMonitor, RecipientResolver, RegionRules,
};

/// Run the agent until the gateway stops.
pub async fn run(config: NdiraConfig) -> Result<(), NdiraError> {
    let monitor = ConnectionMonitor::new();
    let transport: Arc<dyn Transport> = Arc::new(BridgeTransport::new(&config.whatsapp)?);

    // Lifecycle events flow into the monitor for the process lifetime.
    let _lifecycle = spawn_lifecycle_listener(&config.whatsapp, monitor.clone());

    let resolver = RecipientResolver::new(
        transport.clone(),
        RegionRules::from_config(&config.whatsapp),
    );
    let publisher = ArtifactPublisher::new(Arc::new(HttpObjectStore::new(&config.storage)?));
    let queue = DispatchQueue::new(
        Duration::from_millis(config.dispatch.pacing_ms),
        config.dispatch.task_timeout_secs.map(Duration::from_secs),
    );
    let retry = RetryPolicy {
        max_retries: config.dispatch.max_retries,
        base_delay: Duration::from_millis(config.dispatch.base_delay_ms),
    };

    let notifier = Arc::new(Notifier::new(
        monitor.clone(),
        transport,
        resolver,
        publisher,
        queue,
        retry,
        config.branding.clone(),
    ));

    info!(
        agent = %config.agent.name,
        bridge = %config.whatsapp.bridge_url,
        "ndira agent starting"
    );

    start_server(&config.gateway, GatewayState::new(notifier)).await
}
