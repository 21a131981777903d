// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact publisher: rendered document bytes in, public URL out.
//!
//! Upload is a single attempt; failures propagate as tagged upload errors
//! and the caller surfaces them without retry.

use std::sync::Arc;

use tracing::info;

use ndira_core::{NdiraError, ObjectStore};

use crate::key::storage_key;

/// A published receipt document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    /// Bucket key the object was stored under.
    pub storage_key: String,
    /// Publicly resolvable URL for the object.
    pub public_url: String,
}

/// Uploads rendered documents and derives their public URLs.
pub struct ArtifactPublisher {
    store: Arc<dyn ObjectStore>,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload `bytes` under a `receipts/<unix-millis>-<sanitized>` key.
    pub async fn publish(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        correlation_id: &str,
    ) -> Result<PublishedArtifact, NdiraError> {
        let key = storage_key(chrono::Utc::now().timestamp_millis(), file_name);
        let size = bytes.len();

        self.store
            .put_object(&key, bytes, "application/pdf")
            .await?;

        let public_url = self.store.public_url(&key);
        info!(
            correlation = correlation_id,
            key = %key,
            bytes = size,
            "receipt artifact published"
        );

        Ok(PublishedArtifact {
            storage_key: key,
            public_url,
        })
    }
}
