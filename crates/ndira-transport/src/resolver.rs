// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipient resolution: raw phone string to protocol-native chat handle.
//!
//! Resolution performs one real network round-trip per notification (the
//! number lookup). Lookup failures are not retried: a missing account is a
//! semantic answer, not a transient fault, and retrying would multiply
//! pre-queue network load under bursts.

use std::sync::Arc;

use tracing::debug;

use ndira_config::model::WhatsappConfig;
use ndira_core::{ChatHandle, NdiraError, Transport};

use crate::phone::normalize_msisdn;

/// Region-specific dialing rules used during normalization.
#[derive(Debug, Clone)]
pub struct RegionRules {
    /// Country calling code substituted for the trunk prefix.
    pub country_code: String,
    /// Local trunk prefix to replace.
    pub trunk_prefix: String,
}

impl RegionRules {
    pub fn from_config(config: &WhatsappConfig) -> Self {
        Self {
            country_code: config.country_code.clone(),
            trunk_prefix: config.trunk_prefix.clone(),
        }
    }
}

/// Converts raw phone numbers into validated chat handles.
pub struct RecipientResolver {
    transport: Arc<dyn Transport>,
    region: RegionRules,
}

impl RecipientResolver {
    pub fn new(transport: Arc<dyn Transport>, region: RegionRules) -> Self {
        Self { transport, region }
    }

    /// Normalize `raw` and validate it against the messaging network.
    ///
    /// Fails with [`NdiraError::RecipientInvalid`] — naming both the
    /// original and normalized forms — when the number has no registered
    /// account.
    pub async fn resolve(&self, raw: &str) -> Result<ChatHandle, NdiraError> {
        let normalized =
            normalize_msisdn(raw, &self.region.country_code, &self.region.trunk_prefix)?;

        match self.transport.lookup_number(&normalized).await? {
            Some(handle) => {
                debug!(number = %normalized, handle = %handle, "recipient resolved");
                Ok(handle)
            }
            None => Err(NdiraError::RecipientInvalid {
                raw: raw.to_string(),
                normalized,
            }),
        }
    }
}
