// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ndira notification agent.
//!
//! Every failure class the agent produces is a tagged variant carrying its
//! own HTTP status hint and retry classification, so callers never have to
//! inspect message text to decide how to react.

use thiserror::Error;

/// The primary error type used across all Ndira crates.
#[derive(Debug, Error)]
pub enum NdiraError {
    /// Malformed or incomplete input detected during request normalization.
    /// The message names the specific missing or invalid field.
    #[error("{0}")]
    BadRequest(String),

    /// The WhatsApp transport session is not authenticated and usable.
    /// Surfaced before any network work is attempted.
    #[error("WhatsApp client is not connected")]
    NotConnected,

    /// Number lookup found no registered WhatsApp account.
    #[error("number {raw} (normalized to {normalized}) is not registered on WhatsApp")]
    RecipientInvalid {
        /// The caller-supplied phone string.
        raw: String,
        /// The region-normalized form submitted to the lookup.
        normalized: String,
    },

    /// Transport-level failure from a send or lookup operation. Treated as
    /// transient and eligible for retry.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Object-storage upload failure, wrapped with context.
    #[error("upload failed: {message}")]
    Upload {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A queued task exceeded its configured deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NdiraError {
    /// HTTP status code this error maps to at the gateway boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            NdiraError::BadRequest(_) | NdiraError::RecipientInvalid { .. } => 400,
            NdiraError::NotConnected => 503,
            NdiraError::Timeout { .. } => 504,
            NdiraError::Transport { .. }
            | NdiraError::Upload { .. }
            | NdiraError::Config(_)
            | NdiraError::Internal(_) => 500,
        }
    }

    /// Whether the retry controller may re-attempt the failed operation.
    ///
    /// Validation-class failures are final: retrying cannot fix them and
    /// would waste the serialized lane's only slot.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NdiraError::Transport { .. } | NdiraError::Timeout { .. }
        )
    }
}
