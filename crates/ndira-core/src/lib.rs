// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ndira notification agent.
//!
//! This crate provides the error taxonomy, common types, and collaborator
//! trait definitions used throughout the Ndira workspace. The transport
//! client and the object-storage bucket are external systems; their traits
//! here are the only surface the rest of the agent sees.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NdiraError;
pub use types::{short_uid, ChatHandle, NotifyMode};

// Re-export collaborator traits at crate root.
pub use traits::{ObjectStore, Transport};
