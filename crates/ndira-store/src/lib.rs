// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Receipt artifact publishing for the Ndira notification agent.
//!
//! Implements [`ndira_core::ObjectStore`] over plain HTTP and wraps it in
//! the [`ArtifactPublisher`], which owns key derivation and public-URL
//! reporting.

pub mod http;
pub mod key;
pub mod publisher;

pub use http::HttpObjectStore;
pub use key::{sanitize_file_name, storage_key};
pub use publisher::{ArtifactPublisher, PublishedArtifact};
