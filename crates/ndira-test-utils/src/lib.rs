// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Ndira workspace.
//!
//! Provides deterministic mock implementations of the collaborator traits
//! so service and gateway tests never touch a real bridge or bucket.

pub mod mock_store;
pub mod mock_transport;

pub use mock_store::{MockObjectStore, StoredObject};
pub use mock_transport::{MockTransport, SendKind, SendRecord};
