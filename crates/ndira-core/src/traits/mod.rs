// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Ndira notification agent.
//!
//! The messaging transport and the object-storage bucket are external
//! collaborators; these traits are their interface boundary. All traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod object_store;
pub mod transport;

// Re-export all traits at the traits module level for convenience.
pub use object_store::ObjectStore;
pub use transport::Transport;
