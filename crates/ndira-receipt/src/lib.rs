// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Receipt modeling and PDF rendering for the Ndira notification agent.
//!
//! The renderer is pure and synchronous; all I/O (upload, send) happens in
//! other crates.

pub mod model;
pub mod render;

pub use model::{format_amount, LineItem, ReceiptData};
pub use render::render_receipt;
