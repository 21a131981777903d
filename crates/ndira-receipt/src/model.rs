// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Receipt value objects.
//!
//! A [`ReceiptData`] is constructed once per receipt request by the
//! normalizer and never mutated afterwards; the renderer and the message
//! templating both read from it.

/// One sold item on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Item name, non-empty after trimming.
    pub name: String,
    /// Unit price formatted to exactly two decimal places.
    pub unit_price: String,
}

/// Immutable receipt contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptData {
    /// Caller-supplied or generated 8-character uppercase sale token.
    pub sale_number: String,
    /// Customer display name; `"Customer"` when the caller omits it.
    pub customer_name: String,
    /// The caller-supplied phone string, kept for error reporting.
    pub recipient_raw: String,
    /// At least one line item.
    pub line_items: Vec<LineItem>,
    /// Finite and greater than zero.
    pub total: f64,
    /// Optional free-form note shown under the item table.
    pub notes: Option<String>,
}

/// Format a monetary amount to exactly two decimal places.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}
