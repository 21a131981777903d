// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request normalization: flexible JSON bodies to canonical shapes.
//!
//! Upstream callers post loosely shaped bodies (`phone` vs
//! `customerWhatsapp`, items under `receipt.products` vs `products`, totals
//! as numbers or numeric strings). This module is the single place where
//! all the precedence and default rules live; everything downstream works
//! with the two tagged variants only.
//!
//! Every failure here is a [`NdiraError::BadRequest`] naming the offending
//! field — the only error class this module produces.

use chrono::NaiveDate;
use serde_json::Value;

use ndira_core::{short_uid, NdiraError, NotifyMode};
use ndira_receipt::{format_amount, LineItem, ReceiptData};

/// A canonical plain-message request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub recipient_raw: String,
    pub body: String,
}

/// A canonical receipt request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRequest {
    pub recipient_raw: String,
    pub receipt: ReceiptData,
    /// Text message sent before the PDF.
    pub body: String,
    pub send_pdf: bool,
    pub caption: String,
    pub file_name: String,
}

/// One of the two canonical notification shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyRequest {
    Message(MessageRequest),
    Receipt(Box<ReceiptRequest>),
}

impl NotifyRequest {
    pub fn mode(&self) -> NotifyMode {
        match self {
            NotifyRequest::Message(_) => NotifyMode::Message,
            NotifyRequest::Receipt(_) => NotifyMode::Receipt,
        }
    }
}

/// Normalize a raw JSON body into a canonical request.
pub fn normalize_request(
    body: &Value,
    file_prefix: &str,
    date: NaiveDate,
) -> Result<NotifyRequest, NdiraError> {
    if !body.is_object() {
        return Err(NdiraError::BadRequest(
            "request body must be a JSON object".into(),
        ));
    }

    match resolve_mode(body)? {
        NotifyMode::Message => Ok(NotifyRequest::Message(normalize_message(body)?)),
        NotifyMode::Receipt => Ok(NotifyRequest::Receipt(Box::new(normalize_receipt(
            body,
            file_prefix,
            date,
        )?))),
    }
}

/// Determine the request mode.
///
/// An explicit `type` field wins; otherwise the presence of receipt-shaped
/// fields (`receipt`, numeric `revenue`, array `products`, `notes`) implies
/// receipt mode, and anything else is a plain message.
pub fn resolve_mode(body: &Value) -> Result<NotifyMode, NdiraError> {
    if let Some(explicit) = str_field(body, "type") {
        return match explicit.trim().to_ascii_lowercase().as_str() {
            "message" => Ok(NotifyMode::Message),
            "receipt" => Ok(NotifyMode::Receipt),
            other => Err(NdiraError::BadRequest(format!(
                "unknown notification type `{other}`"
            ))),
        };
    }

    let receipt_shaped = body.get("receipt").is_some_and(|v| !v.is_null())
        || body.get("revenue").is_some_and(Value::is_number)
        || body.get("products").is_some_and(Value::is_array)
        || body.get("notes").is_some_and(|v| !v.is_null());

    Ok(if receipt_shaped {
        NotifyMode::Receipt
    } else {
        NotifyMode::Message
    })
}

/// Read the recipient phone: `phone`, else `customerWhatsapp`, else
/// `receipt.customerWhatsapp`.
pub fn resolve_recipient(body: &Value) -> Result<String, NdiraError> {
    let phone = str_field(body, "phone")
        .or_else(|| str_field(body, "customerWhatsapp"))
        .or_else(|| {
            body.get("receipt")
                .and_then(|r| str_field(r, "customerWhatsapp"))
        })
        .map(str::trim)
        .unwrap_or("");

    if phone.is_empty() {
        return Err(NdiraError::BadRequest("phone is required".into()));
    }
    Ok(phone.to_string())
}

/// Canonicalize a plain-message body.
pub fn normalize_message(body: &Value) -> Result<MessageRequest, NdiraError> {
    let recipient_raw = resolve_recipient(body)?;
    let text = str_field(body, "message")
        .or_else(|| str_field(body, "text"))
        .map(str::trim)
        .unwrap_or("");

    if text.is_empty() {
        return Err(NdiraError::BadRequest(
            "message is required for message mode".into(),
        ));
    }

    Ok(MessageRequest {
        recipient_raw,
        body: text.to_string(),
    })
}

/// Canonicalize a receipt body, applying all default-generation rules.
pub fn normalize_receipt(
    body: &Value,
    file_prefix: &str,
    date: NaiveDate,
) -> Result<ReceiptRequest, NdiraError> {
    let recipient_raw = resolve_recipient(body)?;
    let receipt_obj = body.get("receipt").filter(|v| v.is_object());

    // Line items: receipt.products wins over top-level products.
    let products = receipt_obj
        .and_then(|r| r.get("products"))
        .filter(|v| v.is_array())
        .or_else(|| body.get("products").filter(|v| v.is_array()))
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| {
            NdiraError::BadRequest("products must be a non-empty array for receipt mode".into())
        })?;

    let mut line_items = Vec::with_capacity(products.len());
    for (i, product) in products.iter().enumerate() {
        let name = product
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");
        if name.is_empty() {
            return Err(NdiraError::BadRequest(format!(
                "products[{i}].name must not be empty"
            )));
        }

        let price = product.get("price").and_then(lenient_number);
        let Some(price) = price.filter(|p| p.is_finite() && *p > 0.0) else {
            return Err(NdiraError::BadRequest(format!(
                "products[{i}].price must be a number greater than zero"
            )));
        };

        line_items.push(LineItem {
            name: name.to_string(),
            unit_price: format_amount(price),
        });
    }

    // Total: receipt.revenue wins over top-level revenue.
    let total = receipt_obj
        .and_then(|r| r.get("revenue"))
        .and_then(lenient_number)
        .or_else(|| body.get("revenue").and_then(lenient_number))
        .filter(|t| t.is_finite() && *t > 0.0)
        .ok_or_else(|| {
            NdiraError::BadRequest(
                "revenue must be a number greater than zero for receipt mode".into(),
            )
        })?;

    let sale_number = receipt_obj
        .and_then(|r| str_field(r, "saleNumber"))
        .or_else(|| str_field(body, "saleNumber"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(short_uid);

    let customer_name = receipt_obj
        .and_then(|r| str_field(r, "customerName"))
        .or_else(|| str_field(body, "customerName"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Customer")
        .to_string();

    let notes = receipt_obj
        .and_then(|r| str_field(r, "notes"))
        .or_else(|| str_field(body, "notes"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let text = str_field(body, "message")
        .or_else(|| str_field(body, "text"))
        .or_else(|| receipt_obj.and_then(|r| str_field(r, "message")))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            receipt_message(&sale_number, date, line_items.len(), total)
        });

    let send_pdf = body
        .get("sendPdf")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let caption = str_field(body, "pdfCaption")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Receipt {sale_number}"));

    let file_name = str_field(body, "pdfFileName")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{file_prefix}-{sale_number}.pdf"));

    Ok(ReceiptRequest {
        recipient_raw: recipient_raw.clone(),
        receipt: ReceiptData {
            sale_number,
            customer_name,
            recipient_raw,
            line_items,
            total,
            notes,
        },
        body: text,
        send_pdf,
        caption,
        file_name,
    })
}

/// The deterministic message template used when the caller supplies none.
fn receipt_message(sale_number: &str, date: NaiveDate, item_count: usize, total: f64) -> String {
    format!(
        "Thank you for your purchase!\n\n\
         Receipt #{sale_number}\n\
         Date: {}\n\
         Items: {item_count}\n\
         Total: ${}\n\n\
         Your PDF receipt is attached.",
        date.format("%d %b %Y"),
        format_amount(total)
    )
}

/// A non-null string field.
fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Accept a JSON number or a numeric string.
fn lenient_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}
