// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic single-page receipt rendering.
//!
//! Pure and synchronous: given identical [`ReceiptData`], branding, and a
//! frozen date, the layout is byte-reproducible except for the document
//! metadata timestamp the PDF library injects. No temp files; the page is
//! serialized straight to an in-memory buffer.

use chrono::NaiveDate;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Rgb,
};
use tracing::debug;

use ndira_config::model::BrandingConfig;
use ndira_config::parse_hex_color;
use ndira_core::NdiraError;

use crate::model::{format_amount, ReceiptData};

// A4 geometry in millimeters.
const PAGE_W: f64 = 210.0;
const PAGE_H: f64 = 297.0;
const MARGIN: f64 = 11.0; // ~30pt
const HEADER_H: f64 = 26.5; // ~75pt
const ROW_H: f64 = 6.4; // ~18pt
const FOOTER_H: f64 = 14.0;

/// Widest item-name column in characters before truncation.
const NAME_COLUMN_CHARS: usize = 42;
const CUSTOMER_COLUMN_CHARS: usize = 20;

fn mm(v: f64) -> Mm {
    Mm(v as _)
}

fn rgb(r: f64, g: f64, b: f64) -> Color {
    Color::Rgb(Rgb::new(r as _, g as _, b as _, None))
}

fn gray(level: f64) -> Color {
    rgb(level, level, level)
}

/// Approximate rendered width of builtin Helvetica text, in millimeters.
///
/// Builtin fonts ship no metrics through this API; an average glyph width
/// of 0.5 em is close enough for right-aligning prices and centering lines.
fn text_width(text: &str, font_size_pt: f64) -> f64 {
    text.chars().count() as f64 * font_size_pt * 0.5 * 0.3528
}

/// Render `data` as a single-page A4 receipt PDF.
pub fn render_receipt(
    data: &ReceiptData,
    branding: &BrandingConfig,
    date: NaiveDate,
) -> Result<Vec<u8>, NdiraError> {
    let (brand_r, brand_g, brand_b) = parse_hex_color(&branding.brand_color)
        .ok_or_else(|| NdiraError::Config(format!(
            "branding.brand_color `{}` is not a valid hex color",
            branding.brand_color
        )))?;
    let brand = rgb(brand_r, brand_g, brand_b);
    // Light tint of the brand color for the total box.
    let brand_tint = rgb(
        0.85 + brand_r * 0.15,
        0.85 + brand_g * 0.15,
        0.85 + brand_b * 0.15,
    );
    let white = gray(1.0);
    let band_gray = gray(0.93);
    let muted = gray(0.45);
    let ink = gray(0.1);

    let (doc, page, layer) = PdfDocument::new(
        format!("Receipt {}", data.sale_number),
        mm(PAGE_W),
        mm(PAGE_H),
        "receipt",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| NdiraError::Internal(format!("pdf font load failed: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| NdiraError::Internal(format!("pdf font load failed: {e}")))?;

    // 1. Header band: brand rectangle with reversed text.
    filled_rect(&layer, 0.0, PAGE_H - HEADER_H, PAGE_W, HEADER_H, &brand);
    text(&layer, &branding.business_name, 16.0, MARGIN, PAGE_H - 9.5, &bold, &white);
    text(&layer, &branding.tagline, 9.0, MARGIN, PAGE_H - 15.5, &font, &white);
    text(&layer, &branding.contact_line, 8.0, MARGIN, PAGE_H - 21.0, &font, &white);

    let mut y = PAGE_H - HEADER_H - 10.0;

    // 2. Title line.
    text(&layer, "RECEIPT", 14.0, MARGIN, y, &bold, &ink);
    y -= 9.0;

    // 3. Info row: receipt number, date, customer.
    let date_text = date.format("%d %b %Y").to_string();
    let customer = truncate(&data.customer_name, CUSTOMER_COLUMN_CHARS);
    text(&layer, "Receipt No:", 9.0, MARGIN, y, &bold, &ink);
    text(&layer, &data.sale_number, 9.0, MARGIN + 20.0, y, &font, &ink);
    text(&layer, "Date:", 9.0, 85.0, y, &bold, &ink);
    text(&layer, &date_text, 9.0, 95.0, y, &font, &ink);
    text(&layer, "Customer:", 9.0, 135.0, y, &bold, &ink);
    text(&layer, &customer, 9.0, 153.0, y, &font, &ink);
    y -= 4.5;

    // 4. Divider rule.
    rule(&layer, MARGIN, PAGE_W - MARGIN, y, 0.4, &gray(0.7));
    y -= 7.5;

    // 5. Table header band.
    filled_rect(&layer, MARGIN, y - 2.0, PAGE_W - 2.0 * MARGIN, 7.0, &band_gray);
    text(&layer, "ITEM", 9.0, MARGIN + 2.0, y, &bold, &ink);
    right_text(&layer, "PRICE", 9.0, PAGE_W - MARGIN - 2.0, y, &bold, &ink);
    y -= ROW_H + 1.0;

    // 6. One row per line item.
    for item in &data.line_items {
        let name = truncate(&item.name, NAME_COLUMN_CHARS);
        let price = format!("${}", item.unit_price);
        text(&layer, &name, 9.0, MARGIN + 2.0, y, &font, &ink);
        right_text(&layer, &price, 9.0, PAGE_W - MARGIN - 2.0, y, &font, &ink);
        y -= ROW_H;
    }

    // 7. Optional notes line.
    if let Some(notes) = &data.notes {
        let notes_line = truncate(notes, 80);
        text(&layer, &format!("Note: {notes_line}"), 8.0, MARGIN + 2.0, y, &font, &muted);
        y -= ROW_H;
    }

    // 8. Divider, then highlighted total box.
    y -= 1.0;
    rule(&layer, MARGIN, PAGE_W - MARGIN, y + 4.0, 0.4, &gray(0.7));
    filled_rect(&layer, MARGIN, y - 4.5, PAGE_W - 2.0 * MARGIN, 9.0, &brand_tint);
    text(&layer, "TOTAL:", 10.0, MARGIN + 2.0, y - 2.0, &bold, &ink);
    let total_text = format!("${}", format_amount(data.total));
    right_text(&layer, &total_text, 10.0, PAGE_W - MARGIN - 2.0, y - 2.0, &bold, &ink);
    y -= 12.0;

    // 9. Brand accent rule.
    rule(&layer, MARGIN, PAGE_W - MARGIN, y, 1.1, &brand);
    y -= 9.0;

    // 10. Centered thank-you and appreciation lines.
    center_text(&layer, &branding.thank_you, 11.0, y, &bold, &brand);
    y -= 6.0;
    center_text(&layer, &branding.appreciation, 8.5, y, &font, &muted);

    // 11. Footer band pinned to the bottom of the page.
    filled_rect(&layer, 0.0, 0.0, PAGE_W, FOOTER_H, &band_gray);
    center_text(&layer, &branding.footer_line, 8.0, 6.0, &font, &ink);

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| NdiraError::Internal(format!("pdf serialization failed: {e}")))?;
    debug!(
        sale_number = %data.sale_number,
        bytes = bytes.len(),
        "receipt rendered"
    );
    Ok(bytes)
}

fn text(
    layer: &PdfLayerReference,
    content: &str,
    size_pt: f64,
    x: f64,
    y: f64,
    font: &IndirectFontRef,
    color: &Color,
) {
    layer.set_fill_color(color.clone());
    layer.use_text(content, size_pt as _, mm(x), mm(y), font);
}

fn right_text(
    layer: &PdfLayerReference,
    content: &str,
    size_pt: f64,
    right_edge: f64,
    y: f64,
    font: &IndirectFontRef,
    color: &Color,
) {
    let x = right_edge - text_width(content, size_pt);
    text(layer, content, size_pt, x, y, font, color);
}

fn center_text(
    layer: &PdfLayerReference,
    content: &str,
    size_pt: f64,
    y: f64,
    font: &IndirectFontRef,
    color: &Color,
) {
    let x = (PAGE_W - text_width(content, size_pt)) / 2.0;
    text(layer, content, size_pt, x, y, font, color);
}

fn filled_rect(layer: &PdfLayerReference, x: f64, y: f64, w: f64, h: f64, color: &Color) {
    layer.set_fill_color(color.clone());
    let ring = vec![
        (Point::new(mm(x), mm(y)), false),
        (Point::new(mm(x + w), mm(y)), false),
        (Point::new(mm(x + w), mm(y + h)), false),
        (Point::new(mm(x), mm(y + h)), false),
    ];
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn rule(
    layer: &PdfLayerReference,
    x1: f64,
    x2: f64,
    y: f64,
    thickness_pt: f64,
    color: &Color,
) {
    layer.set_outline_color(color.clone());
    layer.set_outline_thickness(thickness_pt as _);
    layer.add_line(Line {
        points: vec![
            (Point::new(mm(x1), mm(y)), false),
            (Point::new(mm(x2), mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Truncate to a column width, appending `...` when content was cut.
fn truncate(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let kept: String = content.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItem;

    fn sample_receipt() -> ReceiptData {
        ReceiptData {
            sale_number: "A1B2C3D4".into(),
            customer_name: "Tendai Moyo".into(),
            recipient_raw: "0775123456".into(),
            line_items: vec![
                LineItem {
                    name: "Phone Case".into(),
                    unit_price: "10.00".into(),
                },
                LineItem {
                    name: "Screen Protector".into(),
                    unit_price: "5.50".into(),
                },
            ],
            total: 15.5,
            notes: Some("Collected in store".into()),
        }
    }

    fn frozen_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    #[test]
    fn renders_a_pdf_byte_buffer() {
        let bytes =
            render_receipt(&sample_receipt(), &BrandingConfig::default(), frozen_date()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn output_is_stable_for_identical_input() {
        let branding = BrandingConfig::default();
        let a = render_receipt(&sample_receipt(), &branding, frozen_date()).unwrap();
        let b = render_receipt(&sample_receipt(), &branding, frozen_date()).unwrap();
        // The library injects a metadata timestamp; content length is stable.
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn renders_without_notes() {
        let mut receipt = sample_receipt();
        receipt.notes = None;
        let bytes =
            render_receipt(&receipt, &BrandingConfig::default(), frozen_date()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn rejects_unparseable_brand_color() {
        let branding = BrandingConfig {
            brand_color: "chartreuse".into(),
            ..BrandingConfig::default()
        };
        let err = render_receipt(&sample_receipt(), &branding, frozen_date()).unwrap_err();
        assert!(matches!(err, NdiraError::Config(_)));
    }

    #[test]
    fn date_renders_day_month_abbrev_year() {
        assert_eq!(frozen_date().format("%d %b %Y").to_string(), "05 Jan 2025");
    }

    #[test]
    fn truncate_appends_ellipsis_only_when_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long item name", 10), "a very ...");
    }

    #[test]
    fn long_item_lists_still_render() {
        let mut receipt = sample_receipt();
        receipt.line_items = (0..20)
            .map(|i| LineItem {
                name: format!("Item {i}"),
                unit_price: "1.00".into(),
            })
            .collect();
        receipt.total = 20.0;
        let bytes =
            render_receipt(&receipt, &BrandingConfig::default(), frozen_date()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
