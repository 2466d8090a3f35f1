//! Bambu Lab store orders.

use std::path::Path;

use crate::error::Result;
use crate::models::receipt::{ParsedLineItem, ParsedOrder, Vendor};
use crate::pdf::Document;

use super::coerce::{amount_after, amount_at_line_start, capture, parse_amount, squash_whitespace, to_int};
use super::patterns::{
    BAMBU_ITEM, BAMBU_VARIANT, SKU_LINE, STORE_ORDER_DATE, STORE_ORDER_NUMBER, STORE_PAYMENT,
    URL_LINE,
};
use super::{content_lines, filename_matches, first_page_contains_any, starts_with_any, VendorParser};

const FILENAME_HINTS: &[&str] = &["bambu"];
const MARKERS: &[&str] = &["bambulab.com", "bambu lab"];

const TABLE_END: &[&str] = &["Subtotal"];

const MANUFACTURER: &str = "Bambu Lab";

#[derive(Debug, Default, Clone, Copy)]
pub struct BambuLabParser;

impl VendorParser for BambuLabParser {
    fn vendor(&self) -> Vendor {
        Vendor::BambuLab
    }

    fn try_detect(&self, document: &Document<'_>) -> Result<bool> {
        if filename_matches(document, FILENAME_HINTS) {
            return Ok(true);
        }
        first_page_contains_any(document, MARKERS)
    }

    fn order_from_text(&self, path: &Path, text: &str) -> ParsedOrder {
        let mut order = ParsedOrder::new(self.vendor(), path);

        order.invoice = capture(&STORE_ORDER_NUMBER, text);
        order.invoice_date = capture(&STORE_ORDER_DATE, text);
        order.credit_card = capture(&STORE_PAYMENT, text);

        order.merchandise = amount_after("Subtotal", text);
        order.shipping = amount_after("Shipping", text);
        order.sales_tax = amount_after("Tax", text);
        order.total = amount_at_line_start("Total", text);

        order
    }

    fn items_from_text(&self, order: &ParsedOrder, text: &str) -> Vec<ParsedLineItem> {
        let mut items = Vec::new();
        let mut current: Option<ParsedLineItem> = None;

        for line in content_lines(text) {
            if starts_with_any(line, TABLE_END) {
                break;
            }

            if let Some(caps) = BAMBU_ITEM.captures(line) {
                let mut item = ParsedLineItem::for_order(order);
                item.description = squash_whitespace(&caps[1]);
                item.unit_price = parse_amount(&caps[2]);
                item.ordered = to_int(&caps[3]);
                item.line_total = parse_amount(&caps[4]);
                item.manufacturer = Some(MANUFACTURER.to_string());
                items.extend(current.replace(item));
                continue;
            }

            let Some(item) = current.as_mut() else {
                continue;
            };

            if let Some(variant) = capture(&BAMBU_VARIANT, line) {
                item.push_description(&variant);
            } else if let Some(sku) = capture(&SKU_LINE, line) {
                item.mfg_part = Some(sku.clone());
                item.sku = sku;
            } else if let Some(url) = capture(&URL_LINE, line) {
                item.url = Some(url);
            }
        }

        items.extend(current);
        items
    }
}
