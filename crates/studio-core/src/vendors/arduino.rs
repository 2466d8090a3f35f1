//! Arduino Store order confirmations.

use std::path::Path;

use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::receipt::{ParsedLineItem, ParsedOrder, Vendor};
use crate::pdf::Document;

use super::coerce::{amount_after, amount_at_line_start, capture, parse_amount, squash_whitespace, to_int};
use super::patterns::{ARDUINO_ITEM, SKU_LINE, STORE_ORDER_DATE, STORE_ORDER_NUMBER, STORE_PAYMENT};
use super::{content_lines, filename_matches, first_page_contains_any, starts_with_any, VendorParser};

const FILENAME_HINTS: &[&str] = &["arduino"];
const MARKERS: &[&str] = &["store.arduino.cc", "arduino store", "arduino s.r.l"];

const TABLE_END: &[&str] = &["Subtotal"];

const MANUFACTURER: &str = "Arduino";

#[derive(Debug, Default, Clone, Copy)]
pub struct ArduinoParser;

impl VendorParser for ArduinoParser {
    fn vendor(&self) -> Vendor {
        Vendor::Arduino
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
        order.sales_tax = ["Taxes", "Tax", "VAT"]
            .iter()
            .find_map(|label| amount_after(label, text));
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

            if let Some(caps) = ARDUINO_ITEM.captures(line) {
                let mut item = ParsedLineItem::for_order(order);
                item.description = squash_whitespace(&caps[1]);
                item.ordered = to_int(&caps[2]);
                item.line_total = parse_amount(&caps[3]);
                item.unit_price = match (item.line_total, item.ordered) {
                    (Some(total), Some(qty)) if qty > 0 => total.checked_div(Decimal::from(qty)),
                    _ => None,
                };
                item.manufacturer = Some(MANUFACTURER.to_string());
                items.extend(current.replace(item));
                continue;
            }

            let Some(item) = current.as_mut() else {
                continue;
            };

            if let Some(sku) = capture(&SKU_LINE, line) {
                item.sku = sku;
            }
        }

        items.extend(current);
        items
    }
}
