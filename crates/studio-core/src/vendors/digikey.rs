//! Digi-Key PO acknowledgements.

use std::path::Path;

use crate::error::Result;
use crate::models::receipt::{ParsedLineItem, ParsedOrder, Vendor};
use crate::pdf::Document;

use super::coerce::{capture, money_after, money_at_line_start, split_trailing_prices, to_int};
use super::patterns::{DIGIKEY_ORDER_DATE, DIGIKEY_PART, DIGIKEY_PO_ACK, DIGIKEY_WEB_ORDER};
use super::{first_page_contains_any, VendorParser};

const MARKERS: &[&str] = &["DIGI-KEY ELECTRONICS"];

/// Lines that end the item table once an item has been opened.
const TABLE_END: &[&str] = &["Sales Amount", "Total"];

#[derive(Debug, Default, Clone, Copy)]
pub struct DigiKeyParser;

impl VendorParser for DigiKeyParser {
    fn vendor(&self) -> Vendor {
        Vendor::DigiKey
    }

    fn try_detect(&self, document: &Document<'_>) -> Result<bool> {
        first_page_contains_any(document, MARKERS)
    }

    fn order_from_text(&self, path: &Path, text: &str) -> ParsedOrder {
        let mut order = ParsedOrder::new(self.vendor(), path);

        order.invoice = capture(&DIGIKEY_PO_ACK, text);
        order.purchase_order = capture(&DIGIKEY_WEB_ORDER, text);
        order.invoice_date = capture(&DIGIKEY_ORDER_DATE, text);

        order.merchandise = money_after("Sales Amount", text);
        order.shipping = money_after("Shipping charges applied", text);
        order.sales_tax = money_after("Sales Tax", text);
        order.total = money_at_line_start("Total", text).or_else(|| money_after("Total", text));

        order
    }

    fn items_from_text(&self, order: &ParsedOrder, text: &str) -> Vec<ParsedLineItem> {
        let mut items = Vec::new();
        let mut current: Option<ParsedLineItem> = None;

        for line in text.lines().map(str::trim) {
            if let Some(caps) = DIGIKEY_PART.captures(line) {
                let mut item = ParsedLineItem::for_order(order);
                item.line = to_int(&caps[1]);
                item.ordered = to_int(&caps[2]);
                item.shipped = to_int(&caps[3]);
                item.balance = to_int(&caps[4]);
                item.sku = caps[5].to_string();
                items.extend(current.replace(item));
                continue;
            }

            let Some(item) = current.as_mut() else {
                continue;
            };

            if let Some(desc) = line.strip_prefix("DESC:") {
                let (desc, price, total) = split_trailing_prices(desc);
                if price.is_some() {
                    item.unit_price = price;
                    item.line_total = total;
                }
                item.description = desc;
                continue;
            }

            // A "Total" inside the table body also ends it.
            if TABLE_END.iter().any(|label| line.starts_with(label)) {
                break;
            }
        }

        items.extend(current);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendors::testing::{detect_text, parse_text};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const ACKNOWLEDGEMENT: &str = "\
DIGI-KEY ELECTRONICS
701 Brooks Avenue South, Thief River Falls, MN 56701
PO Acknowledgement 81234567
WEB ORDER ID: 55501
Order Date: 15-JAN-2024
LINE ORD SHIP BAL DESCRIPTION UNIT PRICE EXT PRICE
1 10 10 0 PART: 311-10.0KCRCT-ND
DESC: RES 10K OHM 1% 1/8W 0805 0.0230 0.23
2 5 5 0 PART: 1276-1003-1-ND
DESC: CAP CER 0.1UF 50V X7R 0805 0.1000 0.50
Sales Amount 0.73
Shipping charges applied 4.99
Sales Tax 0.45
Total 6.17
";

    #[test]
    fn test_detect() {
        assert!(detect_text(&DigiKeyParser, "x.pdf", ACKNOWLEDGEMENT));
        assert!(detect_text(&DigiKeyParser, "x.pdf", "Thank you, Digi-Key Electronics"));
        assert!(!detect_text(&DigiKeyParser, "digikey.pdf", "Mouser Electronics"));
    }

    #[test]
    fn test_order_fields() {
        let order = DigiKeyParser.order_from_text(Path::new("dk.pdf"), ACKNOWLEDGEMENT);
        assert_eq!(order.vendor, Vendor::DigiKey);
        assert_eq!(order.invoice.as_deref(), Some("81234567"));
        assert_eq!(order.purchase_order.as_deref(), Some("55501"));
        assert_eq!(order.invoice_date.as_deref(), Some("15-JAN-2024"));
        assert_eq!(order.merchandise, Some(dec("0.73")));
        assert_eq!(order.shipping, Some(dec("4.99")));
        assert_eq!(order.sales_tax, Some(dec("0.45")));
        assert_eq!(order.total, Some(dec("6.17")));
        assert_eq!(order.credit_card, None);
        assert_eq!(order.invoice_date_parsed(), chrono::NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_labeled_amounts_round_trip() {
        let order = DigiKeyParser.order_from_text(Path::new("dk.pdf"), "Sales Tax 4.50\nTotal 123.45");
        assert_eq!(order.sales_tax, Some(dec("4.50")));
        assert_eq!(order.total, Some(dec("123.45")));
    }

    #[test]
    fn test_totals_without_cents_stay_absent() {
        let order = DigiKeyParser.order_from_text(Path::new("dk.pdf"), "Sales Amount 12\nTotal 17");
        assert_eq!(order.merchandise, None);
        assert_eq!(order.total, None);
    }

    #[test]
    fn test_two_item_block() {
        let text = "1 2 2 0 PART: ABC-123\nDESC: Widget 1.00 2.00\n\
                    2 1 1 0 PART: XYZ-999\nDESC: Gadget 5.00 5.00\nTotal 7.00\n\
                    3 9 9 0 PART: AFTER-TOTAL";
        let order = DigiKeyParser.order_from_text(Path::new("dk.pdf"), text);
        let items = DigiKeyParser.items_from_text(&order, text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "ABC-123");
        assert_eq!(items[0].description, "Widget");
        assert_eq!(items[0].ordered, Some(2));
        assert_eq!(items[0].unit_price, Some(dec("1.00")));
        assert_eq!(items[0].line_total, Some(dec("2.00")));
        assert_eq!(items[1].sku, "XYZ-999");
        assert_eq!(items[1].description, "Gadget");
        assert_eq!(items[1].ordered, Some(1));
        assert_eq!(items[1].unit_price, Some(dec("5.00")));
        assert_eq!(items[1].line_total, Some(dec("5.00")));
    }

    #[test]
    fn test_items_flush_without_terminator() {
        let text = "1 1 1 0 PART: A-1\n2 3 3 0 PART: B-2\n3 4 0 4 PART: C-3";
        let order = DigiKeyParser.order_from_text(Path::new("dk.pdf"), text);
        let items = DigiKeyParser.items_from_text(&order, text);

        let skus: Vec<_> = items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, vec!["A-1", "B-2", "C-3"]);
        assert_eq!(items[2].shipped, Some(0));
        assert_eq!(items[2].balance, Some(4));
    }

    #[test]
    fn test_description_without_prices() {
        let text = "1 1 1 0 PART: A-1\nDESC: CONN HEADER VERT 10POS 2.54MM";
        let order = DigiKeyParser.order_from_text(Path::new("dk.pdf"), text);
        let items = DigiKeyParser.items_from_text(&order, text);

        assert_eq!(items[0].description, "CONN HEADER VERT 10POS 2.54MM");
        assert_eq!(items[0].unit_price, None);
        assert_eq!(items[0].line_total, None);
    }

    #[test]
    fn test_full_acknowledgement() {
        let receipt = parse_text(&DigiKeyParser, "dk-0142.pdf", ACKNOWLEDGEMENT);
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].sku, "311-10.0KCRCT-ND");
        assert_eq!(receipt.items[0].description, "RES 10K OHM 1% 1/8W 0805");
        assert_eq!(receipt.items[0].unit_price, Some(dec("0.0230")));
        assert_eq!(receipt.items[1].line_total, Some(dec("0.50")));
        assert_eq!(receipt.items[1].invoice.as_deref(), Some("81234567"));
        assert_eq!(receipt.items_total(), dec("0.73"));
    }

    #[test]
    fn test_no_items() {
        let receipt = parse_text(&DigiKeyParser, "dk.pdf", "DIGI-KEY ELECTRONICS\nTotal 0.00");
        assert!(receipt.items.is_empty());
        assert_eq!(receipt.order.total, Some(dec("0.00")));
    }
}
