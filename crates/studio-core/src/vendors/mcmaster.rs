//! McMaster-Carr invoices.

use std::path::Path;

use crate::error::Result;
use crate::models::receipt::{ParsedLineItem, ParsedOrder, Vendor};
use crate::pdf::Document;

use super::coerce::{capture, money_after, money_at_line_start, to_decimal, to_int};
use super::patterns::{
    MCMASTER_ACCOUNT, MCMASTER_CARD, MCMASTER_INVOICE, MCMASTER_INVOICE_DATE, MCMASTER_ITEM,
    MCMASTER_ITEM_HEAD, MCMASTER_PAYMENT_DATE, MCMASTER_PO, MCMASTER_QUANTITIES, PAGE_FOOTER,
};
use super::{content_lines, filename_matches, first_page_contains_any, starts_with_any, VendorParser};

const FILENAME_HINTS: &[&str] = &["mcmaster"];
const MARKERS: &[&str] = &["mcmaster", "mcmaster-carr"];

const TABLE_END: &[&str] = &["Merchandise", "Total"];

/// Column header repeated at the top of every page.
const COLUMN_HEADER: &[&str] = &["ordered", "shipped", "balance"];

const PRODUCT_URL: &str = "https://www.mcmaster.com/";

#[derive(Debug, Default, Clone, Copy)]
pub struct McMasterParser;

impl VendorParser for McMasterParser {
    fn vendor(&self) -> Vendor {
        Vendor::McMaster
    }

    fn try_detect(&self, document: &Document<'_>) -> Result<bool> {
        if filename_matches(document, FILENAME_HINTS) {
            return Ok(true);
        }
        first_page_contains_any(document, MARKERS)
    }

    fn order_from_text(&self, path: &Path, text: &str) -> ParsedOrder {
        let mut order = ParsedOrder::new(self.vendor(), path);

        order.purchase_order = capture(&MCMASTER_PO, text);
        order.invoice = capture(&MCMASTER_INVOICE, text);
        order.invoice_date = capture(&MCMASTER_INVOICE_DATE, text);
        order.account_number = capture(&MCMASTER_ACCOUNT, text);
        order.payment_date = capture(&MCMASTER_PAYMENT_DATE, text);
        order.credit_card = capture(&MCMASTER_CARD, text);

        order.merchandise = money_after("Merchandise", text);
        order.shipping = money_after("Shipping", text);
        order.sales_tax = money_after("Sales Tax", text);
        order.total = money_at_line_start("Total", text);

        order
    }

    fn items_from_text(&self, order: &ParsedOrder, text: &str) -> Vec<ParsedLineItem> {
        let mut items = Vec::new();
        let mut current: Option<ParsedLineItem> = None;

        for line in content_lines(text) {
            if let Some(caps) = MCMASTER_ITEM.captures(line) {
                let mut item = new_item(order, &caps[1], &caps[2]);
                if let Some(desc) = caps.get(3) {
                    item.push_description(desc.as_str());
                }
                item.ordered = to_int(&caps[4]);
                item.shipped = to_int(&caps[5]);
                item.balance = to_int(&caps[6]);
                item.unit_price = to_decimal(&caps[7]);
                item.line_total = to_decimal(&caps[8]);
                items.extend(current.replace(item));
                continue;
            }

            if let Some(caps) = MCMASTER_ITEM_HEAD.captures(line) {
                let mut item = new_item(order, &caps[1], &caps[2]);
                if let Some(desc) = caps.get(3) {
                    item.push_description(desc.as_str());
                }
                items.extend(current.replace(item));
                continue;
            }

            let Some(item) = current.as_mut() else {
                continue;
            };

            if starts_with_any(line, TABLE_END) {
                break;
            }
            if PAGE_FOOTER.is_match(line) || is_column_header(line) {
                continue;
            }

            match MCMASTER_QUANTITIES.captures(line) {
                Some(caps) if item.ordered.is_none() => {
                    item.ordered = to_int(&caps[1]);
                    item.shipped = to_int(&caps[2]);
                    item.balance = to_int(&caps[3]);
                    item.unit_price = to_decimal(&caps[4]);
                    item.line_total = to_decimal(&caps[5]);
                }
                _ => item.push_description(line),
            }
        }

        items.extend(current);
        items
    }
}

fn new_item(order: &ParsedOrder, line: &str, part: &str) -> ParsedLineItem {
    let mut item = ParsedLineItem::for_order(order);
    item.line = to_int(line);
    item.sku = part.to_string();
    item.url = Some(format!("{}{}", PRODUCT_URL, part));
    item
}

fn is_column_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    COLUMN_HEADER.iter().all(|word| lower.contains(word))
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

    const INVOICE: &str = "\
McMASTER-CARR SUPPLY COMPANY
600 N County Line Rd, Elmhurst, IL 60126
Invoice 12345678
Purchase Order: STUDIO-0412
Invoice Date: 04/12/2024
Account Number: 4567890
Payment Date: 04/13/2024
Credit Card: Visa ending in 4242
Line Product Ordered Shipped Balance Price Total
1 91251A540 Black-Oxide Alloy Steel Socket Head Screw 100 100 0 Pack 9.39 9.39
M3 x 0.5 mm Thread, 8 mm Long
2 5234K57 Clear PVC Tubing 5 5 0 Ft. 1.02 5.10
Page 1 of 2
Line Product Ordered Shipped Balance Price Total
3 94180A331
Heat-Set Insert for Plastic
2 2 0 Pack 14.12 28.24
Merchandise 42.73
Shipping 8.52
Sales Tax 3.84
Total 55.09
";

    #[test]
    fn test_detect() {
        assert!(detect_text(&McMasterParser, "x.pdf", INVOICE));
        assert!(detect_text(&McMasterParser, "McMaster_2024-04.pdf", "scanned"));
        assert!(!detect_text(&McMasterParser, "x.pdf", "DIGI-KEY ELECTRONICS"));
    }

    #[test]
    fn test_order_fields() {
        let order = McMasterParser.order_from_text(Path::new("mc.pdf"), INVOICE);
        assert_eq!(order.invoice.as_deref(), Some("12345678"));
        assert_eq!(order.purchase_order.as_deref(), Some("STUDIO-0412"));
        assert_eq!(order.invoice_date.as_deref(), Some("04/12/2024"));
        assert_eq!(order.account_number.as_deref(), Some("4567890"));
        assert_eq!(order.payment_date.as_deref(), Some("04/13/2024"));
        assert_eq!(order.credit_card.as_deref(), Some("Visa ending in 4242"));
        assert_eq!(order.merchandise, Some(dec("42.73")));
        assert_eq!(order.shipping, Some(dec("8.52")));
        assert_eq!(order.sales_tax, Some(dec("3.84")));
        assert_eq!(order.total, Some(dec("55.09")));
    }

    #[test]
    fn test_line_items() {
        let receipt = parse_text(&McMasterParser, "mc.pdf", INVOICE);
        let items = &receipt.items;
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].sku, "91251A540");
        assert_eq!(
            items[0].description,
            "Black-Oxide Alloy Steel Socket Head Screw M3 x 0.5 mm Thread, 8 mm Long"
        );
        assert_eq!(items[0].ordered, Some(100));
        assert_eq!(items[0].unit_price, Some(dec("9.39")));
        assert_eq!(items[0].url.as_deref(), Some("https://www.mcmaster.com/91251A540"));

        assert_eq!(items[1].sku, "5234K57");
        assert_eq!(items[1].description, "Clear PVC Tubing");
        assert_eq!(items[1].line_total, Some(dec("5.10")));

        assert_eq!(items[2].sku, "94180A331");
        assert_eq!(items[2].description, "Heat-Set Insert for Plastic");
        assert_eq!(items[2].shipped, Some(2));
        assert_eq!(items[2].line_total, Some(dec("28.24")));
        assert_eq!(items[2].invoice.as_deref(), Some("12345678"));
    }

    #[test]
    fn test_items_flush_without_terminator() {
        let text = "1 91251A540 Screw 10 10 0 Pack 1.00 1.00\n2 5234K57 Tubing 1 1 0 1.00 1.00";
        let order = McMasterParser.order_from_text(Path::new("mc.pdf"), text);
        let items = McMasterParser.items_from_text(&order, text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].description, "Tubing");
    }

    #[test]
    fn test_missing_totals_stay_absent() {
        let order = McMasterParser.order_from_text(Path::new("mc.pdf"), "McMaster-Carr\nTotal 55");
        assert_eq!(order.total, None);
        assert_eq!(order.merchandise, None);
        assert_eq!(order.invoice, None);
    }
}
