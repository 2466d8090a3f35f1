//! Mouser Electronics invoices.

use std::path::Path;

use crate::error::Result;
use crate::models::receipt::{ParsedLineItem, ParsedOrder, Vendor};
use crate::pdf::Document;

use super::coerce::{capture, first_money, money_at_line_start, squash_whitespace, to_decimal, to_int};
use super::patterns::{
    MOUSER_ACCOUNT, MOUSER_DATE, MOUSER_DETAIL, MOUSER_INVOICE, MOUSER_ITEM, MOUSER_PO,
    MOUSER_SALES_ORDER, MOUSER_TERMS, PAGE_FOOTER, TOTALS_LINE,
};
use super::{content_lines, first_page_contains_any, starts_with_any, VendorParser};

const MARKERS: &[&str] = &["mouser electronics", "mouser.com"];

const TABLE_END: &[&str] = &["Merchandise", "Subtotal"];

const PRODUCT_URL: &str = "https://www.mouser.com/ProductDetail/";

#[derive(Debug, Default, Clone, Copy)]
pub struct MouserParser;

impl VendorParser for MouserParser {
    fn vendor(&self) -> Vendor {
        Vendor::Mouser
    }

    fn try_detect(&self, document: &Document<'_>) -> Result<bool> {
        first_page_contains_any(document, MARKERS)
    }

    fn order_from_text(&self, path: &Path, text: &str) -> ParsedOrder {
        let mut order = ParsedOrder::new(self.vendor(), path);

        order.invoice = capture(&MOUSER_INVOICE, text).or_else(|| capture(&MOUSER_SALES_ORDER, text));
        order.purchase_order = capture(&MOUSER_PO, text);
        order.invoice_date = capture(&MOUSER_DATE, text);
        order.account_number = capture(&MOUSER_ACCOUNT, text);
        order.credit_card = capture(&MOUSER_TERMS, text);

        order.merchandise = first_money(&["Merchandise Total", "Merchandise", "Subtotal"], text);
        order.shipping = first_money(&["Freight", "Shipping"], text);
        order.sales_tax = first_money(&["Sales Tax", "Tax"], text);
        order.total = first_money(&["Invoice Total", "Order Total"], text)
            .or_else(|| money_at_line_start("Total", text));

        order
    }

    fn items_from_text(&self, order: &ParsedOrder, text: &str) -> Vec<ParsedLineItem> {
        let mut items = Vec::new();
        let mut current: Option<ParsedLineItem> = None;

        for line in content_lines(text) {
            if let Some(caps) = MOUSER_ITEM.captures(line) {
                let mut item = ParsedLineItem::for_order(order);
                item.line = to_int(&caps[1]);
                item.sku = caps[2].to_string();
                item.mfg_part = Some(caps[3].to_string());
                item.ordered = to_int(&caps[4]);
                item.shipped = to_int(&caps[5]);
                item.balance = to_int(&caps[6]);
                item.unit_price = to_decimal(&caps[7]);
                item.line_total = to_decimal(&caps[8]);
                item.url = Some(format!("{}{}", PRODUCT_URL, &caps[2]));
                items.extend(current.replace(item));
                continue;
            }

            let Some(item) = current.as_mut() else {
                continue;
            };

            if starts_with_any(line, TABLE_END) || TOTALS_LINE.is_match(line) {
                break;
            }
            if PAGE_FOOTER.is_match(line) {
                continue;
            }

            match MOUSER_DETAIL.captures(line) {
                Some(caps) if caps[1].eq_ignore_ascii_case("mfr") => {
                    let name = squash_whitespace(&caps[2]);
                    item.manufacturer = (!name.is_empty()).then_some(name);
                }
                Some(caps) => item.push_description(&caps[2]),
                // wrapped description
                None if !item.description.is_empty() => item.push_description(line),
                None => {}
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

    const INVOICE: &str = "\
Mouser Electronics, Inc.
1000 North Main Street, Mansfield, TX 76063
INVOICE
Invoice No: 71234567
Sales Order No: 25012345
Customer PO: PROJ-LAMP
Invoice Date: 03/05/2024
Customer No: 8123456
Terms: Visa
Line Mouser No Mfr No Ordered Shipped Backorder Price Ext
1 595-NE555P NE555P 10 10 0 0.468 4.68
Mfr.: Texas Instruments
Desc.: Precision Timers Single
2 511-L7805CV L7805CV 5 4 1 0.56 2.24
Mfr.: STMicroelectronics
Desc.: Linear Voltage Regulators
5.0V 1.5A Positive
Merchandise Total: 6.92
Freight: 7.99
Tax: 0.57
Invoice Total: 15.48
";

    #[test]
    fn test_detect() {
        assert!(detect_text(&MouserParser, "x.pdf", INVOICE));
        assert!(detect_text(&MouserParser, "x.pdf", "Questions? Visit mouser.com/help"));
        assert!(!detect_text(&MouserParser, "mouser.pdf", "Newark, An Avnet Company"));
    }

    #[test]
    fn test_order_fields() {
        let order = MouserParser.order_from_text(Path::new("m.pdf"), INVOICE);
        assert_eq!(order.invoice.as_deref(), Some("71234567"));
        assert_eq!(order.purchase_order.as_deref(), Some("PROJ-LAMP"));
        assert_eq!(order.invoice_date.as_deref(), Some("03/05/2024"));
        assert_eq!(order.account_number.as_deref(), Some("8123456"));
        assert_eq!(order.credit_card.as_deref(), Some("Visa"));
        assert_eq!(order.merchandise, Some(dec("6.92")));
        assert_eq!(order.shipping, Some(dec("7.99")));
        assert_eq!(order.sales_tax, Some(dec("0.57")));
        assert_eq!(order.total, Some(dec("15.48")));
    }

    #[test]
    fn test_sales_order_fallback() {
        let order = MouserParser.order_from_text(Path::new("m.pdf"), "Sales Order No: 25012345");
        assert_eq!(order.invoice.as_deref(), Some("25012345"));
        assert_eq!(order.total, None);
    }

    #[test]
    fn test_line_items() {
        let receipt = parse_text(&MouserParser, "m.pdf", INVOICE);
        let items = &receipt.items;
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].sku, "595-NE555P");
        assert_eq!(items[0].mfg_part.as_deref(), Some("NE555P"));
        assert_eq!(items[0].manufacturer.as_deref(), Some("Texas Instruments"));
        assert_eq!(items[0].description, "Precision Timers Single");
        assert_eq!(items[0].unit_price, Some(dec("0.468")));
        assert_eq!(items[0].url.as_deref(), Some("https://www.mouser.com/ProductDetail/595-NE555P"));

        assert_eq!(items[1].shipped, Some(4));
        assert_eq!(items[1].balance, Some(1));
        assert_eq!(items[1].description, "Linear Voltage Regulators 5.0V 1.5A Positive");
        assert_eq!(items[1].purchase_order.as_deref(), Some("PROJ-LAMP"));
    }

    #[test]
    fn test_totals_end_table_without_merchandise_line() {
        let text = "\
Mouser Electronics, Inc.
Invoice No: 71234568
1 595-NE555P NE555P 10 10 0 0.468 4.68
Mfr.: Texas Instruments
Desc.: Precision Timers
Freight: 7.99
Tax: 0.57
Invoice Total: 13.24
Thank you for your business
";
        let receipt = parse_text(&MouserParser, "m.pdf", text);
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].description, "Precision Timers");
        assert_eq!(receipt.order.total, Some(dec("13.24")));
    }

    #[test]
    fn test_items_flush_without_terminator() {
        let text = "1 595-NE555P NE555P 1 1 0 0.47 0.47\n2 511-L7805CV L7805CV 1 1 0 0.56 0.56";
        let order = MouserParser.order_from_text(Path::new("m.pdf"), text);
        assert_eq!(MouserParser.items_from_text(&order, text).len(), 2);
    }
}
