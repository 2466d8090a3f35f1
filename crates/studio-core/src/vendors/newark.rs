//! Newark (Avnet) invoices.

use std::path::Path;

use crate::error::Result;
use crate::models::receipt::{ParsedLineItem, ParsedOrder, Vendor};
use crate::pdf::Document;

use super::coerce::{capture, contains_any, first_money, money_at_line_start, to_decimal, to_int};
use super::patterns::{
    NEWARK_ACCOUNT, NEWARK_DATE, NEWARK_INVOICE, NEWARK_ITEM, NEWARK_NOISE, NEWARK_ORDER,
    NEWARK_PO, PAGE_FOOTER, TOTALS_LINE,
};
use super::{content_lines, filename_matches, starts_with_any, VendorParser};

const FILENAME_HINTS: &[&str] = &["newark"];

/// Newark alone is too common a word; it must come with one of these.
const COMPANION_MARKERS: &[&str] = &["avnet", "newark.com"];

const TABLE_END: &[&str] = &["Sub Total", "Subtotal", "Merchandise"];

const PRODUCT_URL: &str = "https://www.newark.com/search?st=";

#[derive(Debug, Default, Clone, Copy)]
pub struct NewarkParser;

impl VendorParser for NewarkParser {
    fn vendor(&self) -> Vendor {
        Vendor::Newark
    }

    fn try_detect(&self, document: &Document<'_>) -> Result<bool> {
        if filename_matches(document, FILENAME_HINTS) {
            return Ok(true);
        }
        let text = document.first_page_text()?;
        Ok(contains_any(&text, &["newark"]) && contains_any(&text, COMPANION_MARKERS))
    }

    fn order_from_text(&self, path: &Path, text: &str) -> ParsedOrder {
        let mut order = ParsedOrder::new(self.vendor(), path);

        order.invoice = capture(&NEWARK_INVOICE, text).or_else(|| capture(&NEWARK_ORDER, text));
        order.purchase_order = capture(&NEWARK_PO, text);
        order.invoice_date = capture(&NEWARK_DATE, text);
        order.account_number = capture(&NEWARK_ACCOUNT, text);

        order.merchandise = first_money(&["Sub Total", "Subtotal", "Merchandise"], text);
        order.shipping = first_money(&["Freight", "Shipping"], text);
        order.sales_tax = first_money(&["Sales Tax", "Tax"], text);
        order.total = first_money(&["Total Amount", "Invoice Total"], text)
            .or_else(|| money_at_line_start("Total", text));

        order
    }

    fn items_from_text(&self, order: &ParsedOrder, text: &str) -> Vec<ParsedLineItem> {
        let mut items = Vec::new();
        let mut current: Option<ParsedLineItem> = None;

        for line in content_lines(text) {
            if let Some(caps) = NEWARK_ITEM.captures(line) {
                let mut item = ParsedLineItem::for_order(order);
                item.line = to_int(&caps[1]);
                item.sku = caps[2].to_uppercase();
                let (manufacturer, mfg_part) = split_manufacturer(&caps[3]);
                item.manufacturer = manufacturer;
                item.mfg_part = mfg_part;
                item.ordered = to_int(&caps[4]);
                item.shipped = to_int(&caps[5]);
                item.balance = to_int(&caps[6]);
                item.unit_price = to_decimal(&caps[7]);
                item.line_total = to_decimal(&caps[8]);
                item.url = Some(format!("{}{}", PRODUCT_URL, item.sku));
                items.extend(current.replace(item));
                continue;
            }

            let Some(item) = current.as_mut() else {
                continue;
            };

            if starts_with_any(line, TABLE_END) || TOTALS_LINE.is_match(line) {
                break;
            }
            if PAGE_FOOTER.is_match(line) || NEWARK_NOISE.is_match(line) {
                continue;
            }
            item.push_description(line);
        }

        items.extend(current);
        items
    }
}

/// `"MOLEX 22-23-2031"` into manufacturer and part; the part is the last token.
fn split_manufacturer(s: &str) -> (Option<String>, Option<String>) {
    let s = s.trim();
    match s.rsplit_once(char::is_whitespace) {
        Some((manufacturer, part)) => (
            Some(manufacturer.trim().to_string()),
            Some(part.to_string()),
        ),
        None if s.is_empty() => (None, None),
        None => (None, Some(s.to_string())),
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
Newark, An Avnet Company
300 S Riverside Plaza, Chicago, IL 60606
www.newark.com
Invoice Number: 9012345
Order Number: 1234567
Your PO: CNC-SPINDLE
Invoice Date: 02/20/2024
Customer Number: 3344556
Line Newark Part Manufacturer Part Ordered Shipped Backorder Price Extended
1 38K0354 VISHAY CRCW080510K0FKEA 50 50 0 0.052 2.60
Thick Film Resistor, 10 kohm, 0805
COO: TW
ECCN: EAR99
2 66AC8424 MOLEX 22-23-2031 10 10 0 0.21 2.10
Wire-To-Board Connector, 3 Contacts
Sub Total 4.70
Freight 9.50
Tax 0.38
Total Amount 14.58
";

    #[test]
    fn test_detect() {
        assert!(detect_text(&NewarkParser, "x.pdf", INVOICE));
        assert!(detect_text(&NewarkParser, "newark-feb.pdf", "scan"));
        assert!(!detect_text(&NewarkParser, "x.pdf", "Shipped to Newark, NJ 07102"));
    }

    #[test]
    fn test_order_fields() {
        let order = NewarkParser.order_from_text(Path::new("n.pdf"), INVOICE);
        assert_eq!(order.invoice.as_deref(), Some("9012345"));
        assert_eq!(order.purchase_order.as_deref(), Some("CNC-SPINDLE"));
        assert_eq!(order.invoice_date.as_deref(), Some("02/20/2024"));
        assert_eq!(order.account_number.as_deref(), Some("3344556"));
        assert_eq!(order.merchandise, Some(dec("4.70")));
        assert_eq!(order.shipping, Some(dec("9.50")));
        assert_eq!(order.sales_tax, Some(dec("0.38")));
        assert_eq!(order.total, Some(dec("14.58")));
    }

    #[test]
    fn test_order_number_fallback() {
        let order = NewarkParser.order_from_text(Path::new("n.pdf"), "Order Number: 1234567");
        assert_eq!(order.invoice.as_deref(), Some("1234567"));
    }

    #[test]
    fn test_line_items() {
        let receipt = parse_text(&NewarkParser, "n.pdf", INVOICE);
        let items = &receipt.items;
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].sku, "38K0354");
        assert_eq!(items[0].manufacturer.as_deref(), Some("VISHAY"));
        assert_eq!(items[0].mfg_part.as_deref(), Some("CRCW080510K0FKEA"));
        assert_eq!(items[0].description, "Thick Film Resistor, 10 kohm, 0805");
        assert_eq!(items[0].unit_price, Some(dec("0.052")));
        assert_eq!(items[0].url.as_deref(), Some("https://www.newark.com/search?st=38K0354"));

        assert_eq!(items[1].sku, "66AC8424");
        assert_eq!(items[1].manufacturer.as_deref(), Some("MOLEX"));
        assert_eq!(items[1].mfg_part.as_deref(), Some("22-23-2031"));
        assert_eq!(items[1].description, "Wire-To-Board Connector, 3 Contacts");
    }

    #[test]
    fn test_totals_end_table_without_subtotal_line() {
        let text = "\
Newark, An Avnet Company
Invoice Number: 9012346
1 38K0354 VISHAY CRCW080510K0FKEA 50 50 0 0.052 2.60
Thick Film Resistor, 10 kohm, 0805
Freight 9.50
Tax: 0.21
Invoice Total 12.31
Remit to: Newark, PO Box 94151
";
        let receipt = parse_text(&NewarkParser, "n.pdf", text);
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].description, "Thick Film Resistor, 10 kohm, 0805");
        assert_eq!(receipt.order.total, Some(dec("12.31")));
    }

    #[test]
    fn test_split_manufacturer() {
        assert_eq!(
            split_manufacturer("TE CONNECTIVITY 1-776087-1"),
            (Some("TE CONNECTIVITY".to_string()), Some("1-776087-1".to_string()))
        );
        assert_eq!(split_manufacturer("LM358N"), (None, Some("LM358N".to_string())));
    }
}
