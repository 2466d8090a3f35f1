//! Compiled regex patterns for vendor receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Shared

    /// `price total` pair closing a description line.
    pub static ref TRAILING_PRICES: Regex = Regex::new(
        r"(?:^|\s)[$€£]?([0-9][0-9,]*\.[0-9]{2,5})\s+[$€£]?([0-9][0-9,]*\.[0-9]{2})\s*$"
    ).unwrap();

    pub static ref PAGE_FOOTER: Regex = Regex::new(
        r"(?i)^page\s+\d+(?:\s+of\s+\d+)?$"
    ).unwrap();

    pub static ref SKU_LINE: Regex = Regex::new(
        r"(?i)^SKU\s*:?\s*(\S+)"
    ).unwrap();

    pub static ref URL_LINE: Regex = Regex::new(
        r"^(https?://\S+)$"
    ).unwrap();

    /// Charge or total row under an item table, e.g. `Freight: 7.99`.
    pub static ref TOTALS_LINE: Regex = Regex::new(
        r"(?i)^(?:freight|shipping(?:\s*(?:&|and)\s*handling)?|sales\s+tax|tax|invoice\s+total|order\s+total|total(?:\s+amount)?)\s*:?\s*[$€£]?\s*[0-9][0-9,]*\.[0-9]{2}\b"
    ).unwrap();

    // Web storefront order headers (Arduino, Bambu Lab)
    pub static ref STORE_ORDER_NUMBER: Regex = Regex::new(
        r"(?i)Order\s*(?:#|No\.|No\b|number\b)\s*:?\s*([A-Z0-9][A-Z0-9\-]*)"
    ).unwrap();

    pub static ref STORE_ORDER_DATE: Regex = Regex::new(
        r"(?im)Order\s+date\s*:?[ \t]*([^\r\n]+)$"
    ).unwrap();

    pub static ref STORE_PAYMENT: Regex = Regex::new(
        r"(?im)^[ \t]*Payment(?:\s+method)?\s*:[ \t]*([^\r\n]+)$"
    ).unwrap();

    // McMaster-Carr
    pub static ref MCMASTER_PO: Regex = Regex::new(
        r"(?i)Purchase\s+Order(?:\s+(?:No\.?|Number|#))?\s*:?\s*([A-Z0-9][A-Z0-9\-/]*)"
    ).unwrap();

    pub static ref MCMASTER_INVOICE: Regex = Regex::new(
        r"(?im)^[ \t]*Invoice(?:\s+(?:No\.?|Number|#))?\s*:?\s*(\d{5,})"
    ).unwrap();

    pub static ref MCMASTER_INVOICE_DATE: Regex = Regex::new(
        r"(?i)Invoice\s+Date\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4}|[A-Z][a-z]+\.?\s+\d{1,2},?\s+\d{4})"
    ).unwrap();

    pub static ref MCMASTER_ACCOUNT: Regex = Regex::new(
        r"(?i)Account\s+(?:Number|No\.?|#)\s*:?\s*([A-Z0-9][A-Z0-9\-]*)"
    ).unwrap();

    pub static ref MCMASTER_PAYMENT_DATE: Regex = Regex::new(
        r"(?i)Payment\s+Date\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4}|[A-Z][a-z]+\.?\s+\d{1,2},?\s+\d{4})"
    ).unwrap();

    pub static ref MCMASTER_CARD: Regex = Regex::new(
        r"(?im)(?:Credit\s+Card|Paid\s+(?:by|with))\s*:?[ \t]*([^\r\n]+)$"
    ).unwrap();

    /// line, part, description, ordered, shipped, balance, [unit], price, total
    pub static ref MCMASTER_ITEM: Regex = Regex::new(
        r"^(\d+)\s+(\d{3,5}[A-Z]\d{1,4}(?:-[A-Z0-9]+)?)\s+(?:(.*?)\s+)?(\d+)\s+(\d+)\s+(\d+)(?:\s+[A-Za-z][A-Za-z.]*)?\s+\$?([0-9][0-9,]*\.[0-9]{2,4})\s+\$?([0-9][0-9,]*\.[0-9]{2})$"
    ).unwrap();

    /// Item whose quantities wrapped onto the next line.
    pub static ref MCMASTER_ITEM_HEAD: Regex = Regex::new(
        r"^(\d+)\s+(\d{3,5}[A-Z]\d{1,4}(?:-[A-Z0-9]+)?)(?:\s+(.*))?$"
    ).unwrap();

    pub static ref MCMASTER_QUANTITIES: Regex = Regex::new(
        r"^(\d+)\s+(\d+)\s+(\d+)(?:\s+[A-Za-z][A-Za-z.]*)?\s+\$?([0-9][0-9,]*\.[0-9]{2,4})\s+\$?([0-9][0-9,]*\.[0-9]{2})$"
    ).unwrap();

    // Digi-Key
    pub static ref DIGIKEY_PO_ACK: Regex = Regex::new(
        r"(?i)PO Acknowledgement\s+(\d+)"
    ).unwrap();

    pub static ref DIGIKEY_WEB_ORDER: Regex = Regex::new(
        r"(?i)WEB ORDER ID:\s*(\d+)"
    ).unwrap();

    pub static ref DIGIKEY_ORDER_DATE: Regex = Regex::new(
        r"(?i)Order Date:\s*([0-9\-A-Z]+)"
    ).unwrap();

    /// line, ordered, shipped, balance, part
    pub static ref DIGIKEY_PART: Regex = Regex::new(
        r"^(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+PART:\s*([A-Z0-9\-./#]+)"
    ).unwrap();

    // Mouser
    pub static ref MOUSER_INVOICE: Regex = Regex::new(
        r"(?i)Invoice\s+(?:No\.?|Number|#)\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref MOUSER_SALES_ORDER: Regex = Regex::new(
        r"(?i)Sales\s+Order\s+(?:No\.?|Number|#)\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref MOUSER_PO: Regex = Regex::new(
        r"(?i)(?:Customer\s+PO|P\.?O\.?\s+(?:No\.?|Number|#))\s*:?\s*([A-Z0-9][A-Z0-9\-/_.]*)"
    ).unwrap();

    pub static ref MOUSER_DATE: Regex = Regex::new(
        r"(?i)(?:Invoice|Order)\s+Date\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4})"
    ).unwrap();

    pub static ref MOUSER_ACCOUNT: Regex = Regex::new(
        r"(?i)(?:Account|Customer)\s+(?:No\.?|Number|#)\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref MOUSER_TERMS: Regex = Regex::new(
        r"(?im)^[ \t]*(?:Terms|Payment\s+Method)\s*:?[ \t]*([^\r\n]+)$"
    ).unwrap();

    /// line, mouser part, manufacturer part, ordered, shipped, backorder, price, extended
    pub static ref MOUSER_ITEM: Regex = Regex::new(
        r"(?i)^(\d+)\s+(\d{2,4}-[A-Z0-9][A-Z0-9\-./+#]*)\s+(\S+)\s+(\d+)\s+(\d+)\s+(\d+)\s+\$?([0-9][0-9,]*\.[0-9]{2,5})\s+\$?([0-9][0-9,]*\.[0-9]{2})$"
    ).unwrap();

    pub static ref MOUSER_DETAIL: Regex = Regex::new(
        r"(?i)^(Mfr|Desc)\.?\s*:\s*(.*)$"
    ).unwrap();

    // Newark
    pub static ref NEWARK_ORDER: Regex = Regex::new(
        r"(?i)Order\s+(?:Number|No\.?|#)\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref NEWARK_INVOICE: Regex = Regex::new(
        r"(?i)Invoice\s+(?:Number|No\.?|#)\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref NEWARK_PO: Regex = Regex::new(
        r"(?i)(?:Your\s+PO|Customer\s+PO|Purchase\s+Order)(?:\s+(?:Number|No\.?|#))?\s*:?\s*([A-Z0-9][A-Z0-9\-/_.]*)"
    ).unwrap();

    pub static ref NEWARK_DATE: Regex = Regex::new(
        r"(?i)(?:Invoice|Order)\s+Date\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4}|\d{4}-\d{2}-\d{2})"
    ).unwrap();

    pub static ref NEWARK_ACCOUNT: Regex = Regex::new(
        r"(?i)(?:Customer|Account)\s+(?:Number|No\.?|#)\s*:?\s*(\d+)"
    ).unwrap();

    /// line, newark part, "MANUFACTURER MFRPART", ordered, shipped, backorder, price, extended
    pub static ref NEWARK_ITEM: Regex = Regex::new(
        r"(?i)^(\d+)\s+(\d{1,2}[A-Z]{1,2}\d{3,5})\s+(.+?)\s+(\d+)\s+(\d+)\s+(\d+)\s+\$?([0-9][0-9,]*\.[0-9]{2,5})\s+\$?([0-9][0-9,]*\.[0-9]{2})$"
    ).unwrap();

    /// Compliance lines printed under each item.
    pub static ref NEWARK_NOISE: Regex = Regex::new(
        r"(?i)^(?:COO|Country\s+of\s+Origin|ECCN|HTS|Tariff|Cust(?:omer)?\s+Part)\b"
    ).unwrap();

    // Arduino Store
    /// description, quantity, line total
    pub static ref ARDUINO_ITEM: Regex = Regex::new(
        r"^(.+?)\s+[x×]\s*(\d+)\s+[$€£]?\s*([0-9][0-9.,]*[.,][0-9]{2})(?:\s*[A-Z]{3})?$"
    ).unwrap();

    // Bambu Lab store
    /// description, unit price, quantity, line total
    pub static ref BAMBU_ITEM: Regex = Regex::new(
        r"^(.+?)\s+[$€£]\s*([0-9][0-9.,]*[.,][0-9]{2})\s*[x×]\s*(\d+)\s+[$€£]\s*([0-9][0-9.,]*[.,][0-9]{2})$"
    ).unwrap();

    pub static ref BAMBU_VARIANT: Regex = Regex::new(
        r"(?i)^(?:Variant|Colou?r|Options?)\s*:\s*(.+)$"
    ).unwrap();
}
