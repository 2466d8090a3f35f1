//! Best-effort conversion of matched text into typed values.
//!
//! Every function here is total: malformed input yields `None`, never a panic
//! or an error. Vendor grammars lean on this so that one odd token leaves a
//! field empty instead of failing the whole receipt.

use std::str::FromStr;

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::patterns::TRAILING_PRICES;

/// Money token accepted after a label: optional currency sign, `digits.dd`.
const MONEY_TAIL: &str = r"\s*:?\s*[$€£]?\s*([0-9][0-9,]*\.[0-9]{2})\b";

/// Same, but either separator may be the decimal point.
const AMOUNT_TAIL: &str = r"\s*:?\s*[$€£]?\s*([0-9][0-9.,]*[.,][0-9]{2})\b";

/// First capture group of `re` in `text`, trimmed. Empty captures are `None`.
pub fn capture(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    let value = caps.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Like [`capture`], compiling `pattern` case-insensitively on the spot.
///
/// An invalid pattern is treated as "no match".
pub fn find(pattern: &str, text: &str) -> Option<String> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    capture(&re, text)
}

/// Amount following `label` anywhere in `text`, e.g. `Sales Tax 4.50`.
pub fn money_after(label: &str, text: &str) -> Option<Decimal> {
    let pattern = format!(r"\b{}{}", label_pattern(label), MONEY_TAIL);
    find(&pattern, text).and_then(|s| to_decimal(&s))
}

/// Amount following `label` when the label opens a line.
///
/// Use this for bare labels like `Total` that also appear inside longer ones
/// (`Merchandise Total`, `Line Total`).
pub fn money_at_line_start(label: &str, text: &str) -> Option<Decimal> {
    let pattern = format!(r"(?m)^[ \t]*{}{}", label_pattern(label), MONEY_TAIL);
    find(&pattern, text).and_then(|s| to_decimal(&s))
}

/// Like [`money_after`], also accepting `1.234,56` notation.
pub fn amount_after(label: &str, text: &str) -> Option<Decimal> {
    let pattern = format!(r"\b{}{}", label_pattern(label), AMOUNT_TAIL);
    find(&pattern, text).and_then(|s| parse_amount(&s))
}

/// Like [`money_at_line_start`], also accepting `1.234,56` notation.
pub fn amount_at_line_start(label: &str, text: &str) -> Option<Decimal> {
    let pattern = format!(r"(?m)^[ \t]*{}{}", label_pattern(label), AMOUNT_TAIL);
    find(&pattern, text).and_then(|s| parse_amount(&s))
}

/// Escaped label whose spaces match any run of whitespace.
fn label_pattern(label: &str) -> String {
    regex::escape(label.trim()).replace(' ', r"\s+")
}

/// First label in `labels` that yields an amount.
pub fn first_money(labels: &[&str], text: &str) -> Option<Decimal> {
    labels.iter().find_map(|label| money_after(label, text))
}

/// Integer quantity. Accepts `"3"` and `"3.0"` (fraction truncated).
pub fn to_int(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }

    let value = Decimal::from_str(s).ok()?;
    if value.is_sign_negative() {
        return None;
    }
    value.trunc().to_u32()
}

/// Decimal amount. Strips currency signs, thousands separators and blanks.
pub fn to_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    if value.is_sign_negative() {
        None
    } else {
        Some(value)
    }
}

/// Amount in either `1,234.56` or `1.234,56` notation.
///
/// European storefronts print comma decimals; whichever separator comes last
/// is taken as the decimal point.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(c), None) if cleaned.len() - c == 3 => cleaned.replace(',', "."),
        _ => cleaned,
    };

    to_decimal(&normalized)
}

/// Calendar date from the formats vendors print.
pub fn to_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        // two-digit years first: %Y would happily read "24" as year 24
        "%m/%d/%y",
        "%m/%d/%Y",
        "%d-%b-%y",
        "%d-%b-%Y",
        "%d.%m.%Y",
        "%B %d, %Y",
        "%b %d, %Y",
        "%B %d %Y",
        "%d %B %Y",
        "%d %b %Y",
    ];

    let s = s.trim().trim_end_matches('.');
    if s.is_empty() {
        return None;
    }
    let s = s.replace("Sept ", "Sep ").replace("Sept.", "Sep.").replace(". ", " ");

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a `price total` pair off the end of a description.
///
/// `"Widget 1.00 2.00"` becomes `("Widget", Some(1.00), Some(2.00))`; text
/// without a trailing pair comes back unchanged with two `None`s.
pub fn split_trailing_prices(s: &str) -> (String, Option<Decimal>, Option<Decimal>) {
    match TRAILING_PRICES.captures(s) {
        Some(caps) => {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(s.len());
            (
                squash_whitespace(&s[..start]),
                to_decimal(&caps[1]),
                to_decimal(&caps[2]),
            )
        }
        None => (squash_whitespace(s), None, None),
    }
}

/// `text` contains any of `needles`, ignoring ASCII case.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    let haystack = text.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_int() {
        assert_eq!(to_int("3"), Some(3));
        assert_eq!(to_int(" 12 "), Some(12));
        assert_eq!(to_int("3.0"), Some(3));
        assert_eq!(to_int("3.9"), Some(3));
        assert_eq!(to_int(""), None);
        assert_eq!(to_int("   "), None);
        assert_eq!(to_int("abc"), None);
        assert_eq!(to_int("-2"), None);
        assert_eq!(to_int("$1,234.56"), None);
        assert_eq!(to_int("99999999999999"), None);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(to_decimal("3.0"), Some(dec("3")));
        assert_eq!(to_decimal("4.50"), Some(dec("4.50")));
        assert_eq!(to_decimal(" € 12.00 "), Some(dec("12")));
        assert_eq!(to_decimal("5"), Some(dec("5")));
        assert_eq!(to_decimal(""), None);
        assert_eq!(to_decimal("$"), None);
        assert_eq!(to_decimal("abc"), None);
        assert_eq!(to_decimal("-1.00"), None);
        assert_eq!(to_decimal("1.2.3"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("36,00"), Some(dec("36.00")));
        assert_eq!(parse_amount("€ 9.90"), Some(dec("9.90")));
        assert_eq!(parse_amount("1,234"), Some(dec("1234")));
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn test_capture_and_find() {
        let text = "PO Acknowledgement 81234567\nWEB ORDER ID: 55501";
        assert_eq!(
            find(r"PO Acknowledgement\s+(\d+)", text).as_deref(),
            Some("81234567")
        );
        assert_eq!(find(r"web order id:\s*(\d+)", text).as_deref(), Some("55501"));
        assert_eq!(find(r"Invoice\s+(\d+)", text), None);
        assert_eq!(find(r"(unclosed", text), None);
    }

    #[test]
    fn test_money_after() {
        let text = "Sales Amount 118.95\nSales Tax 4.50\nTotal 123.45";
        assert_eq!(money_after("Sales Tax", text), Some(dec("4.50")));
        assert_eq!(money_after("Total", text), Some(dec("123.45")));
        assert_eq!(money_after("sales amount", text), Some(dec("118.95")));
        assert_eq!(money_after("Shipping", text), None);
        assert_eq!(money_after("Sales Tax", "Sales   Tax:  4.50"), Some(dec("4.50")));
    }

    #[test]
    fn test_money_after_needs_cents() {
        assert_eq!(money_after("Total", "Total 123"), None);
        assert_eq!(money_after("Total", "Total: $1,204.10"), Some(dec("1204.10")));
        assert_eq!(money_after("Total", "Subtotal 9.00"), None);
    }

    #[test]
    fn test_money_at_line_start() {
        let text = "Merchandise Total: 7.83\nInvoice Total: 17.09\nTotal 17.09";
        assert_eq!(money_after("Total", text), Some(dec("7.83")));
        assert_eq!(money_at_line_start("Total", text), Some(dec("17.09")));
    }

    #[test]
    fn test_amount_after_accepts_comma_decimals() {
        let text = "Subtotal €56,00\nShipping € 9.90\nTotal €1.080,40 EUR";
        assert_eq!(amount_after("Subtotal", text), Some(dec("56.00")));
        assert_eq!(amount_after("Shipping", text), Some(dec("9.90")));
        assert_eq!(amount_at_line_start("Total", text), Some(dec("1080.40")));
        assert_eq!(amount_after("Taxes", text), None);
    }

    #[test]
    fn test_to_date() {
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(to_date("2024-01-15"), jan15);
        assert_eq!(to_date("01/15/2024"), jan15);
        assert_eq!(to_date("1/15/24"), jan15);
        assert_eq!(to_date("15-JAN-2024"), jan15);
        assert_eq!(to_date("January 15, 2024"), jan15);
        assert_eq!(to_date("15 January 2024"), jan15);
        assert_eq!(to_date("Sept 15, 2024"), NaiveDate::from_ymd_opt(2024, 9, 15));
        assert_eq!(to_date("September 15, 2024"), NaiveDate::from_ymd_opt(2024, 9, 15));
        assert_eq!(to_date("Jan. 15, 2024"), jan15);
        assert_eq!(to_date(""), None);
        assert_eq!(to_date("soon"), None);
        assert_eq!(to_date("13/45/2024"), None);
    }

    #[test]
    fn test_split_trailing_prices() {
        let (desc, price, total) = split_trailing_prices("Widget 1.00 2.00");
        assert_eq!(desc, "Widget");
        assert_eq!(price, Some(dec("1.00")));
        assert_eq!(total, Some(dec("2.00")));

        let (desc, price, total) = split_trailing_prices("CAP CER 0.1UF 50V  X7R 0805");
        assert_eq!(desc, "CAP CER 0.1UF 50V X7R 0805");
        assert_eq!(price, None);
        assert_eq!(total, None);

        let (desc, price, total) = split_trailing_prices("RES 10K OHM 1% 0.0230 2.30");
        assert_eq!(desc, "RES 10K OHM 1%");
        assert_eq!(price, Some(dec("0.0230")));
        assert_eq!(total, Some(dec("2.30")));
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("Thank you for ordering from DIGI-KEY Electronics", &["digi-key electronics"]));
        assert!(!contains_any("Mouser", &["newark", "avnet"]));
    }
}
