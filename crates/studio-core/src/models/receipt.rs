//! Parsed receipt data models shared by every vendor parser.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pdf::file_name_of;
use crate::vendors::coerce::to_date;

/// Vendors with a receipt grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    McMaster,
    DigiKey,
    Mouser,
    Newark,
    Arduino,
    BambuLab,
}

impl Vendor {
    /// Every vendor, in registry order.
    pub const ALL: [Vendor; 6] = [
        Vendor::McMaster,
        Vendor::DigiKey,
        Vendor::Mouser,
        Vendor::Newark,
        Vendor::Arduino,
        Vendor::BambuLab,
    ];

    /// Identifier used in part keys and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::McMaster => "mcmaster",
            Vendor::DigiKey => "digikey",
            Vendor::Mouser => "mouser",
            Vendor::Newark => "newark",
            Vendor::Arduino => "arduino",
            Vendor::BambuLab => "bambulab",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace(['-', ' ', '_'], "");
        Vendor::ALL
            .into_iter()
            .find(|v| v.as_str() == needle)
            .ok_or_else(|| format!("unknown vendor: {}", s))
    }
}

/// Header-level fields of one vendor document.
///
/// Every optional field stays `None` when the document does not carry it;
/// nothing here is defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedOrder {
    pub vendor: Vendor,
    pub source_file: String,
    pub pdf_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
    /// As printed on the document; see [`ParsedOrder::invoice_date_parsed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    /// Payment instrument, e.g. "Visa ending in 4242".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchandise: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_tax: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

impl ParsedOrder {
    /// An order with only its identity filled in.
    pub fn new(vendor: Vendor, path: &Path) -> Self {
        Self {
            vendor,
            source_file: file_name_of(path),
            pdf_path: path.display().to_string(),
            purchase_order: None,
            invoice: None,
            invoice_date: None,
            account_number: None,
            payment_date: None,
            credit_card: None,
            merchandise: None,
            shipping: None,
            sales_tax: None,
            total: None,
        }
    }

    pub fn invoice_date_parsed(&self) -> Option<NaiveDate> {
        self.invoice_date.as_deref().and_then(to_date)
    }

    pub fn payment_date_parsed(&self) -> Option<NaiveDate> {
        self.payment_date.as_deref().and_then(to_date)
    }

    /// Human-readable dump of the extracted header, for the debug channel.
    pub fn debug_report(&self) -> String {
        fn show<T: fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map(|x| x.to_string()).unwrap_or_else(|| "-".to_string())
        }

        let mut out = format!("\n[{} ORDER] {}\n", self.vendor.as_str().to_uppercase(), self.source_file);
        let rows: [(&str, String); 11] = [
            ("purchase_order", show(&self.purchase_order)),
            ("invoice", show(&self.invoice)),
            ("invoice_date", show(&self.invoice_date)),
            ("account_number", show(&self.account_number)),
            ("payment_date", show(&self.payment_date)),
            ("credit_card", show(&self.credit_card)),
            ("merchandise", show(&self.merchandise)),
            ("shipping", show(&self.shipping)),
            ("sales_tax", show(&self.sales_tax)),
            ("total", show(&self.total)),
            ("pdf_path", self.pdf_path.clone()),
        ];
        for (label, value) in rows {
            out.push_str(&format!("  {}: {}\n", label, value));
        }
        out
    }
}

/// One purchased SKU within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLineItem {
    pub vendor: Vendor,
    pub source_file: String,
    pub invoice: Option<String>,
    pub purchase_order: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Vendor catalog number; empty when the document does not show one.
    pub sku: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_total: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfg_part: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ParsedLineItem {
    /// A blank item that inherits vendor, file and invoice/PO from `order`.
    pub fn for_order(order: &ParsedOrder) -> Self {
        Self {
            vendor: order.vendor,
            source_file: order.source_file.clone(),
            invoice: order.invoice.clone(),
            purchase_order: order.purchase_order.clone(),
            line: None,
            sku: String::new(),
            description: String::new(),
            ordered: None,
            shipped: None,
            balance: None,
            unit_price: None,
            line_total: None,
            manufacturer: None,
            mfg_part: None,
            url: None,
        }
    }

    /// Inventory key, `vendor:sku`.
    pub fn part_key(&self) -> String {
        format!("{}:{}", self.vendor, self.sku)
    }

    /// Units that actually arrived: shipped when known, otherwise ordered.
    pub fn received_quantity(&self) -> Option<u32> {
        self.shipped.or(self.ordered)
    }

    /// Amount spent on this line, falling back to unit price times quantity.
    ///
    /// A product too large for `Decimal` counts as unknown.
    pub fn spend(&self) -> Option<Decimal> {
        self.line_total.or_else(|| {
            let qty = self.received_quantity()?;
            self.unit_price?.checked_mul(Decimal::from(qty))
        })
    }

    /// Cost per received unit, zero when it cannot be computed.
    pub fn average_unit_cost(&self) -> Decimal {
        match (self.spend(), self.received_quantity()) {
            (Some(spend), Some(qty)) if qty > 0 => spend
                .checked_div(Decimal::from(qty))
                .unwrap_or_default(),
            _ => Decimal::ZERO,
        }
    }

    /// Append a fragment to the description. Runs of whitespace collapse to
    /// one space.
    pub fn push_description(&mut self, fragment: &str) {
        for word in fragment.split_whitespace() {
            if !self.description.is_empty() {
                self.description.push(' ');
            }
            self.description.push_str(word);
        }
    }
}

/// An order together with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    pub order: ParsedOrder,
    pub items: Vec<ParsedLineItem>,
}

impl ParsedReceipt {
    /// Sum of the line totals that could be read.
    pub fn items_total(&self) -> Decimal {
        self.items
            .iter()
            .filter_map(|i| i.line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
