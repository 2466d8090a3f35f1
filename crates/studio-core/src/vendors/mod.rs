//! Vendor receipt parsers.
//!
//! Each supported vendor gets its own grammar behind [`VendorParser`]. The
//! registry probes them in a fixed order and hands the document to the first
//! one that recognizes it.

pub mod coerce;
pub mod patterns;
mod registry;

mod arduino;
mod bambulab;
mod digikey;
mod mcmaster;
mod mouser;
mod newark;

pub use arduino::ArduinoParser;
pub use bambulab::BambuLabParser;
pub use digikey::DigiKeyParser;
pub use mcmaster::McMasterParser;
pub use mouser::MouserParser;
pub use newark::NewarkParser;
pub use registry::{all_parsers, pick_parser, ParserRegistry};

use std::path::Path;

use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::models::receipt::{ParsedLineItem, ParsedOrder, ParsedReceipt, Vendor};
use crate::pdf::Document;

/// One vendor's receipt grammar.
///
/// Implementors supply detection and two pure text-level functions; the
/// document-level operations are provided on top of them and extract the
/// document text exactly once per call.
pub trait VendorParser: Send + Sync {
    /// Vendor this grammar belongs to.
    fn vendor(&self) -> Vendor;

    /// Check whether `document` was issued by this vendor.
    fn try_detect(&self, document: &Document<'_>) -> Result<bool>;

    /// Header fields from the full document text.
    fn order_from_text(&self, path: &Path, text: &str) -> ParsedOrder;

    /// Line items from the full document text.
    fn items_from_text(&self, order: &ParsedOrder, text: &str) -> Vec<ParsedLineItem>;

    /// Like [`VendorParser::try_detect`], with any failure counted as "not mine".
    fn detect(&self, document: &Document<'_>) -> bool {
        match self.try_detect(document) {
            Ok(found) => found,
            Err(e) => {
                debug!(
                    "{} detection failed for {}: {}",
                    self.vendor(),
                    document.path().display(),
                    e
                );
                false
            }
        }
    }

    /// Parse the order header.
    fn parse_order(&self, document: &Document<'_>, debug: bool) -> Result<ParsedOrder> {
        let text = document_text(document)?;
        let order = self.order_from_text(document.path(), &text);
        if debug {
            print!("{}", order.debug_report());
        }
        Ok(order)
    }

    /// Parse the item table. Items carry the order's invoice and PO.
    fn parse_line_items(
        &self,
        document: &Document<'_>,
        debug: bool,
    ) -> Result<Vec<ParsedLineItem>> {
        Ok(self.parse(document, debug)?.items)
    }

    /// Parse header and items together.
    fn parse(&self, document: &Document<'_>, debug: bool) -> Result<ParsedReceipt> {
        let text = document_text(document)?;
        let order = self.order_from_text(document.path(), &text);
        let items = self.items_from_text(&order, &text);

        if debug {
            print!("{}", order.debug_report());
            println!(
                "[{}] parsed {} items",
                self.vendor().as_str().to_uppercase(),
                items.len()
            );
        }
        debug!(
            "{}: {} parsed {} items",
            document.file_name(),
            self.vendor(),
            items.len()
        );

        Ok(ParsedReceipt { order, items })
    }
}

/// Full text of `document`, rejecting documents with no text at all.
fn document_text(document: &Document<'_>) -> Result<String> {
    let text = document.full_text()?;
    if text.trim().is_empty() {
        return Err(ExtractionError::NoText(document.file_name()).into());
    }
    Ok(text)
}

/// File name contains any of `hints`, ignoring case.
pub(crate) fn filename_matches(document: &Document<'_>, hints: &[&str]) -> bool {
    coerce::contains_any(&document.file_name(), hints)
}

/// First page contains any of `markers`, ignoring case.
pub(crate) fn first_page_contains_any(document: &Document<'_>, markers: &[&str]) -> Result<bool> {
    Ok(coerce::contains_any(&document.first_page_text()?, markers))
}

/// Trimmed, non-empty lines of `text`.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// `line` opens with one of `labels`, ignoring case.
pub(crate) fn starts_with_any(line: &str, labels: &[&str]) -> bool {
    let lower = line.to_lowercase();
    labels.iter().any(|label| lower.starts_with(&label.to_lowercase()))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for driving parsers from fixture text.

    use std::path::Path;

    use crate::models::receipt::ParsedReceipt;
    use crate::pdf::{Document, MemoryExtractor};

    use super::VendorParser;

    pub fn detect_text(parser: &dyn VendorParser, file: &str, text: &str) -> bool {
        let extractor = MemoryExtractor::from_text(text);
        parser.detect(&Document::new(Path::new(file), &extractor))
    }

    pub fn parse_text(parser: &dyn VendorParser, file: &str, text: &str) -> ParsedReceipt {
        let extractor = MemoryExtractor::from_text(text);
        parser
            .parse(&Document::new(Path::new(file), &extractor), false)
            .unwrap()
    }
}
