//! Vendor detection and dispatch.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::models::receipt::Vendor;
use crate::pdf::Document;

use super::{
    ArduinoParser, BambuLabParser, DigiKeyParser, McMasterParser, MouserParser, NewarkParser,
    VendorParser,
};

/// Every known parser, in probe order.
pub fn all_parsers() -> Vec<Box<dyn VendorParser>> {
    vec![
        Box::new(McMasterParser),
        Box::new(DigiKeyParser),
        Box::new(MouserParser),
        Box::new(NewarkParser),
        Box::new(ArduinoParser),
        Box::new(BambuLabParser),
    ]
}

/// Ordered set of parsers probed against each document.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn VendorParser>>,
}

impl ParserRegistry {
    /// Registry probing `parsers` in the given order.
    pub fn new(parsers: Vec<Box<dyn VendorParser>>) -> Self {
        Self { parsers }
    }

    /// Vendors in probe order.
    pub fn vendors(&self) -> Vec<Vendor> {
        self.parsers.iter().map(|p| p.vendor()).collect()
    }

    /// First parser whose detector accepts `document`.
    ///
    /// A detector that panics is treated as a non-match and probing moves on.
    pub fn pick_parser(&self, document: &Document<'_>) -> Option<&dyn VendorParser> {
        self.pick_index(document).map(|i| self.parsers[i].as_ref())
    }

    fn pick_index(&self, document: &Document<'_>) -> Option<usize> {
        for (index, parser) in self.parsers.iter().enumerate() {
            let parser = parser.as_ref();
            match catch_unwind(AssertUnwindSafe(|| parser.detect(document))) {
                Ok(true) => {
                    debug!("{} detected as {}", document.path().display(), parser.vendor());
                    return Some(index);
                }
                Ok(false) => {}
                Err(_) => {
                    warn!(
                        "{} detector panicked on {}",
                        parser.vendor(),
                        document.path().display()
                    );
                }
            }
        }

        debug!("no parser recognized {}", document.path().display());
        None
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new(all_parsers())
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("vendors", &self.vendors())
            .finish()
    }
}

/// Pick a parser for `document` from the default registry.
pub fn pick_parser(document: &Document<'_>) -> Option<Box<dyn VendorParser>> {
    let registry = ParserRegistry::default();
    let index = registry.pick_index(document)?;
    registry.parsers.into_iter().nth(index)
}
