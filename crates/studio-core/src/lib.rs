//! Core library for studio inventory receipt ingestion.
//!
//! This crate provides:
//! - Text extraction from vendor receipts (PDF and plain-text dumps)
//! - Per-vendor receipt parsers behind one `VendorParser` trait
//! - A parser registry that detects which vendor produced a document
//! - Field coercion helpers shared by every vendor grammar
//! - A SQLite store for received parts and usage removals

pub mod error;
pub mod models;
pub mod pdf;
pub mod store;
pub mod vendors;

pub use error::{ExtractionError, PdfError, Result, StoreError, StudioError};
pub use models::config::StudioConfig;
pub use models::receipt::{ParsedLineItem, ParsedOrder, ParsedReceipt, Vendor};
pub use pdf::{
    DefaultExtractor, Document, MemoryExtractor, PdfTextExtractor, PlainTextExtractor, TextExtractor,
};
pub use store::{IngestSummary, PartRecord, Store};
pub use vendors::{all_parsers, pick_parser, ParserRegistry, VendorParser};
