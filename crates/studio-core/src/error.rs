//! Error types for the studio-core library.

use thiserror::Error;

/// Main error type for the studio library.
#[derive(Error, Debug)]
pub enum StudioError {
    /// PDF or text extraction error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Inventory store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to obtaining text from a document.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// No extractor handles this kind of file.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Reading the document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to receipt field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document produced no text at all.
    #[error("no text could be extracted from {0}")]
    NoText(String),
}

/// Errors raised by the inventory store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The part key has never been received.
    #[error("unknown part key: {0}")]
    UnknownPart(String),

    /// Quantities logged against the store must be positive.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
}

impl From<rusqlite::Error> for StudioError {
    fn from(err: rusqlite::Error) -> Self {
        StudioError::Store(StoreError::Sqlite(err))
    }
}

/// Result type for the studio library.
pub type Result<T> = std::result::Result<T, StudioError>;
