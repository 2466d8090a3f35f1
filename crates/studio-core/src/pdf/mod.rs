//! Document text extraction.
//!
//! Vendor parsers never touch a PDF library directly. They see a [`Document`],
//! which pairs a path with a [`TextExtractor`] and hands back per-page text.

mod extractor;
mod text;

pub use extractor::{PdfExtractor, PdfTextExtractor};
pub use text::{MemoryExtractor, PlainTextExtractor};

use std::path::Path;

use crate::error::PdfError;

/// Result type for text extraction.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Capability that turns a document on disk into per-page text.
///
/// A page whose text cannot be recovered is `None`; a document that cannot be
/// opened at all is an `Err`.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of every page, in page order.
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>>;

    /// Extract only the first page. Detection uses this, so implementations
    /// may override it with something cheaper than a full pass.
    fn extract_first_page(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.extract_pages(path)?.into_iter().next().flatten())
    }
}

/// Extractor that picks an implementation from the file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultExtractor {
    pdf: PdfTextExtractor,
    plain: PlainTextExtractor,
}

impl DefaultExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, path: &Path) -> Result<&dyn TextExtractor> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(&self.pdf),
            "txt" | "text" => Ok(&self.plain),
            other => Err(PdfError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }
}

impl TextExtractor for DefaultExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>> {
        self.select(path)?.extract_pages(path)
    }

    fn extract_first_page(&self, path: &Path) -> Result<Option<String>> {
        self.select(path)?.extract_first_page(path)
    }
}

/// A receipt on disk plus the capability used to read it.
#[derive(Clone, Copy)]
pub struct Document<'a> {
    path: &'a Path,
    extractor: &'a dyn TextExtractor,
}

impl<'a> Document<'a> {
    pub fn new(path: &'a Path, extractor: &'a dyn TextExtractor) -> Self {
        Self { path, extractor }
    }

    /// Path the document was opened from.
    pub fn path(&self) -> &Path {
        self.path
    }

    /// Final path component, used as the `source_file` of parsed records.
    pub fn file_name(&self) -> String {
        file_name_of(self.path)
    }

    /// Text of every page.
    pub fn pages(&self) -> Result<Vec<Option<String>>> {
        self.extractor.extract_pages(self.path)
    }

    /// Text of the first page, empty when the page has no text.
    pub fn first_page_text(&self) -> Result<String> {
        Ok(self.extractor.extract_first_page(self.path)?.unwrap_or_default())
    }

    /// All pages joined with newlines; pages without text contribute nothing.
    pub fn full_text(&self) -> Result<String> {
        let pages = self.pages()?;
        Ok(pages
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl std::fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("path", &self.path).finish()
    }
}

/// Lossy file name of a path, or the whole path when it has none.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
