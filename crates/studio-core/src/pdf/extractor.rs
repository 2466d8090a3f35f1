//! PDF text extraction using lopdf and pdf-extract.

use std::fs;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{Result, TextExtractor};
use crate::error::PdfError;

/// A loaded PDF, held only for as long as text is being pulled out of it.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Receipts exported from vendor portals are sometimes "encrypted" with an empty password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract works from bytes, so hand it the decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Extract text page by page.
    ///
    /// pdf-extract produces the better reading order, so it is tried first.
    /// When it fails (unusual fonts, broken content streams) lopdf's own
    /// per-page extraction is used instead.
    pub fn extract_page_texts(&self) -> Result<Vec<Option<String>>> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        match pdf_extract::extract_text_from_mem_by_pages(&self.raw_data) {
            Ok(pages) => {
                trace!("pdf-extract returned {} pages", pages.len());
                Ok(pages.into_iter().map(non_blank).collect())
            }
            Err(e) => {
                warn!("pdf-extract failed ({}), falling back to lopdf", e);
                let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
                let pages = page_numbers
                    .iter()
                    .map(|&n| match doc.extract_text(&[n]) {
                        Ok(text) => non_blank(text),
                        Err(e) => {
                            debug!("lopdf could not read page {}: {}", n, e);
                            None
                        }
                    })
                    .collect::<Vec<_>>();

                if pages.iter().all(Option::is_none) {
                    return Err(PdfError::TextExtraction(e.to_string()));
                }
                Ok(pages)
            }
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// [`TextExtractor`] for PDF files on disk.
///
/// Each call opens the file, extracts the text and drops the document before
/// returning, so no handle outlives the extraction step.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>> {
        let data = fs::read(path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;

        let pages = extractor.extract_page_texts()?;
        debug!(
            "Extracted {} pages ({} with text) from {}",
            pages.len(),
            pages.iter().filter(|p| p.is_some()).count(),
            path.display()
        );
        Ok(pages)
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_require_loaded_document() {
        let extractor = PdfExtractor::new();
        let err = extractor.extract_page_texts().unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PdfTextExtractor::new()
            .extract_pages(Path::new("/nonexistent/receipt.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  \n".to_string()), None);
        assert_eq!(non_blank("Total 1.00".to_string()).as_deref(), Some("Total 1.00"));
    }
}
