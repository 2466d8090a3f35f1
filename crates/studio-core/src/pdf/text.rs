//! Extractors that work from text that is already available.

use std::fs;
use std::path::Path;

use super::{Result, TextExtractor};

/// Form feed, the page separator `pdftotext` writes.
const PAGE_BREAK: char = '\x0c';

/// Reads a text dump of a receipt, one page per form-feed separated block.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>> {
        let content = fs::read_to_string(path)?;
        Ok(split_pages(&content))
    }
}

/// Serves fixed page text for any path.
///
/// Useful when the text came from somewhere else (an OCR pass, a test
/// fixture) and only needs to be run through the vendor parsers.
#[derive(Debug, Default, Clone)]
pub struct MemoryExtractor {
    pages: Vec<Option<String>>,
}

impl MemoryExtractor {
    pub fn new(pages: Vec<Option<String>>) -> Self {
        Self { pages }
    }

    /// Single-page document, or a multi-page one if `text` has form feeds.
    pub fn from_text(text: &str) -> Self {
        Self::new(split_pages(text))
    }
}

impl TextExtractor for MemoryExtractor {
    fn extract_pages(&self, _path: &Path) -> Result<Vec<Option<String>>> {
        Ok(self.pages.clone())
    }
}

fn split_pages(content: &str) -> Vec<Option<String>> {
    content
        .split(PAGE_BREAK)
        .map(|page| {
            if page.trim().is_empty() {
                None
            } else {
                Some(page.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages() {
        let pages = split_pages("one\x0c\x0cthree");
        assert_eq!(
            pages,
            vec![Some("one".to_string()), None, Some("three".to_string())]
        );
    }

    #[test]
    fn test_memory_extractor_ignores_path() {
        let extractor = MemoryExtractor::from_text("Mouser Electronics");
        let pages = extractor.extract_pages(Path::new("anything.pdf")).unwrap();
        assert_eq!(pages, vec![Some("Mouser Electronics".to_string())]);
    }

    #[test]
    fn test_empty_text_is_one_blank_page() {
        let extractor = MemoryExtractor::from_text("");
        assert_eq!(extractor.extract_first_page(Path::new("x.pdf")).unwrap(), None);
    }
}
