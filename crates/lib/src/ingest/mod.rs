//! # Document Ingestion
//!
//! Uploaded documents are turned into plain text before they are merged into the
//! knowledge blob. Extraction is pluggable: a crate that understands a document
//! format (e.g. `carebot-pdf`) implements [`DocumentExtractor`], and
//! [`collect_document_texts`] applies the recovery policy uniformly: a document
//! or page that fails contributes empty text and the batch carries on.

use crate::errors::DocumentExtractionError;
use tracing::{info, warn};

/// The outcome of extracting a single page.
pub type PageText = Result<String, DocumentExtractionError>;

/// An uploaded document awaiting extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// The file name given by the uploader, used in logs and errors.
    pub name: String,
    pub data: Vec<u8>,
}

/// A contract for plugins that pull text out of a document format.
pub trait DocumentExtractor: Send + Sync {
    /// Opens the document and extracts each page independently.
    ///
    /// An `Err` means the document could not be opened at all. A page-level
    /// failure is reported in that page's slot so the other pages still count.
    fn extract_pages(
        &self,
        name: &str,
        data: &[u8],
    ) -> Result<Vec<PageText>, DocumentExtractionError>;
}

/// Extracts every document, returning one text per document.
///
/// Failed documents and pages are logged and contribute an empty string.
pub fn collect_document_texts(
    extractor: &dyn DocumentExtractor,
    documents: &[UploadedDocument],
) -> Vec<String> {
    documents
        .iter()
        .map(|doc| match extractor.extract_pages(&doc.name, &doc.data) {
            Ok(pages) => {
                let mut text = String::new();
                for page in pages {
                    match page {
                        Ok(page_text) => text.push_str(&page_text),
                        Err(e) => warn!("Skipping page: {e}"),
                    }
                }
                info!(
                    document = %doc.name,
                    characters = text.chars().count(),
                    "Extracted document text."
                );
                text
            }
            Err(e) => {
                warn!("Skipping document: {e}");
                String::new()
            }
        })
        .collect()
}
