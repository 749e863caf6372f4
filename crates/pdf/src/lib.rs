//! # carebot-pdf: PDF Text Extraction Plugin
//!
//! This crate pulls plain text out of uploaded PDF documents so it can be merged
//! into the knowledge blob. It implements the `DocumentExtractor` trait from the
//! core `carebot` library. Pages are extracted independently: one damaged page
//! does not cost the text of the others.

use carebot::{
    errors::DocumentExtractionError,
    ingest::{DocumentExtractor, PageText},
};
use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use tracing::{debug, warn};

/// The `DocumentExtractor` implementation for PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract_pages(
        &self,
        name: &str,
        data: &[u8],
    ) -> Result<Vec<PageText>, DocumentExtractionError> {
        let file = FileOptions::cached()
            .load(data)
            .map_err(|e| DocumentExtractionError::Document {
                document: name.to_string(),
                reason: e.to_string(),
            })?;
        let resolver = file.resolver();
        let page_count = file.num_pages();
        debug!(document = name, pages = page_count, "Opened PDF.");

        let mut pages = Vec::with_capacity(page_count as usize);
        for page_num in 0..page_count {
            let page_error = |reason: String| DocumentExtractionError::Page {
                document: name.to_string(),
                page: page_num + 1,
                reason,
            };

            let page = match file.get_page(page_num) {
                Ok(page) => page,
                Err(e) => {
                    pages.push(Err(page_error(e.to_string())));
                    continue;
                }
            };

            let Some(content) = &page.contents else {
                warn!(document = name, "Page {} has no content stream.", page_num + 1);
                pages.push(Ok(String::new()));
                continue;
            };

            let text = content
                .operations(&resolver)
                .map(|operations| collect_text(&operations))
                .map_err(|e| page_error(e.to_string()));
            pages.push(text);
        }
        Ok(pages)
    }
}

/// Concatenates the text-showing operators of a page, ending it with a newline
/// when it produced any text.
///
/// Lines are separated on `T*` and on any text-position move that changes the
/// baseline (`Td`/`TD` with a vertical offset, or a `Tm` with a new `y`). A
/// horizontal-only move becomes a space.
fn collect_text(operations: &[Op]) -> String {
    let mut text = String::new();
    let mut baseline: Option<f32> = None;
    for op in operations {
        match op {
            Op::TextDraw { text: drawn } => text.push_str(&drawn.to_string_lossy()),
            Op::TextDrawAdjusted { array } => {
                for item in array.iter() {
                    if let TextDrawAdjusted::Text(drawn) = item {
                        text.push_str(&drawn.to_string_lossy());
                    }
                }
            }
            Op::TextNewline => text.push('\n'),
            Op::MoveTextPosition { translation } => {
                if translation.y != 0.0 {
                    break_line(&mut text);
                } else if translation.x != 0.0 {
                    separate_words(&mut text);
                }
            }
            Op::SetTextMatrix { matrix } => {
                match baseline {
                    Some(y) if y != matrix.f => break_line(&mut text),
                    Some(_) => separate_words(&mut text),
                    None => {}
                }
                baseline = Some(matrix.f);
            }
            _ => {}
        }
    }
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn break_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

fn separate_words(text: &mut String) {
    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
}
