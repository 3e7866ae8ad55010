//! # PDF Text Extraction
//!
//! Extracts the plain-text layer of an uploaded PDF, page by page, in page
//! order. No OCR and no layout reconstruction: a scanned, image-only PDF
//! yields empty or near-empty text, which is surfaced as a warning flag on
//! the [`Extraction`] rather than silently accepted or rejected.

use crate::errors::NavigatorError;
use pdf::file::FileOptions;
use tracing::{info, warn};

/// Below this average word count per page the extraction is flagged as
/// suspiciously short, which usually means a scanned document.
const MIN_WORDS_PER_PAGE: usize = 5;

/// Options for the text extraction pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Insert a `--- Page N ---` marker before each page's text.
    pub include_page_markers: bool,
}

/// The result of extracting a PDF's text layer.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub text: String,
    pub page_count: u32,
    pub word_count: usize,
}

impl Extraction {
    /// True when the document produced implausibly little text for its page
    /// count. Callers surface this as a warning, never as an error.
    pub fn is_suspiciously_short(&self) -> bool {
        self.word_count < MIN_WORDS_PER_PAGE * self.page_count.max(1) as usize
    }
}

/// Extracts text from all pages of a PDF.
///
/// PDF parsing is CPU-bound, so the synchronous pass runs under
/// `spawn_blocking`.
pub async fn extract_text(
    pdf_data: Vec<u8>,
    options: ExtractOptions,
) -> Result<Extraction, NavigatorError> {
    let extraction = tokio::task::spawn_blocking(move || extract_text_sync(&pdf_data, &options))
        .await
        .map_err(|e| NavigatorError::DocumentParse(format!("PDF parsing task failed: {e}")))??;

    info!(
        pages = extraction.page_count,
        words = extraction.word_count,
        "Extracted text from PDF."
    );
    if extraction.is_suspiciously_short() {
        warn!(
            pages = extraction.page_count,
            words = extraction.word_count,
            "Extraction produced implausibly little text; the PDF may be scanned images."
        );
    }
    Ok(extraction)
}

/// Synchronous extraction pass over every page's content stream.
pub fn extract_text_sync(
    pdf_data: &[u8],
    options: &ExtractOptions,
) -> Result<Extraction, NavigatorError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| NavigatorError::DocumentParse(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    let page_count = file.num_pages();
    for page_num in 0..page_count {
        let page = file
            .get_page(page_num)
            .map_err(|e| NavigatorError::DocumentParse(e.to_string()))?;

        if options.include_page_markers {
            full_text.push_str(&format!("--- Page {} ---\n", page_num + 1));
        }

        if let Some(content) = &page.contents {
            let operations = content
                .operations(&resolver)
                .map_err(|e| NavigatorError::DocumentParse(e.to_string()))?;
            for op in operations.iter() {
                match op {
                    pdf::content::Op::TextDraw { text } => {
                        full_text.push_str(&text.to_string_lossy());
                    }
                    pdf::content::Op::TextDrawAdjusted { array } => {
                        for item in array.iter() {
                            if let pdf::content::TextDrawAdjusted::Text(text) = item {
                                full_text.push_str(&text.to_string_lossy());
                            }
                        }
                    }
                    _ => {}
                }
            }
            full_text.push_str("\n\n");
        } else {
            warn!("Page {} has no content stream.", page_num + 1);
        }
    }

    let word_count = full_text.split_whitespace().count();
    Ok(Extraction {
        text: full_text,
        page_count,
        word_count,
    })
}
