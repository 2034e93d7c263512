//! Content extractor — turns a submission into plain email text.
//!
//! Priority:
//! 1. File upload (`.pdf` → per-page text joined by spaces, `.txt` → UTF-8)
//! 2. Inline text, verbatim
//! 3. Nothing → `MissingContent`
//!
//! An empty email body counts as nothing. A PDF whose pages carry only
//! whitespace is rejected with `EmptyContent`. Everything happens in memory;
//! no temporary files are written.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::pipeline::types::{EmailSubmission, ExtractedContent};

/// File kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
}

impl FileKind {
    /// Classify a filename by extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if lower.ends_with(".txt") {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// Extract plain text from a submission.
pub fn extract(submission: Option<EmailSubmission>) -> Result<ExtractedContent, ExtractionError> {
    let text = match submission {
        Some(EmailSubmission::FileUpload { filename, bytes }) => {
            match FileKind::from_filename(&filename) {
                Some(FileKind::Pdf) => {
                    let text = extract_pdf(&bytes)?;
                    if text.trim().is_empty() {
                        return Err(ExtractionError::EmptyContent);
                    }
                    text
                }
                Some(FileKind::Text) => String::from_utf8(bytes)?,
                None => return Err(ExtractionError::UnsupportedFormat { filename }),
            }
        }
        Some(EmailSubmission::InlineText { text }) => text,
        None => return Err(ExtractionError::MissingContent),
    };

    ExtractedContent::new(text).ok_or(ExtractionError::MissingContent)
}

/// Run [`extract`] on the blocking pool. PDF parsing is CPU-bound.
pub async fn extract_in_background(
    submission: Option<EmailSubmission>,
) -> Result<ExtractedContent, ExtractionError> {
    tokio::task::spawn_blocking(move || extract(submission))
        .await
        .map_err(|e| ExtractionError::PdfRead {
            reason: format!("extraction task failed: {e}"),
        })?
}

/// Extract every page of a PDF, in order, joined by single spaces.
///
/// Either all pages are read or the whole upload fails. The PDF library can
/// panic on malformed input, so panics are caught and reported as `PdfRead`.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    let pages = match outcome {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            warn!(error = %e, size = bytes.len(), "PDF parsing failed");
            return Err(ExtractionError::PdfRead {
                reason: e.to_string(),
            });
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!(reason = %reason, size = bytes.len(), "PDF parser panicked");
            return Err(ExtractionError::PdfRead { reason });
        }
    };

    debug!(pages = pages.len(), "Extracted PDF text");
    Ok(join_pages(&pages))
}

/// Join page texts with a single space, preserving document order.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "PDF parser panicked".to_string()
    }
}
