//! Email triage pipeline.
//!
//! Every submitted email flows through, in strict sequence:
//! 1. `extractor::extract()` — uploaded file or inline text → plain text
//! 2. `EmailAnalyzer::analyze()` — LLM classification + suggested reply
//!
//! Each request is independent; nothing is persisted.

pub mod analyzer;
pub mod extractor;
pub mod prompts;
pub mod types;

pub use analyzer::EmailAnalyzer;
pub use extractor::{extract, extract_in_background};
pub use types::{AnalysisResult, Category, EmailSubmission, ExtractedContent};
