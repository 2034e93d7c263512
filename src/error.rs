//! Error types for mail-triage.

use std::time::Duration;

/// Top-level error type for serving.
///
/// Request-level failures never reach it: extraction errors become HTTP
/// responses and LLM errors become degraded results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures turning a submitted email into plain text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("No text or valid file provided")]
    MissingContent,

    #[error("No readable text found in the file")]
    EmptyContent,

    #[error("Unsupported file format for '{filename}'. Send a .txt or .pdf file")]
    UnsupportedFormat { filename: String },

    #[error("Failed to read the PDF file. Is it corrupted? ({reason})")]
    PdfRead { reason: String },

    #[error("Failed to read the TXT file: {0}")]
    TextDecode(#[from] std::string::FromUtf8Error),
}

impl ExtractionError {
    /// Whether the caller sent bad input, as opposed to a file we failed to read.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingContent | Self::EmptyContent | Self::UnsupportedFormat { .. }
        )
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_input_problems() {
        assert!(ExtractionError::MissingContent.is_client_error());
        assert!(ExtractionError::EmptyContent.is_client_error());
        assert!(
            ExtractionError::UnsupportedFormat {
                filename: "notes.docx".into()
            }
            .is_client_error()
        );
    }

    #[test]
    fn read_failures_are_server_errors() {
        let pdf = ExtractionError::PdfRead {
            reason: "bad xref".into(),
        };
        assert!(!pdf.is_client_error());

        let utf8 = String::from_utf8(vec![0xff, 0xfe, 0xfd]).unwrap_err();
        assert!(!ExtractionError::TextDecode(utf8).is_client_error());
    }

    #[test]
    fn unsupported_format_names_accepted_extensions() {
        let msg = ExtractionError::UnsupportedFormat {
            filename: "notes.docx".into(),
        }
        .to_string();
        assert!(msg.contains(".txt"));
        assert!(msg.contains(".pdf"));
        assert!(msg.contains("notes.docx"));
    }
}
