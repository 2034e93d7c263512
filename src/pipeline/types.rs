//! Shared types for the email triage pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Submission ──────────────────────────────────────────────────────

/// Email content as submitted by the front-end.
///
/// The HTTP layer picks exactly one shape; a request carrying neither is
/// represented as `None` at the extractor boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailSubmission {
    /// An uploaded file (`.txt` or `.pdf`).
    FileUpload { filename: String, bytes: Vec<u8> },
    /// Text pasted into the form.
    InlineText { text: String },
}

impl EmailSubmission {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FileUpload { .. } => "file_upload",
            Self::InlineText { .. } => "inline_text",
        }
    }
}

// ── Extracted content ───────────────────────────────────────────────

/// Plain-text email body. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent(String);

impl ExtractedContent {
    /// Wrap `text`, rejecting the empty string.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `max_chars` characters, for log lines.
    pub fn preview(&self, max_chars: usize) -> String {
        self.0.chars().take(max_chars).collect()
    }
}

// ── Analysis result ─────────────────────────────────────────────────

/// Triage category assigned to an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Requires action from the team.
    Productive,
    /// Requires no action.
    Unproductive,
    /// The AI call or its parsing failed.
    #[serde(rename = "AI Error")]
    AiError,
}

impl Category {
    /// Map a model-produced label onto a category.
    ///
    /// Accepts English and Portuguese labels, case-insensitively. The error
    /// sentinel is never accepted from the model.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "productive" | "produtivo" => Some(Self::Productive),
            "unproductive" | "improdutivo" => Some(Self::Unproductive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productive => "Productive",
            Self::Unproductive => "Unproductive",
            Self::AiError => "AI Error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification plus suggested reply, as returned to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "resposta_sugerida")]
    pub suggested_reply: String,
}

impl AnalysisResult {
    pub fn new(category: Category, suggested_reply: impl Into<String>) -> Self {
        Self {
            category,
            suggested_reply: suggested_reply.into(),
        }
    }

    /// Degraded result substituted when the AI step fails.
    pub fn degraded(reason: impl fmt::Display) -> Self {
        Self {
            category: Category::AiError,
            suggested_reply: format!("Could not process the email with the AI service. Error: {reason}"),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.category == Category::AiError
    }
}
