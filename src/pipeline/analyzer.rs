//! Analysis client — classifies an email and drafts a reply via the LLM.
//!
//! **`analyze` never fails.** Transport errors, auth errors, timeouts and
//! malformed model output all become a degraded `AnalysisResult` carrying
//! the `AI Error` category, so the HTTP layer always returns the success
//! schema once input validation has passed.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider, ResponseFormat};
use crate::pipeline::prompts::policy_prompt;
use crate::pipeline::types::{AnalysisResult, Category, ExtractedContent};

/// Temperature for triage (deterministic-ish).
const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Classifies emails through an `LlmProvider` with the fixed policy prompt.
pub struct EmailAnalyzer {
    llm: Arc<dyn LlmProvider>,
    system_prompt: String,
}

impl EmailAnalyzer {
    /// Create an analyzer whose replies are signed for `organization`.
    pub fn new(llm: Arc<dyn LlmProvider>, organization: &str) -> Self {
        Self {
            llm,
            system_prompt: policy_prompt(organization),
        }
    }

    /// The rendered policy prompt sent with every request.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Classify `content` and suggest a reply. Single attempt, no retry.
    pub async fn analyze(&self, content: &ExtractedContent) -> AnalysisResult {
        // No output-token cap: thinking tokens count against it on 2.5 models.
        let request = CompletionRequest::new(vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(content.as_str()),
        ])
        .with_temperature(ANALYSIS_TEMPERATURE)
        .with_response_format(ResponseFormat::Json);

        let response = match self.llm.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(model = self.llm.model_name(), error = %e, "AI analysis call failed");
                return AnalysisResult::degraded(e);
            }
        };

        debug!(
            response_id = response.response_id.as_deref().unwrap_or("-"),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "AI analysis response received"
        );

        match parse_analysis_response(&response.content) {
            Ok(result) => {
                info!(category = %result.category, "Email classified");
                result
            }
            Err(e) => {
                warn!(
                    raw_response = %response.content,
                    error = %e,
                    "Failed to parse AI analysis response"
                );
                AnalysisResult::degraded(e)
            }
        }
    }
}

// ── Response parsing ────────────────────────────────────────────────

/// Model output structure. Both keys are required and must be strings.
#[derive(Debug, serde::Deserialize)]
struct AnalysisResponse {
    categoria: String,
    resposta_sugerida: String,
}

/// Parse the model's raw text into an `AnalysisResult`.
fn parse_analysis_response(raw: &str) -> Result<AnalysisResult, String> {
    let json_str = extract_json_object(raw);
    let value: serde_json::Value =
        serde_json::from_str(&json_str).map_err(|e| format!("JSON parse error: {e}"))?;
    if !value.is_object() {
        return Err("expected a JSON object".into());
    }
    let response: AnalysisResponse =
        serde_json::from_value(value).map_err(|e| format!("unexpected JSON shape: {e}"))?;

    let category = Category::from_label(&response.categoria)
        .ok_or_else(|| format!("unknown category: '{}'", response.categoria))?;

    if response.resposta_sugerida.trim().is_empty() {
        return Err("suggested reply is empty".into());
    }

    Ok(AnalysisResult::new(category, response.resposta_sugerida))
}

/// Extract a JSON object from LLM output (handles markdown wrapping).
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
    {
        return trimmed[start..=end].to_string();
    }

    trimmed.to_string()
}
