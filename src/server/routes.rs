//! Request handlers.

use axum::Json;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::AppState;
use crate::error::ExtractionError;
use crate::pipeline::{EmailSubmission, extract_in_background};

/// Multipart field carrying an uploaded file.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying pasted email text.
pub const TEXT_FIELD: &str = "emailText";

/// Error body `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), format!("Invalid form data: {}", err.body_text()))
    }
}

// ── Health ──────────────────────────────────────────────────────────

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mail-triage"
    }))
}

// ── Process email ───────────────────────────────────────────────────

/// POST /process-email
///
/// Multipart form with either a `file` (`.txt`/`.pdf`) or an `emailText`
/// field. Returns `{"categoria", "resposta_sugerida"}` with 200 once the
/// input is valid, even when the AI step fails.
pub async fn process_email(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    let multipart = multipart.map_err(|rejection| {
        debug!(request_id = %request_id, error = %rejection, "Rejected non-multipart request");
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let submission = read_submission(multipart).await?;
    let source = submission.as_ref().map_or("none", EmailSubmission::label);

    let content = match extract_in_background(submission).await {
        Ok(content) => content,
        Err(e) if e.is_client_error() => {
            debug!(request_id = %request_id, source, error = %e, "Invalid email submission");
            return Err(e.into());
        }
        Err(e) => {
            warn!(request_id = %request_id, source, error = %e, "Failed to extract email content");
            return Err(e.into());
        }
    };

    info!(
        request_id = %request_id,
        source,
        chars = content.as_str().chars().count(),
        preview = %content.preview(50),
        "Received email for processing"
    );

    let result = state.analyzer.analyze(&content).await;

    info!(
        request_id = %request_id,
        category = %result.category,
        degraded = result.is_degraded(),
        "Email processed"
    );

    Ok(Json(result).into_response())
}

/// Collect the submission from the form. A `file` part wins over `emailText`.
///
/// A `file` part with neither a filename nor any bytes is what browsers send
/// for an empty file input, and is treated as absent.
async fn read_submission(
    mut multipart: Multipart,
) -> Result<Option<EmailSubmission>, MultipartError> {
    let mut file: Option<EmailSubmission> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) if file.is_none() => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                file = Some(EmailSubmission::FileUpload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            Some(TEXT_FIELD) if text.is_none() => {
                text = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(file.or_else(|| text.map(|text| EmailSubmission::InlineText { text })))
}
