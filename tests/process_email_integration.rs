//! Integration tests for `POST /process-email`.
//!
//! Each test spins up the real Axum app on a random port and talks to it
//! over HTTP with reqwest multipart forms. The AI side is either a stub
//! `LlmProvider` or a fake Gemini endpoint served locally.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Json;
use axum::routing::post;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use mail_triage::config::ServerConfig;
use mail_triage::error::LlmError;
use mail_triage::llm::create_provider;
use mail_triage::llm::provider::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};
use mail_triage::pipeline::EmailAnalyzer;
use mail_triage::server::{AppState, create_router};

/// Stub LLM provider that returns a fixed body (no real API calls).
struct StubLlm {
    content: String,
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: self.content.clone(),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
            response_id: None,
        })
    }
}

/// Serve `app` on a random local port and return its base URL.
async fn serve(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn start_server(llm: Arc<dyn LlmProvider>) -> String {
    let analyzer = Arc::new(EmailAnalyzer::new(llm, "Nexus Finanças"));
    serve(create_router(AppState::new(analyzer), 1024 * 1024)).await
}

async fn start_with_reply(content: &str) -> String {
    start_server(Arc::new(StubLlm {
        content: content.to_string(),
    }))
    .await
}

async fn post_form(base: &str, form: Form) -> (reqwest::StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/process-email"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn gratitude_email_is_unproductive() {
    let base = start_with_reply(
        r#"{"categoria": "Unproductive", "resposta_sugerida": "Muito obrigado pelo seu feedback! Atenciosamente, Equipe de Suporte Nexus Finanças"}"#,
    )
    .await;

    let form = Form::new().text("emailText", "Muito obrigado pelo excelente atendimento!");
    let (status, body) = post_form(&base, form).await;

    assert_eq!(status, 200);
    assert_eq!(body["categoria"], "Unproductive");
    assert!(
        body["resposta_sugerida"]
            .as_str()
            .unwrap()
            .contains("Equipe de Suporte")
    );
}

#[tokio::test]
async fn out_of_scope_email_is_declined() {
    let base = start_with_reply(
        r#"{"categoria": "Unproductive", "resposta_sugerida": "Our specialty at Nexus Finanças is the financial sector. We cannot help with this specific request."}"#,
    )
    .await;

    let form = Form::new().text("emailText", "Please recommend a good recipe for lasagna");
    let (status, body) = post_form(&base, form).await;

    assert_eq!(status, 200);
    assert_eq!(body["categoria"], "Unproductive");
    assert!(
        body["resposta_sugerida"]
            .as_str()
            .unwrap()
            .contains("financial sector")
    );
}

#[tokio::test]
async fn txt_upload_is_processed() {
    let base = start_with_reply(
        r#"{"categoria": "Productive", "resposta_sugerida": "We received your question."}"#,
    )
    .await;

    let part = Part::bytes(b"What are the fees for international transfers?".to_vec())
        .file_name("question.txt");
    let (status, body) = post_form(&base, Form::new().part("file", part)).await;

    assert_eq!(status, 200);
    assert_eq!(body["categoria"], "Productive");
}

#[tokio::test]
async fn docx_upload_is_rejected() {
    let base = start_with_reply(r#"{"categoria": "Productive", "resposta_sugerida": "x"}"#).await;

    let part = Part::bytes(b"PK\x03\x04 not really a docx".to_vec()).file_name("notes.docx");
    let (status, body) = post_form(&base, Form::new().part("file", part)).await;

    assert_eq!(status, 400);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.contains(".txt"), "message: {msg}");
    assert!(msg.contains(".pdf"), "message: {msg}");
}

#[tokio::test]
async fn empty_form_is_rejected() {
    let base = start_with_reply(r#"{"categoria": "Productive", "resposta_sugerida": "x"}"#).await;

    let form = Form::new().text("unrelated", "value");
    let (status, body) = post_form(&base, form).await;

    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn empty_email_text_matches_missing_content() {
    let base = start_with_reply(r#"{"categoria": "Productive", "resposta_sugerida": "x"}"#).await;

    let (status, body) = post_form(&base, Form::new().text("emailText", "")).await;
    let (missing_status, missing_body) =
        post_form(&base, Form::new().text("unrelated", "value")).await;

    assert_eq!(status, 400);
    assert_eq!(status, missing_status);
    assert_eq!(body, missing_body);
    assert_eq!(body["error"], "No text or valid file provided");
}

#[tokio::test]
async fn non_json_ai_output_degrades_to_ok() {
    let base = start_with_reply("Sure! This email looks productive to me.").await;

    let (status, body) = post_form(&base, Form::new().text("emailText", "Hello")).await;

    assert_eq!(status, 200);
    assert_eq!(body["categoria"], "AI Error");
    assert!(body["resposta_sugerida"].as_str().unwrap().contains("Error"));
}

// ── End to end with a fake Gemini endpoint ─────────────────────────

async fn start_fake_gemini(reply: Value, status: axum::http::StatusCode) -> String {
    let app = axum::Router::new().route(
        "/v1beta/models/{model_action}",
        post(move || {
            let reply = reply.clone();
            async move { (status, Json(reply)) }
        }),
    );
    serve(app).await
}

async fn start_with_gemini(gemini_base: &str) -> String {
    let mut config = ServerConfig::with_api_key("test-key");
    config.base_url = gemini_base.to_string();
    config.llm_timeout = Duration::from_secs(5);
    let llm = create_provider(&config.llm_config()).unwrap();
    start_server(llm).await
}

#[tokio::test]
async fn gemini_json_reply_flows_through() {
    let gemini = start_fake_gemini(
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{
                    "text": "{\"categoria\": \"Productive\", \"resposta_sugerida\": \"Lamentamos o ocorrido. Nossa equipe responsável já foi acionada.\"}"
                }]},
                "finishReason": "STOP"
            }]
        }),
        axum::http::StatusCode::OK,
    )
    .await;
    let base = start_with_gemini(&gemini).await;

    let form = Form::new().text("emailText", "Estou muito insatisfeito, meu pagamento falhou de novo!");
    let (status, body) = post_form(&base, form).await;

    assert_eq!(status, 200);
    assert_eq!(body["categoria"], "Productive");
    assert!(body["resposta_sugerida"].as_str().unwrap().contains("acionada"));
}

#[tokio::test]
async fn gemini_auth_failure_degrades_to_ok() {
    let gemini = start_fake_gemini(
        json!({"error": {"code": 403, "message": "API key not valid"}}),
        axum::http::StatusCode::FORBIDDEN,
    )
    .await;
    let base = start_with_gemini(&gemini).await;

    let (status, body) = post_form(&base, Form::new().text("emailText", "Hello")).await;

    assert_eq!(status, 200);
    assert_eq!(body["categoria"], "AI Error");
    assert!(
        body["resposta_sugerida"]
            .as_str()
            .unwrap()
            .contains("Authentication failed")
    );
}
