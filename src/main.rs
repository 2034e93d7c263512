use std::sync::Arc;

use anyhow::Context;

use mail_triage::config::ServerConfig;
use mail_triage::llm::create_provider;
use mail_triage::pipeline::EmailAnalyzer;
use mail_triage::pipeline::prompts::POLICY_PROMPT_VERSION;
use mail_triage::server::{AppState, create_router, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // A missing API key is fatal: refuse to start.
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GEMINI_API_KEY=...");
        std::process::exit(1);
    });

    eprintln!("📬 mail-triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Organization: {}", config.organization);
    eprintln!("   Policy prompt: {}", POLICY_PROMPT_VERSION);
    eprintln!("   AI timeout: {:?}", config.llm_timeout);
    eprintln!("   Endpoint: http://{}/process-email\n", config.bind_addr());

    let llm = create_provider(&config.llm_config()).context("failed to create LLM provider")?;
    let analyzer = Arc::new(EmailAnalyzer::new(llm, &config.organization));

    let app = create_router(AppState::new(analyzer), config.max_upload_bytes);
    run_server(app, &config.bind_addr())
        .await
        .with_context(|| format!("server on {} failed", config.bind_addr()))?;

    Ok(())
}
