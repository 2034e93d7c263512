//! mail-triage — classifies inbound emails and drafts replies with an LLM.

pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod server;
