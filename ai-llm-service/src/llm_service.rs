//! Provider-agnostic LLM client.
//!
//! Enum-dispatch over the concrete provider clients (no `async-trait`, no
//! `Box<dyn ...>`). Construct once from an [`LlmModelConfig`] and reuse for
//! every request of a run.
//!
//! # Example
//! ```no_run
//! use ai_llm_service::config::default_config::config_from_env;
//! use ai_llm_service::llm_service::LlmService;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! if let Some(cfg) = config_from_env()? {
//!     let svc = LlmService::from_config(cfg)?;
//!     let txt = svc.generate("Say hello", None).await?;
//!     println!("{txt}");
//! }
//! # Ok(()) }
//! ```

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{gemini_service::GeminiService, open_ai_service::OpenAiService},
};

/// A ready-to-use client for the configured provider.
#[derive(Debug)]
pub enum LlmService {
    Gemini(GeminiService),
    OpenAI(OpenAiService),
}

impl LlmService {
    /// Builds the client matching `cfg.provider`.
    ///
    /// # Errors
    /// Propagates the provider constructor's validation errors.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        match cfg.provider {
            LlmProvider::Gemini => GeminiService::new(cfg).map(LlmService::Gemini),
            LlmProvider::OpenAI => OpenAiService::new(cfg).map(LlmService::OpenAI),
        }
    }

    /// Single non-streaming completion.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] on transport, status, or decode failures.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match self {
            LlmService::Gemini(svc) => svc.generate(prompt, system).await,
            LlmService::OpenAI(svc) => svc.generate(prompt, system).await,
        }
    }

    pub fn provider(&self) -> LlmProvider {
        match self {
            LlmService::Gemini(_) => LlmProvider::Gemini,
            LlmService::OpenAI(_) => LlmProvider::OpenAI,
        }
    }
}
