//! Shared LLM client used by the policy reviewer's fix advisor.
//!
//! - `config`: provider/model settings, loaded from the environment
//! - `services`: thin non-streaming clients (Gemini, OpenAI)
//! - `llm_service`: enum-dispatch facade over the clients
//! - `telemetry`: library-scoped tracing layer
//! - `error_handler`: unified errors

pub mod config;
pub mod error_handler;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
pub use llm_service::LlmService;
