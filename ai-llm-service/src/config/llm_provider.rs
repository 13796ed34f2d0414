use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for fix-suggestion completions.
///
/// Selected via `LLM_KIND`; Gemini is the default because the reviewed
/// infrastructure usually lives on Google Cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Google Generative Language API (`generateContent`).
    Gemini,
    /// OpenAI-compatible chat completions API.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
