//! LLM config loaded from environment variables.
//!
//! The fix advisor is optional: a missing API key is not an error, it simply
//! yields `Ok(None)` so the caller can run without AI suggestions.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = provider kind (`gemini` (default) | `openai`)
//! - `LLM_MAX_TOKENS`    = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`  = request timeout (u64, default 60)
//! - `LLM_TEMPERATURE`   = sampling temperature (f32 in 0.0..=2.0, default 0.2)
//!
//! Gemini:
//! - `GEMINI_API_KEY` or `GOOGLE_API_KEY` = API key (enables the advisor)
//! - `GEMINI_MODEL` = model (default `gemini-1.5-flash`)
//! - `GEMINI_URL`   = base URL (default `https://generativelanguage.googleapis.com`)
//!
//! OpenAI:
//! - `OPENAI_API_KEY` = API key (enables the advisor)
//! - `OPENAI_MODEL`   = model (default `gpt-4o-mini`)
//! - `OPENAI_URL`     = base URL (default `https://api.openai.com`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, non_empty, parse_opt, validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Builds the advisor config from the process environment.
///
/// # Errors
/// See [`config_from_lookup`].
pub fn config_from_env() -> Result<Option<LlmModelConfig>, AiLlmError> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Builds the advisor config from an arbitrary variable lookup.
///
/// Returns `Ok(None)` when the selected provider has no API key.
///
/// # Errors
///
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`ConfigError::InvalidNumber`] for unparsable numeric variables
/// - [`ConfigError::OutOfRange`] for a temperature outside `0.0..=2.0`
/// - [`ConfigError::InvalidFormat`] for a base URL without http/https
pub fn config_from_lookup<F>(lookup: F) -> Result<Option<LlmModelConfig>, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| non_empty(lookup(name));

    let provider = match get("LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Gemini,
    };

    let (api_key, model, endpoint, url_var) = match provider {
        LlmProvider::Gemini => (
            get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
            get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            get("GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
            "GEMINI_URL",
        ),
        LlmProvider::OpenAI => (
            get("OPENAI_API_KEY"),
            get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            get("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            "OPENAI_URL",
        ),
    };

    let Some(api_key) = api_key else {
        return Ok(None);
    };

    validate_http_endpoint(url_var, &endpoint)?;

    let max_tokens = parse_opt::<u32>("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"), "expected u32")?;
    let timeout_secs =
        parse_opt::<u64>("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"), "expected u64")?;
    let temperature =
        parse_opt::<f32>("LLM_TEMPERATURE", lookup("LLM_TEMPERATURE"), "expected f32")?
            .unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    if model.is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    Ok(Some(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(temperature),
        timeout_secs,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn no_key_means_no_advisor() {
        assert!(config_from_lookup(lookup(&[])).unwrap().is_none());
        assert!(
            config_from_lookup(lookup(&[("GEMINI_API_KEY", "   ")]))
                .unwrap()
                .is_none()
        );
        // Key for the other provider does not count.
        assert!(
            config_from_lookup(lookup(&[("LLM_KIND", "openai"), ("GEMINI_API_KEY", "k")]))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn gemini_defaults_apply() {
        let cfg = config_from_lookup(lookup(&[("GEMINI_API_KEY", "k")]))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.provider, LlmProvider::Gemini);
        assert_eq!(cfg.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_GEMINI_URL);
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(cfg.max_tokens, None);
    }

    #[test]
    fn google_api_key_is_accepted_as_fallback() {
        let cfg = config_from_lookup(lookup(&[("GOOGLE_API_KEY", "g")]))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("g"));
    }

    #[test]
    fn openai_overrides_are_read() {
        let cfg = config_from_lookup(lookup(&[
            ("LLM_KIND", "openai"),
            ("OPENAI_API_KEY", "sk"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_URL", "http://localhost:9000"),
            ("LLM_MAX_TOKENS", "512"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("LLM_TEMPERATURE", "0"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.provider, LlmProvider::OpenAI);
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.endpoint, "http://localhost:9000");
        assert_eq!(cfg.max_tokens, Some(512));
        assert_eq!(cfg.timeout_secs, Some(5));
        assert_eq!(cfg.temperature, Some(0.0));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let bad_kind = config_from_lookup(lookup(&[("LLM_KIND", "bard")]));
        assert!(matches!(
            bad_kind,
            Err(AiLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));

        let bad_tokens =
            config_from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("LLM_MAX_TOKENS", "lots")]));
        assert!(matches!(
            bad_tokens,
            Err(AiLlmError::Config(ConfigError::InvalidNumber {
                var: "LLM_MAX_TOKENS",
                ..
            }))
        ));

        let bad_temp =
            config_from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("LLM_TEMPERATURE", "3.5")]));
        assert!(matches!(
            bad_temp,
            Err(AiLlmError::Config(ConfigError::OutOfRange { .. }))
        ));

        let bad_url = config_from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("GEMINI_URL", "localhost")]));
        assert!(matches!(
            bad_url,
            Err(AiLlmError::Config(ConfigError::InvalidFormat { var: "GEMINI_URL", .. }))
        ));
    }
}
