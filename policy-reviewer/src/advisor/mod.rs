//! Fix advisor: optional AI suggestions for violating resources.
//!
//! [`FixSuggester`] is the capability the report builder talks to. It is an
//! enum (no trait objects): `Disabled` never touches the network, `Live`
//! wraps an [`LlmService`]. Every backend failure is logged and turned into
//! `None`, which the report renders as a manual fix.

pub mod prompt;

use std::time::Instant;

use ai_llm_service::config::default_config::config_from_env;
use ai_llm_service::{LlmModelConfig, LlmService};
use tracing::{debug, info, warn};

use crate::errors::AdvisorError;
use prompt::{SYSTEM_PROMPT, build_fix_prompt, normalize_suggestion};

/// Inputs for a single suggestion.
#[derive(Debug, Clone, Copy)]
pub struct FixRequest<'a> {
    pub violation_message: &'a str,
    pub resource_code: &'a str,
    pub resource_type: &'a str,
    pub resource_name: &'a str,
}

/// Suggestion capability.
#[derive(Debug)]
pub enum FixSuggester {
    /// No key or no backend: always `None`.
    Disabled,
    /// Calls the configured generative model once per request.
    Live(LlmService),
}

impl FixSuggester {
    /// Builds the advisor from the environment. Never fails: a missing key or
    /// an invalid configuration yields [`FixSuggester::Disabled`].
    pub fn from_env() -> Self {
        match config_from_env() {
            Ok(Some(cfg)) => Self::from_config(cfg),
            Ok(None) => {
                info!("no LLM API key configured, AI fix suggestions disabled");
                FixSuggester::Disabled
            }
            Err(e) => {
                let e = AdvisorError::Config(e);
                warn!(error = %e, "AI fix suggestions disabled");
                FixSuggester::Disabled
            }
        }
    }

    /// Builds a live advisor for `cfg`, or `Disabled` if the client cannot be created.
    pub fn from_config(cfg: LlmModelConfig) -> Self {
        match LlmService::from_config(cfg) {
            Ok(svc) => {
                info!(provider = ?svc.provider(), "AI fix suggestions enabled");
                FixSuggester::Live(svc)
            }
            Err(e) => {
                let e = AdvisorError::Config(e);
                warn!(error = %e, "AI fix suggestions disabled");
                FixSuggester::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, FixSuggester::Live(_))
    }

    /// At most one backend call, no retry. `None` means "render a manual fix".
    pub async fn suggest_fix(&self, req: &FixRequest<'_>) -> Option<String> {
        let FixSuggester::Live(svc) = self else {
            return None;
        };

        let t0 = Instant::now();
        let prompt = build_fix_prompt(req);
        debug!(
            resource_type = req.resource_type,
            resource_name = req.resource_name,
            prompt_len = prompt.len(),
            "advisor: requesting fix"
        );

        match svc.generate(&prompt, Some(SYSTEM_PROMPT)).await {
            Ok(raw) => {
                let suggestion = normalize_suggestion(&raw);
                debug!(
                    resource_name = req.resource_name,
                    usable = suggestion.is_some(),
                    "advisor: reply received ({} ms)",
                    t0.elapsed().as_millis()
                );
                suggestion
            }
            Err(e) => {
                let e = AdvisorError::Backend(e);
                warn!(
                    resource_name = req.resource_name,
                    error = %e,
                    "falling back to manual fix"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ai_llm_service::LlmProvider;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const REQ: FixRequest<'static> = FixRequest {
        violation_message: "security-risk: Bucket 'b1' must have uniform access.",
        resource_code: "resource \"google_storage_bucket\" \"b1\" {\n}",
        resource_type: "google_storage_bucket",
        resource_name: "b1",
    };

    fn openai_cfg(endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-test".into(),
            endpoint,
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.2),
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn disabled_returns_none() {
        let s = FixSuggester::Disabled;
        assert!(!s.is_enabled());
        assert_eq!(s.suggest_fix(&REQ).await, None);
    }

    #[test]
    fn invalid_config_disables() {
        let mut cfg = openai_cfg("not-a-url".into());
        cfg.api_key = Some("k".into());
        assert!(!FixSuggester::from_config(cfg).is_enabled());
    }

    #[tokio::test]
    async fn live_returns_normalized_suggestion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "```hcl\nresource \"google_storage_bucket\" \"b1\" {\n  uniform_bucket_level_access = true\n}\n```" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let s = FixSuggester::from_config(openai_cfg(server.uri()));
        assert!(s.is_enabled());
        assert_eq!(
            s.suggest_fix(&REQ).await.as_deref(),
            Some("resource \"google_storage_bucket\" \"b1\" {\n  uniform_bucket_level_access = true\n}")
        );
    }

    #[tokio::test]
    async fn backend_failure_is_none_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let s = FixSuggester::from_config(openai_cfg(server.uri()));
        assert_eq!(s.suggest_fix(&REQ).await, None);
    }
}
