pub mod client;
pub mod types;

use crate::providers::{
    ChatPrompt, ChatProvider, ProviderFailure, ProviderReply, model_candidates,
};
use async_trait::async_trait;
use client::{GEMINI_BASE_URL, GeminiClient};
use std::time::Duration;
use tracing::debug;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const GEMINI_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
];

#[derive(Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        Self {
            client: GeminiClient::new(GEMINI_BASE_URL.to_string(), api_key, timeout),
        }
    }

    pub fn with_endpoint(endpoint: String, api_key: &str, timeout: Duration) -> Self {
        Self {
            client: GeminiClient::new(endpoint, api_key, timeout),
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn models(&self) -> &'static [&'static str] {
        GEMINI_MODELS
    }

    async fn chat(&self, prompt: &ChatPrompt) -> Result<ProviderReply, ProviderFailure> {
        let mut last_failure = ProviderFailure::Empty;

        for model in model_candidates(GEMINI_MODELS, DEFAULT_MODEL, prompt.model_hint.as_deref()) {
            match self.client.generate_content(model, prompt).await {
                Ok(text) => {
                    return Ok(ProviderReply {
                        text,
                        model: Some(model.to_string()),
                    });
                }
                Err(failure) => {
                    debug!(model, error = %failure, "gemini model attempt failed");
                    last_failure = failure;
                }
            }
        }

        Err(ProviderFailure::Exhausted(last_failure.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_attempted_first() {
        let order = model_candidates(GEMINI_MODELS, DEFAULT_MODEL, None);
        assert_eq!(order[0], "gemini-2.0-flash");
    }

    #[test]
    fn hinted_model_attempted_first() {
        let order = model_candidates(GEMINI_MODELS, DEFAULT_MODEL, Some("gemini-1.5-pro"));
        assert_eq!(order[0], "gemini-1.5-pro");
        assert_eq!(order[1], "gemini-2.0-flash");
    }
}
