use async_trait::async_trait;
use thiserror::Error;

pub mod amazon_q;
pub mod base_client;
pub mod bedrock;
pub mod gemini;
pub mod groq;

/// Normalized prompt pieces handed to every adapter.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub system: String,
    pub message: String,
    /// Caller-requested model; honored only if the adapter knows it.
    pub model_hint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub text: String,
    pub model: Option<String>,
}

/// Why one provider attempt produced no answer. This is an ordinary
/// fallthrough branch for the cascade, not a caller-visible error.
#[derive(Error, Debug)]
pub enum ProviderFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("empty reply")]
    Empty,

    #[error("all models failed, last: {0}")]
    Exhausted(String),
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderFailure::Network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ProviderFailure::Network(format!("connection failed: {}", err))
        } else if err.is_status() {
            ProviderFailure::Api(format!("error status: {}", err))
        } else {
            ProviderFailure::Network(format!("request failed: {}", err))
        }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Models this adapter can be asked for, in attempt order.
    fn models(&self) -> &'static [&'static str];

    async fn chat(&self, prompt: &ChatPrompt) -> Result<ProviderReply, ProviderFailure>;
}

/// Attempt order for adapters that iterate a model catalog: a recognized
/// hint first, then the default, then the rest of the catalog in listed
/// order. An unrecognized hint is ignored silently.
pub fn model_candidates(
    catalog: &[&'static str],
    default_model: &'static str,
    hint: Option<&str>,
) -> Vec<&'static str> {
    let mut candidates: Vec<&'static str> = Vec::with_capacity(catalog.len());

    if let Some(hinted) = hint.and_then(|h| catalog.iter().find(|m| **m == h)).copied() {
        candidates.push(hinted);
    }
    if !candidates.contains(&default_model) && catalog.iter().any(|m| *m == default_model) {
        candidates.push(default_model);
    }
    for model in catalog {
        if !candidates.contains(model) {
            candidates.push(model);
        }
    }
    candidates
}
