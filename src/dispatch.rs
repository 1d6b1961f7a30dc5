//! Provider cascade: Amazon Q → AWS Bedrock → Groq → Gemini, first success
//! wins, exhaustion degrades to a localized apology.

use crate::config::Config;
use crate::prompt::{self, ChatContext, Language};
use crate::providers::amazon_q::AmazonQProvider;
use crate::providers::bedrock::BedrockProvider;
use crate::providers::gemini::GeminiProvider;
use crate::providers::groq::GroqProvider;
use crate::providers::{ChatPrompt, ChatProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One inbound chat turn. Immutable for the duration of a dispatch.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub language: Language,
    pub context: Option<ChatContext>,
    pub model_hint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatResult {
    pub text: String,
    pub provider_used: String,
    pub model_used: Option<String>,
}

/// Name reported when every provider failed and the apology was returned.
pub const FALLBACK_PROVIDER: &str = "fallback";

pub struct RegisteredProvider {
    pub available: bool,
    pub adapter: Arc<dyn ChatProvider>,
}

/// Ordered provider list, built once at startup and read-only afterwards.
/// Availability is decided here, from credential presence, never per call.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<RegisteredProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, available: bool, adapter: Arc<dyn ChatProvider>) {
        self.entries.push(RegisteredProvider { available, adapter });
    }

    pub fn entries(&self) -> &[RegisteredProvider] {
        &self.entries
    }

    /// First available provider name, if any.
    pub fn primary_provider(&self) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.available)
            .map(|entry| entry.adapter.name())
    }

    pub fn total_models(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.available)
            .map(|entry| entry.adapter.models().len())
            .sum()
    }

    /// The production cascade, in priority order.
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.request_timeout();
        let mut registry = Self::new();

        let q = &config.amazon_q;
        let q_adapter = match q.base_url.clone() {
            Some(endpoint) => AmazonQProvider::with_endpoint(
                endpoint,
                q.application_id.as_deref().unwrap_or_default(),
                q.access_token.as_deref().unwrap_or_default(),
                timeout,
            ),
            None => AmazonQProvider::new(
                &config.aws_region,
                q.application_id.as_deref().unwrap_or_default(),
                q.access_token.as_deref().unwrap_or_default(),
                timeout,
            ),
        };
        registry.register(q.is_configured(), Arc::new(q_adapter));

        let bedrock = &config.bedrock;
        let bedrock_adapter = match bedrock.base_url.clone() {
            Some(endpoint) => BedrockProvider::with_endpoint(
                endpoint,
                bedrock.bearer_token.as_deref().unwrap_or_default(),
                timeout,
            ),
            None => BedrockProvider::new(
                &config.aws_region,
                bedrock.bearer_token.as_deref().unwrap_or_default(),
                timeout,
            ),
        };
        registry.register(bedrock.is_configured(), Arc::new(bedrock_adapter));

        let groq = &config.groq;
        let groq_adapter = match groq.base_url.clone() {
            Some(endpoint) => GroqProvider::with_endpoint(
                endpoint,
                groq.api_key.as_deref().unwrap_or_default(),
                timeout,
            ),
            None => GroqProvider::new(groq.api_key.as_deref().unwrap_or_default(), timeout),
        };
        registry.register(groq.is_configured(), Arc::new(groq_adapter));

        let gemini = &config.gemini;
        let gemini_adapter = match gemini.base_url.clone() {
            Some(endpoint) => GeminiProvider::with_endpoint(
                endpoint,
                gemini.api_key.as_deref().unwrap_or_default(),
                timeout,
            ),
            None => GeminiProvider::new(gemini.api_key.as_deref().unwrap_or_default(), timeout),
        };
        registry.register(gemini.is_configured(), Arc::new(gemini_adapter));

        registry
    }
}

pub struct CascadeDispatcher {
    registry: ProviderRegistry,
}

impl CascadeDispatcher {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Try providers strictly in order; the first non-empty reply is final.
    /// Never fails: exhaustion yields the apology for the request language.
    pub async fn dispatch(&self, request: &ChatRequest) -> ChatResult {
        let system = prompt::system_prompt(request.language, request.context.as_ref());
        let chat_prompt = ChatPrompt {
            system,
            message: request.message.clone(),
            model_hint: request.model_hint.clone(),
        };

        for entry in self.registry.entries() {
            let name = entry.adapter.name();

            if !entry.available {
                debug!(provider = name, "skipping provider without credentials");
                continue;
            }

            info!(provider = name, "attempting provider");
            match entry.adapter.chat(&chat_prompt).await {
                Ok(reply) if !reply.text.trim().is_empty() => {
                    info!(provider = name, model = reply.model.as_deref(), "provider succeeded");
                    return ChatResult {
                        text: reply.text,
                        provider_used: name.to_string(),
                        model_used: reply.model,
                    };
                }
                Ok(_) => {
                    warn!(provider = name, "provider returned empty reply");
                }
                Err(failure) => {
                    warn!(provider = name, error = %failure, "provider attempt failed");
                }
            }
        }

        warn!("all providers exhausted, returning apology");
        ChatResult {
            text: prompt::apology(request.language).to_string(),
            provider_used: FALLBACK_PROVIDER.to_string(),
            model_used: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderFailure, ProviderReply};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum MockBehavior {
        Succeed(&'static str),
        Fail,
        ReplyEmpty,
    }

    struct MockProvider {
        name: &'static str,
        behavior: MockBehavior,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(name: &'static str, behavior: MockBehavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatProvider for MockProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn models(&self) -> &'static [&'static str] {
            &["mock-model"]
        }

        async fn chat(&self, _prompt: &ChatPrompt) -> Result<ProviderReply, ProviderFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                MockBehavior::Succeed(text) => Ok(ProviderReply {
                    text: text.to_string(),
                    model: Some("mock-model".to_string()),
                }),
                MockBehavior::Fail => Err(ProviderFailure::Api("boom".to_string())),
                MockBehavior::ReplyEmpty => Ok(ProviderReply {
                    text: "   ".to_string(),
                    model: Some("mock-model".to_string()),
                }),
            }
        }
    }

    fn request(language: Language) -> ChatRequest {
        ChatRequest {
            message: "How do I apply for PM-KISAN?".to_string(),
            language,
            context: None,
            model_hint: None,
        }
    }

    fn dispatcher_of(entries: Vec<(bool, Arc<MockProvider>)>) -> CascadeDispatcher {
        let mut registry = ProviderRegistry::new();
        for (available, adapter) in entries {
            registry.register(available, adapter);
        }
        CascadeDispatcher::new(registry)
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let first = MockProvider::new("amazon_q", MockBehavior::Succeed("from q"));
        let second = MockProvider::new("aws_bedrock", MockBehavior::Succeed("from bedrock"));

        let dispatcher = dispatcher_of(vec![(true, first.clone()), (true, second.clone())]);
        let result = dispatcher.dispatch(&request(Language::En)).await;

        assert_eq!(result.text, "from q");
        assert_eq!(result.provider_used, "amazon_q");
        assert_eq!(result.model_used.as_deref(), Some("mock-model"));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn unavailable_provider_is_never_called() {
        let first = MockProvider::new("amazon_q", MockBehavior::Succeed("unused"));
        let second = MockProvider::new("aws_bedrock", MockBehavior::Succeed("from bedrock"));

        let dispatcher = dispatcher_of(vec![(false, first.clone()), (true, second.clone())]);
        let result = dispatcher.dispatch(&request(Language::En)).await;

        assert_eq!(result.provider_used, "aws_bedrock");
        assert_eq!(first.calls(), 0);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn failure_advances_cascade() {
        let first = MockProvider::new("amazon_q", MockBehavior::Fail);
        let second = MockProvider::new("groq", MockBehavior::Succeed("from groq"));

        let dispatcher = dispatcher_of(vec![(true, first.clone()), (true, second.clone())]);
        let result = dispatcher.dispatch(&request(Language::En)).await;

        assert_eq!(result.text, "from groq");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn empty_reply_counts_as_failure() {
        let first = MockProvider::new("amazon_q", MockBehavior::ReplyEmpty);
        let second = MockProvider::new("gemini", MockBehavior::Succeed("real answer"));

        let dispatcher = dispatcher_of(vec![(true, first.clone()), (true, second.clone())]);
        let result = dispatcher.dispatch(&request(Language::En)).await;

        assert_eq!(result.text, "real answer");
        assert_eq!(result.provider_used, "gemini");
    }

    #[tokio::test]
    async fn exhaustion_returns_localized_apology() {
        let first = MockProvider::new("amazon_q", MockBehavior::Fail);
        let second = MockProvider::new("groq", MockBehavior::Fail);

        let dispatcher = dispatcher_of(vec![(true, first), (true, second)]);

        let en = dispatcher.dispatch(&request(Language::En)).await;
        assert_eq!(en.text, prompt::apology(Language::En));
        assert_eq!(en.provider_used, FALLBACK_PROVIDER);
        assert!(en.model_used.is_none());

        let hi = dispatcher.dispatch(&request(Language::Hi)).await;
        assert_eq!(hi.text, prompt::apology(Language::Hi));
        assert_ne!(en.text, hi.text);
    }

    #[tokio::test]
    async fn empty_registry_still_answers() {
        let dispatcher = CascadeDispatcher::new(ProviderRegistry::new());
        let result = dispatcher.dispatch(&request(Language::En)).await;
        assert!(!result.text.is_empty());
        assert_eq!(result.provider_used, FALLBACK_PROVIDER);
    }

    #[test]
    fn primary_provider_skips_unavailable() {
        let mut registry = ProviderRegistry::new();
        registry.register(false, MockProvider::new("amazon_q", MockBehavior::Fail));
        registry.register(true, MockProvider::new("groq", MockBehavior::Fail));
        assert_eq!(registry.primary_provider(), Some("groq"));
        assert_eq!(registry.total_models(), 1);
    }
}
