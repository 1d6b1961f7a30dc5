use crate::providers::base_client::HttpClient;
use crate::providers::{
    ChatPrompt, ChatProvider, ProviderFailure, ProviderReply, model_candidates,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

/// High-performance Groq models, in attempt order after the default.
pub const GROQ_MODELS: &[&str] = &[
    "llama-3.1-405b-reasoning",
    "llama-3.1-70b-versatile",
    "llama-3.1-8b-instant",
    "llama-3.2-1b-preview",
    "llama-3.2-3b-preview",
    "llama-3.2-11b-text-preview",
    "llama-3.2-90b-text-preview",
    "llama3-70b-8192",
    "llama3-8b-8192",
    "llama3-70b-instruct",
    "llama3-8b-instruct",
    "mixtral-8x7b-32768",
    "gemma2-9b-it",
    "gemma-7b-it",
    "llama-guard-3-8b",
    "llava-v1.5-7b-4096-preview",
    "whisper-large-v3",
    "distil-whisper-large-v3-en",
    "llama-2-70b-chat",
    "llama-2-13b-chat",
    "llama-2-7b-chat",
    "mixtral-8x22b-instruct-v0.1",
    "mixtral-8x22b-v0.1",
    "codellama-34b-instruct",
    "codellama-70b-instruct",
    "falcon-180b-chat",
    "qwen-2.5-72b-instruct",
    "qwen-2.5-7b-instruct",
    "mistral-large-latest",
    "mistral-medium-latest",
    "mistral-small-latest",
    "pixtral-12b-2409",
    "internlm2-20b-chat",
    "deepseek-coder-33b-instruct",
    "deepseek-llm-67b-chat",
    "phosphor-llama-3-8b",
    "llama-3-groq-8b-tool-use-preview",
    "llama-3-groq-70b-tool-use-preview",
    "hermes-3-llama-3.1-8b",
    "hermes-3-llama-3.1-70b",
];

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

#[derive(Clone)]
pub struct GroqProvider {
    client: HttpClient,
}

impl GroqProvider {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));
        Self {
            client: HttpClient::new(GROQ_BASE_URL.to_string(), auth_header, timeout),
        }
    }

    pub fn with_endpoint(endpoint: String, api_key: &str, timeout: Duration) -> Self {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));
        Self {
            client: HttpClient::new(endpoint, auth_header, timeout),
        }
    }

    async fn complete(&self, model: &str, prompt: &ChatPrompt) -> Result<String, ProviderFailure> {
        let payload = ChatCompletionRequest {
            model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: &prompt.message,
                },
            ],
            temperature: 0.7,
            max_tokens: 1024,
        };

        let response = self.client.post("chat/completions", &payload).await?;
        let body = response.text().await.map_err(ProviderFailure::from)?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("chat completion: {}", e)))?;

        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ProviderFailure::Malformed("no choices in response".to_string()))?;

        if content.is_empty() {
            return Err(ProviderFailure::Empty);
        }

        Ok(content)
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn models(&self) -> &'static [&'static str] {
        GROQ_MODELS
    }

    async fn chat(&self, prompt: &ChatPrompt) -> Result<ProviderReply, ProviderFailure> {
        let mut last_failure = ProviderFailure::Empty;

        for model in model_candidates(GROQ_MODELS, DEFAULT_MODEL, prompt.model_hint.as_deref()) {
            match self.complete(model, prompt).await {
                Ok(text) => {
                    return Ok(ProviderReply {
                        text,
                        model: Some(model.to_string()),
                    });
                }
                Err(failure) => {
                    debug!(model, error = %failure, "groq model attempt failed");
                    last_failure = failure;
                }
            }
        }

        Err(ProviderFailure::Exhausted(last_failure.to_string()))
    }
}
