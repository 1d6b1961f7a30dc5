use crate::providers::base_client::HttpClient;
use crate::providers::{ChatPrompt, ChatProvider, ProviderFailure, ProviderReply};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MODEL: &str = "claude-3-haiku";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;

/// Bedrock model families. Each family has its own request envelope and
/// response field names; the family is resolved from the catalog below,
/// never from substrings of the model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Claude,
    Llama,
    Titan,
    Cohere,
    Ai21,
}

pub struct BedrockModel {
    pub name: &'static str,
    pub id: &'static str,
    pub family: ModelFamily,
}

/// Conversational models from the Bedrock catalog, keyed by the short names
/// callers hint with.
pub const BEDROCK_MODELS: &[BedrockModel] = &[
    BedrockModel {
        name: "claude-3-opus",
        id: "anthropic.claude-3-opus-20240229-v1:0",
        family: ModelFamily::Claude,
    },
    BedrockModel {
        name: "claude-3-sonnet",
        id: "anthropic.claude-3-sonnet-20240229-v1:0",
        family: ModelFamily::Claude,
    },
    BedrockModel {
        name: "claude-3-haiku",
        id: "anthropic.claude-3-haiku-20240307-v1:0",
        family: ModelFamily::Claude,
    },
    BedrockModel {
        name: "claude-instant",
        id: "anthropic.claude-instant-v1",
        family: ModelFamily::Claude,
    },
    BedrockModel {
        name: "claude-v2",
        id: "anthropic.claude-v2",
        family: ModelFamily::Claude,
    },
    BedrockModel {
        name: "llama3-70b",
        id: "meta.llama3-70b-instruct-v1:0",
        family: ModelFamily::Llama,
    },
    BedrockModel {
        name: "llama3-8b",
        id: "meta.llama3-8b-instruct-v1:0",
        family: ModelFamily::Llama,
    },
    BedrockModel {
        name: "llama2-70b",
        id: "meta.llama2-70b-chat-v1",
        family: ModelFamily::Llama,
    },
    BedrockModel {
        name: "llama2-13b",
        id: "meta.llama2-13b-chat-v1",
        family: ModelFamily::Llama,
    },
    BedrockModel {
        name: "titan-text-express",
        id: "amazon.titan-text-express-v1",
        family: ModelFamily::Titan,
    },
    BedrockModel {
        name: "titan-text-lite",
        id: "amazon.titan-text-lite-v1",
        family: ModelFamily::Titan,
    },
    BedrockModel {
        name: "cohere-command",
        id: "cohere.command-text-v14",
        family: ModelFamily::Cohere,
    },
    BedrockModel {
        name: "cohere-command-light",
        id: "cohere.command-light-text-v14",
        family: ModelFamily::Cohere,
    },
    BedrockModel {
        name: "ai21-jurassic-ultra",
        id: "ai21.j2-ultra-v1",
        family: ModelFamily::Ai21,
    },
    BedrockModel {
        name: "ai21-jurassic-mid",
        id: "ai21.j2-mid-v1",
        family: ModelFamily::Ai21,
    },
];

pub fn lookup_model(name: &str) -> Option<&'static BedrockModel> {
    BEDROCK_MODELS.iter().find(|model| model.name == name)
}

fn model_names() -> &'static [&'static str] {
    // Keep in sync with BEDROCK_MODELS
    &[
        "claude-3-opus",
        "claude-3-sonnet",
        "claude-3-haiku",
        "claude-instant",
        "claude-v2",
        "llama3-70b",
        "llama3-8b",
        "llama2-70b",
        "llama2-13b",
        "titan-text-express",
        "titan-text-lite",
        "cohere-command",
        "cohere-command-light",
        "ai21-jurassic-ultra",
        "ai21-jurassic-mid",
    ]
}

// Claude: messages API with a dedicated system slot.

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ClaudeMessage<'a>>,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    text: String,
}

// Llama: single prompt string, system folded in front.

#[derive(Serialize)]
struct LlamaRequest {
    prompt: String,
    max_gen_len: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct LlamaResponse {
    generation: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest {
    input_text: String,
    text_generation_config: TitanConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanConfig {
    max_token_count: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct TitanResponse {
    results: Vec<TitanResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResult {
    output_text: String,
}

#[derive(Serialize)]
struct CohereRequest {
    prompt: String,
    max_tokens: u32,
    temperature: f32,
    p: f32,
}

#[derive(Deserialize)]
struct CohereResponse {
    generations: Vec<CohereGeneration>,
}

#[derive(Deserialize)]
struct CohereGeneration {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Ai21Request {
    prompt: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct Ai21Response {
    completions: Vec<Ai21Completion>,
}

#[derive(Deserialize)]
struct Ai21Completion {
    data: Ai21Data,
}

#[derive(Deserialize)]
struct Ai21Data {
    text: String,
}

#[derive(Clone)]
pub struct BedrockProvider {
    client: HttpClient,
}

impl BedrockProvider {
    pub fn new(region: &str, bearer_token: &str, timeout: Duration) -> Self {
        let base_url = format!("https://bedrock-runtime.{}.amazonaws.com", region);
        Self::with_endpoint(base_url, bearer_token, timeout)
    }

    pub fn with_endpoint(endpoint: String, bearer_token: &str, timeout: Duration) -> Self {
        let auth_header = Some((
            "Authorization".to_string(),
            format!("Bearer {}", bearer_token),
        ));
        Self {
            client: HttpClient::new(endpoint, auth_header, timeout),
        }
    }

    async fn invoke(
        &self,
        model: &BedrockModel,
        prompt: &ChatPrompt,
    ) -> Result<String, ProviderFailure> {
        let path = format!("model/{}/invoke", model.id);
        let folded = format!("{}\n\n{}", prompt.system, prompt.message);

        let text = match model.family {
            ModelFamily::Claude => {
                let payload = ClaudeRequest {
                    anthropic_version: "bedrock-2023-05-31",
                    max_tokens: MAX_TOKENS,
                    system: &prompt.system,
                    messages: vec![ClaudeMessage {
                        role: "user",
                        content: &prompt.message,
                    }],
                    temperature: TEMPERATURE,
                    top_p: TOP_P,
                };
                let parsed: ClaudeResponse = self.post_json(&path, &payload).await?;
                parsed
                    .content
                    .into_iter()
                    .next()
                    .map(|block| block.text)
                    .ok_or_else(|| {
                        ProviderFailure::Malformed("no content blocks in response".to_string())
                    })?
            }
            ModelFamily::Llama => {
                let payload = LlamaRequest {
                    prompt: format!("{}\n\nUser: {}\nAssistant:", prompt.system, prompt.message),
                    max_gen_len: MAX_TOKENS,
                    temperature: TEMPERATURE,
                    top_p: TOP_P,
                };
                let parsed: LlamaResponse = self.post_json(&path, &payload).await?;
                parsed.generation
            }
            ModelFamily::Titan => {
                let payload = TitanRequest {
                    input_text: folded,
                    text_generation_config: TitanConfig {
                        max_token_count: MAX_TOKENS,
                        temperature: TEMPERATURE,
                        top_p: TOP_P,
                    },
                };
                let parsed: TitanResponse = self.post_json(&path, &payload).await?;
                parsed
                    .results
                    .into_iter()
                    .next()
                    .map(|result| result.output_text)
                    .ok_or_else(|| {
                        ProviderFailure::Malformed("no results in response".to_string())
                    })?
            }
            ModelFamily::Cohere => {
                let payload = CohereRequest {
                    prompt: folded,
                    max_tokens: MAX_TOKENS,
                    temperature: TEMPERATURE,
                    p: TOP_P,
                };
                let parsed: CohereResponse = self.post_json(&path, &payload).await?;
                parsed
                    .generations
                    .into_iter()
                    .next()
                    .map(|generation| generation.text)
                    .ok_or_else(|| {
                        ProviderFailure::Malformed("no generations in response".to_string())
                    })?
            }
            ModelFamily::Ai21 => {
                let payload = Ai21Request {
                    prompt: folded,
                    max_tokens: MAX_TOKENS,
                    temperature: TEMPERATURE,
                    top_p: TOP_P,
                };
                let parsed: Ai21Response = self.post_json(&path, &payload).await?;
                parsed
                    .completions
                    .into_iter()
                    .next()
                    .map(|completion| completion.data.text)
                    .ok_or_else(|| {
                        ProviderFailure::Malformed("no completions in response".to_string())
                    })?
            }
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderFailure::Empty);
        }
        Ok(text)
    }

    async fn post_json<Req, Resp>(&self, path: &str, payload: &Req) -> Result<Resp, ProviderFailure>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        let response = self.client.post(path, payload).await?;
        let body = response.text().await.map_err(ProviderFailure::from)?;
        serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("invoke response: {}", e)))
    }
}

#[async_trait]
impl ChatProvider for BedrockProvider {
    fn name(&self) -> &'static str {
        "aws_bedrock"
    }

    fn models(&self) -> &'static [&'static str] {
        model_names()
    }

    /// Single attempt per dispatch: the hinted model if it is in the catalog,
    /// otherwise the default.
    async fn chat(&self, prompt: &ChatPrompt) -> Result<ProviderReply, ProviderFailure> {
        let model = prompt
            .model_hint
            .as_deref()
            .and_then(lookup_model)
            .or_else(|| lookup_model(DEFAULT_MODEL))
            .expect("default bedrock model is in the catalog");

        let text = self.invoke(model, prompt).await?;
        Ok(ProviderReply {
            text,
            model: Some(model.name.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_families_explicitly() {
        assert_eq!(lookup_model("claude-3-haiku").unwrap().family, ModelFamily::Claude);
        assert_eq!(lookup_model("llama3-70b").unwrap().family, ModelFamily::Llama);
        assert_eq!(
            lookup_model("titan-text-express").unwrap().family,
            ModelFamily::Titan
        );
        assert_eq!(
            lookup_model("cohere-command").unwrap().family,
            ModelFamily::Cohere
        );
        assert_eq!(
            lookup_model("ai21-jurassic-mid").unwrap().family,
            ModelFamily::Ai21
        );
    }

    #[test]
    fn unknown_model_is_not_guessed() {
        // "claude-9000" contains a family marker but is not in the catalog
        assert!(lookup_model("claude-9000").is_none());
    }

    #[test]
    fn model_names_match_catalog() {
        let names = model_names();
        assert_eq!(names.len(), BEDROCK_MODELS.len());
        for (name, model) in names.iter().zip(BEDROCK_MODELS) {
            assert_eq!(*name, model.name);
        }
    }

    #[test]
    fn claude_body_uses_messages_api() {
        let payload = ClaudeRequest {
            anthropic_version: "bedrock-2023-05-31",
            max_tokens: MAX_TOKENS,
            system: "sys",
            messages: vec![ClaudeMessage {
                role: "user",
                content: "hi",
            }],
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(value["system"], "sys");
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn titan_body_uses_camel_case_config() {
        let payload = TitanRequest {
            input_text: "sys\n\nhi".to_string(),
            text_generation_config: TitanConfig {
                max_token_count: MAX_TOKENS,
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("inputText").is_some());
        assert!(value["textGenerationConfig"].get("maxTokenCount").is_some());
        assert!(value["textGenerationConfig"].get("topP").is_some());
    }

    #[test]
    fn ai21_and_cohere_field_names() {
        let ai21 = serde_json::to_value(&Ai21Request {
            prompt: "p".to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        })
        .unwrap();
        assert!(ai21.get("maxTokens").is_some());
        assert!(ai21.get("topP").is_some());

        let cohere = serde_json::to_value(&CohereRequest {
            prompt: "p".to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            p: TOP_P,
        })
        .unwrap();
        assert!(cohere.get("max_tokens").is_some());
        assert!(cohere.get("p").is_some());
    }

    #[test]
    fn llama_prompt_folds_system_and_turn_markers() {
        let payload = LlamaRequest {
            prompt: format!("{}\n\nUser: {}\nAssistant:", "sys", "hi"),
            max_gen_len: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };
        assert_eq!(payload.prompt, "sys\n\nUser: hi\nAssistant:");
    }

    #[test]
    fn responses_deserialize_per_family() {
        let claude: ClaudeResponse =
            serde_json::from_str(r#"{"content":[{"text":"a"}]}"#).unwrap();
        assert_eq!(claude.content[0].text, "a");

        let llama: LlamaResponse = serde_json::from_str(r#"{"generation":"b"}"#).unwrap();
        assert_eq!(llama.generation, "b");

        let titan: TitanResponse =
            serde_json::from_str(r#"{"results":[{"outputText":"c"}]}"#).unwrap();
        assert_eq!(titan.results[0].output_text, "c");

        let cohere: CohereResponse =
            serde_json::from_str(r#"{"generations":[{"text":"d"}]}"#).unwrap();
        assert_eq!(cohere.generations[0].text, "d");

        let ai21: Ai21Response =
            serde_json::from_str(r#"{"completions":[{"data":{"text":"e"}}]}"#).unwrap();
        assert_eq!(ai21.completions[0].data.text, "e");
    }
}
