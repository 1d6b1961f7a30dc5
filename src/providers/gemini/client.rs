use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::*;
use crate::providers::{ChatPrompt, ProviderFailure};
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct GeminiClient {
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(base_url: String, api_key: &str, timeout: Duration) -> Self {
        let mut client = HttpClient::new(base_url, None, timeout);

        // Gemini authenticates via query parameter, not header
        client.add_query_param("key", api_key);

        Self { client }
    }

    pub async fn generate_content(
        &self,
        model: &str,
        prompt: &ChatPrompt,
    ) -> Result<String, ProviderFailure> {
        let payload = build_payload(prompt);
        let response = self
            .client
            .post(&format!("v1beta/models/{}:generateContent", model), &payload)
            .await?;

        let body = response.text().await.map_err(ProviderFailure::from)?;
        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("generate content: {}", e)))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.trim().to_string())
            .ok_or_else(|| ProviderFailure::Malformed("no candidates in response".to_string()))?;

        if text.is_empty() {
            return Err(ProviderFailure::Empty);
        }

        Ok(text)
    }
}

pub(super) fn build_payload(prompt: &ChatPrompt) -> GeminiRequest {
    let system_instruction = if prompt.system.trim().is_empty() {
        None
    } else {
        Some(SystemInstruction {
            parts: vec![GeminiPart {
                text: prompt.system.clone(),
            }],
        })
    };

    GeminiRequest {
        contents: vec![GeminiContentPart {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.message.clone(),
            }],
        }],
        system_instruction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_separates_system_instruction() {
        let prompt = ChatPrompt {
            system: "be concise".to_string(),
            message: "hello".to_string(),
            model_hint: None,
        };

        let payload = build_payload(&prompt);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["system_instruction"]["parts"][0]["text"], "be concise");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn blank_system_is_omitted() {
        let prompt = ChatPrompt {
            system: "  ".to_string(),
            message: "hello".to_string(),
            model_hint: None,
        };

        let value = serde_json::to_value(&build_payload(&prompt)).unwrap();
        assert!(value.get("system_instruction").is_none());
    }
}
