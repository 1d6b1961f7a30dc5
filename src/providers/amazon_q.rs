use crate::providers::base_client::HttpClient;
use crate::providers::{ChatPrompt, ChatProvider, ProviderFailure, ProviderReply};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QChatRequest {
    user_message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QChatResponse {
    #[serde(default)]
    system_message: Option<String>,
}

/// Amazon Q Business adapter. Q has no system-prompt slot, so the
/// instructions are folded in front of the user message.
#[derive(Clone)]
pub struct AmazonQProvider {
    client: HttpClient,
    application_id: String,
}

impl AmazonQProvider {
    pub fn new(region: &str, application_id: &str, access_token: &str, timeout: Duration) -> Self {
        let base_url = format!("https://qbusiness.{}.amazonaws.com", region);
        Self::with_endpoint(base_url, application_id, access_token, timeout)
    }

    pub fn with_endpoint(
        endpoint: String,
        application_id: &str,
        access_token: &str,
        timeout: Duration,
    ) -> Self {
        let auth_header = Some((
            "Authorization".to_string(),
            format!("Bearer {}", access_token),
        ));
        let mut client = HttpClient::new(endpoint, auth_header, timeout);
        client.add_query_param("sync", "true");

        Self {
            client,
            application_id: application_id.to_string(),
        }
    }
}

#[async_trait]
impl ChatProvider for AmazonQProvider {
    fn name(&self) -> &'static str {
        "amazon_q"
    }

    fn models(&self) -> &'static [&'static str] {
        // Q Business selects its own model; there is nothing to hint
        &[]
    }

    async fn chat(&self, prompt: &ChatPrompt) -> Result<ProviderReply, ProviderFailure> {
        let payload = QChatRequest {
            user_message: format!("{}\n\n{}", prompt.system, prompt.message),
        };

        let path = format!("applications/{}/conversations", self.application_id);
        let response = self.client.post(&path, &payload).await?;

        let body = response.text().await.map_err(ProviderFailure::from)?;
        let parsed: QChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("chat response: {}", e)))?;

        let answer = parsed
            .system_message
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .ok_or(ProviderFailure::Empty)?;

        Ok(ProviderReply {
            text: answer,
            model: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_folds_system_into_user_message() {
        let payload = QChatRequest {
            user_message: format!("{}\n\n{}", "sys", "question"),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["userMessage"], "sys\n\nquestion");
    }

    #[test]
    fn response_reads_system_message() {
        let parsed: QChatResponse =
            serde_json::from_str(r#"{"systemMessage":"answer","conversationId":"c-1"}"#).unwrap();
        assert_eq!(parsed.system_message.as_deref(), Some("answer"));

        let missing: QChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(missing.system_message.is_none());
    }
}
