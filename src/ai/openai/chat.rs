use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ResponseFormat};
use crate::ai::ChatService;
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
    max_tokens: u32,
    temperature: f64,
    json_mode: bool,
}

impl OpenAiChatClient {
    /// Build a client with every knob taken from startup configuration.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new(
                config.openai_api_key.clone(),
                &config.openai_base_url,
                config.chat_timeout,
                client,
            ),
            model: config.chat_model.clone(),
            max_tokens: config.chat_max_tokens,
            temperature: config.chat_temperature,
            json_mode: config.chat_json_mode,
        }
    }
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_completion_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: self.json_mode.then(ResponseFormat::json_object),
        };

        tracing::debug!(
            "Sending chat completion request (model: {}, max tokens: {})",
            self.model,
            self.max_tokens
        );

        let response = self.http.chat_completion(&request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Chat completion was truncated at {} tokens", self.max_tokens);
        }

        choice
            .message
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::AiProvider("Empty response from OpenAI chat API".to_string()))
    }
}
