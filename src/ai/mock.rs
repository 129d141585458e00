use super::{ChatService, ImageGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Scripted = std::result::Result<String, String>;

/// Scripted chat provider. Responses cycle; failures surface as `Error::AiProvider`.
#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<Scripted>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(response.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// `(system, user)` message pairs received so far.
    pub fn get_requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::AiProvider(
                "MockChatClient has no scripted response".to_string(),
            ));
        }

        let index = (*count - 1) % responses.len();
        responses[index].clone().map_err(Error::AiProvider)
    }
}

/// Scripted image provider. Defaults to a fixed example URL.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<Scripted>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageGenerationClient {
    pub const DEFAULT_URL: &'static str = "https://example.com/flyer.png";

    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_url_response(self, url: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(url.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image_url(&self, prompt: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.prompts.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(Self::DEFAULT_URL.to_string());
        }

        let index = (*count - 1) % responses.len();
        responses[index].clone().map_err(Error::AiProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_chat_client_cycles_responses() {
        let client = MockChatClient::new()
            .with_response("first")
            .with_response("second");

        assert_eq!(client.complete("sys", "a").await.unwrap(), "first");
        assert_eq!(client.complete("sys", "b").await.unwrap(), "second");
        // Should cycle back
        assert_eq!(client.complete("sys", "c").await.unwrap(), "first");

        assert_eq!(client.get_call_count(), 3);
        assert_eq!(client.get_requests()[1], ("sys".to_string(), "b".to_string()));
    }

    #[tokio::test]
    async fn test_mock_chat_client_without_script_fails() {
        let client = MockChatClient::new();
        let err = client.complete("sys", "user").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_mock_chat_client_scripted_failure() {
        let client = MockChatClient::new().with_failure("upstream down");
        let err = client.complete("sys", "user").await.unwrap_err();
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_mock_image_client_default_url_and_shared_state() {
        let client = MockImageGenerationClient::new();
        let handle = client.clone();

        let url = client.generate_image_url("a flyer").await.unwrap();
        assert_eq!(url, MockImageGenerationClient::DEFAULT_URL);
        assert_eq!(handle.get_call_count(), 1);
        assert_eq!(handle.get_prompts(), vec!["a flyer".to_string()]);
    }
}
