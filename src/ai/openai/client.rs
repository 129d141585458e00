use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Thin authenticated JSON client shared by the chat and image modules.
pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiHttpClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI {}: {}", path, e);
                classify(e, self.timeout)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| classify(e, self.timeout))?;
            tracing::error!("OpenAI API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "OpenAI API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify(e, self.timeout))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse OpenAI response: {}", e))
        })
    }

    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.post("/v1/chat/completions", request).await
    }
}

/// Timeouts become their own error kind; everything else stays an HTTP error.
fn classify(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("no response within {}s: {}", timeout.as_secs(), err))
    } else {
        Error::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::openai::test_support;
    use wiremock::matchers::header;
    use wiremock::{MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_sends_bearer_token() {
        let server = MockServer::start().await;

        test_support::post("/v1/echo")
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiHttpClient::new(
            "sk-test".to_string(),
            &format!("{}/", server.uri()),
            Duration::from_secs(5),
            Client::new(),
        );

        let resp: serde_json::Value = client
            .post("/v1/echo", &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(resp["ok"], true);
    }

    #[tokio::test]
    async fn test_post_maps_slow_provider_to_timeout() {
        let server = MockServer::start().await;

        test_support::post("/v1/slow")
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = OpenAiHttpClient::new(
            "key".to_string(),
            &server.uri(),
            Duration::from_millis(50),
            Client::new(),
        );

        let err = client
            .post::<_, serde_json::Value>("/v1/slow", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn test_post_rejects_undecodable_body() {
        let server = MockServer::start().await;

        test_support::post("/v1/garbage")
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = OpenAiHttpClient::new(
            "key".to_string(),
            &server.uri(),
            Duration::from_secs(5),
            Client::new(),
        );

        let err = client
            .post::<_, serde_json::Value>("/v1/garbage", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
