use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::{mime, ImageGenerationService};
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
    size: String,
    quality: Option<String>,
}

impl OpenAiImageClient {
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new(
                config.openai_api_key.clone(),
                &config.openai_base_url,
                config.image_timeout,
                client,
            ),
            model: config.image_model.clone(),
            size: config.image_size.clone(),
            quality: config.image_quality.clone(),
        }
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image_url(&self, prompt: &str) -> Result<String> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.size.clone(),
            quality: self.quality.clone(),
        };

        tracing::debug!(
            "Sending image generation request (model: {}, size: {})",
            self.model,
            self.size
        );

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        let image_data = response
            .data
            .first()
            .ok_or_else(|| Error::AiProvider("No image data in OpenAI response".to_string()))?;

        // Models that only return base64 get an inline data URL instead.
        if let Some(url) = &image_data.url {
            Ok(url.clone())
        } else if let Some(b64_json) = &image_data.b64_json {
            mime::image_data_url(b64_json).ok_or_else(|| {
                Error::AiProvider("Invalid base64 image data in OpenAI response".to_string())
            })
        } else {
            Err(Error::AiProvider(
                "No image data (neither URL nor base64) in response".to_string(),
            ))
        }
    }
}
