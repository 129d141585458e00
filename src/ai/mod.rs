//! AI service integration for plan and flyer generation
//!
//! Provides interfaces to a chat model (structured event plans) and an image
//! model (flyer artwork), with OpenAI-backed clients and test mocks.

pub mod mime;
pub mod mock;
pub mod openai;

pub use mock::{MockChatClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiImageClient};

use crate::Result;
use async_trait::async_trait;

/// Text-generation provider: one system + one user message in, one completion out.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Image-generation provider: one prompt in, one retrievable image URL out.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image_url(&self, prompt: &str) -> Result<String>;
}
