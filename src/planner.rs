//! Event plan orchestration: chat model first, then the flyer image.

use crate::ai::{ChatService, ImageGenerationService, OpenAiChatClient, OpenAiImageClient};
use crate::models::{Config, PlanRequest, PlanResponse};
use crate::{prompts, Error, Result};
use tracing::info;

/// Turns a [`PlanRequest`] into a complete [`PlanResponse`].
///
/// Holds no per-request state, so one instance is shared by every handler.
pub struct EventPlanner {
    chat: Box<dyn ChatService>,
    image_gen: Box<dyn ImageGenerationService>,
}

/// Injectable service bundle used to construct [`EventPlanner`] in tests/harnesses.
pub struct PlannerServices {
    pub chat: Box<dyn ChatService>,
    pub image_gen: Box<dyn ImageGenerationService>,
}

impl EventPlanner {
    pub fn with_services(services: PlannerServices) -> Self {
        Self {
            chat: services.chat,
            image_gen: services.image_gen,
        }
    }

    /// Build a planner backed by OpenAI from startup configuration.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        info!(
            "Chat provider: OpenAI (model: {}, max tokens: {}, temperature: {})",
            config.chat_model, config.chat_max_tokens, config.chat_temperature
        );
        info!(
            "Image provider: OpenAI (model: {}, size: {})",
            config.image_model, config.image_size
        );

        Self::with_services(PlannerServices {
            chat: Box::new(OpenAiChatClient::from_config(config, http_client.clone())),
            image_gen: Box::new(OpenAiImageClient::from_config(config, http_client)),
        })
    }

    /// Run the two-stage pipeline. Any stage failing fails the whole request;
    /// callers own logging of the returned error.
    pub async fn plan_event(&self, request: &PlanRequest) -> Result<PlanResponse> {
        let user_message = prompts::plan_user_message(request);

        let completion = self
            .chat
            .complete(prompts::PLAN_SYSTEM, &user_message)
            .await?;
        info!("Received plan completion ({} chars)", completion.len());

        let mut plan = parse_plan(&completion)?;
        info!("Parsed plan with theme '{}'", plan.theme);

        let image_prompt = prompts::flyer_image_prompt(request, &plan);
        let image_url = self.image_gen.generate_image_url(&image_prompt).await?;
        info!("Generated flyer image");

        plan.flyer_image_url = Some(image_url);
        Ok(plan)
    }
}

/// Parse the chat completion as a plan.
///
/// The text must be a single JSON object; surrounding whitespace is the only
/// thing tolerated. Any image URL the model invents is dropped.
pub fn parse_plan(text: &str) -> Result<PlanResponse> {
    let mut plan: PlanResponse = serde_json::from_str(text.trim())
        .map_err(|e| Error::Parse(format!("completion is not a valid plan object: {}", e)))?;
    plan.validate()?;
    plan.flyer_image_url = None;
    Ok(plan)
}
