//! Data models and structures
//!
//! Defines the event plan request/response bodies exchanged with clients and
//! the startup configuration for the service.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client request body for `POST /plan-event`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRequest {
    pub prompt: String,
    pub date: String,
    pub location: String,
    pub time: String,
    pub flyer_style: String,
}

/// Structured plan produced by the chat model, plus the rendered flyer image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanResponse {
    pub theme: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drinks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entertainment: Option<Vec<String>>,
    pub flyer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flyer_image_url: Option<String>,
}

impl PlanResponse {
    /// Check the fields that later stages depend on.
    ///
    /// `flyer` seeds the image prompt and `theme` names the event, so neither
    /// may be blank.
    pub fn validate(&self) -> Result<()> {
        if self.theme.trim().is_empty() {
            return Err(Error::Parse("plan is missing a theme".to_string()));
        }
        if self.flyer.trim().is_empty() {
            return Err(Error::Parse("plan is missing flyer text".to_string()));
        }
        Ok(())
    }
}

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:5173,http://localhost:3001,*";

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub chat_max_tokens: u32,
    pub chat_temperature: f64,
    pub chat_json_mode: bool,
    pub chat_timeout: Duration,
    pub image_model: String,
    pub image_size: String,
    pub image_quality: Option<String>,
    pub image_timeout: Duration,
    pub bind_addr: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let openai_api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| Error::Config("OPENAI_API_KEY not set".to_string()))?;

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            chat_max_tokens: parse_or("CHAT_MAX_TOKENS", get("CHAT_MAX_TOKENS"), 600)?,
            chat_temperature: parse_or("CHAT_TEMPERATURE", get("CHAT_TEMPERATURE"), 0.7)?,
            chat_json_mode: parse_or("CHAT_JSON_MODE", get("CHAT_JSON_MODE"), true)?,
            chat_timeout: Duration::from_secs(parse_or(
                "CHAT_TIMEOUT_SECS",
                get("CHAT_TIMEOUT_SECS"),
                60,
            )?),
            image_model: get("IMAGE_MODEL").unwrap_or_else(|| "dall-e-3".to_string()),
            image_size: square_image_size(get("IMAGE_SIZE"))?,
            image_quality: get("IMAGE_QUALITY"),
            image_timeout: Duration::from_secs(parse_or(
                "IMAGE_TIMEOUT_SECS",
                get("IMAGE_TIMEOUT_SECS"),
                120,
            )?),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), 3001)?,
            cors_allowed_origins,
        })
    }
}

/// Flyers are always rendered square, so `IMAGE_SIZE` must be `NxN`.
fn square_image_size(value: Option<String>) -> Result<String> {
    let Some(raw) = value else {
        return Ok("1024x1024".to_string());
    };

    let invalid = || {
        Error::Config(format!(
            "Invalid value for IMAGE_SIZE: '{}' (expected a square size such as 1024x1024)",
            raw
        ))
    };

    let (width, height) = raw.split_once('x').ok_or_else(invalid)?;
    let width: u32 = width.parse().map_err(|_| invalid())?;
    let height: u32 = height.parse().map_err(|_| invalid())?;
    if width == 0 || width != height {
        return Err(invalid());
    }

    Ok(raw)
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("Invalid value for {}: '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, "https://api.openai.com");
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.chat_max_tokens, 600);
        assert!((config.chat_temperature - 0.7).abs() < f64::EPSILON);
        assert!(config.chat_json_mode);
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.image_size, "1024x1024");
        assert!(config.image_quality.is_none());
        assert_eq!(config.port, 3001);
        assert_eq!(
            config.cors_allowed_origins,
            vec![
                "http://localhost:3000",
                "http://localhost:5173",
                "http://localhost:3001",
                "*"
            ]
        );
    }

    #[test]
    fn test_config_missing_api_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_config_blank_api_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9999/"),
            ("CHAT_MODEL", "gpt-4o-mini"),
            ("CHAT_TEMPERATURE", "0.2"),
            ("CHAT_JSON_MODE", "false"),
            ("IMAGE_QUALITY", "hd"),
            ("IMAGE_TIMEOUT_SECS", "5"),
            ("PORT", "8080"),
            ("CORS_ALLOWED_ORIGINS", "https://a.test, https://b.test"),
        ]))
        .unwrap();

        assert_eq!(config.openai_base_url, "http://localhost:9999");
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert!(!config.chat_json_mode);
        assert_eq!(config.image_quality.as_deref(), Some("hd"));
        assert_eq!(config.image_timeout, Duration::from_secs(5));
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.test", "https://b.test"]
        );
    }

    #[test]
    fn test_config_invalid_number_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_config_rejects_non_square_image_size() {
        for size in ["1792x1024", "1024", "widexhigh", "0x0"] {
            let err = Config::from_lookup(lookup_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("IMAGE_SIZE", size),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{} should be rejected", size);
            assert!(err.to_string().contains("IMAGE_SIZE"));
        }
    }

    #[test]
    fn test_config_accepts_square_image_size() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("IMAGE_SIZE", "512x512"),
        ]))
        .unwrap();
        assert_eq!(config.image_size, "512x512");
    }

    #[test]
    fn test_plan_request_uses_snake_case_fields() {
        let request: PlanRequest = serde_json::from_str(
            r#"{"prompt":"Birthday","date":"2024-05-01","location":"Loft","time":"19:00","flyer_style":"retro"}"#,
        )
        .unwrap();
        assert_eq!(request.flyer_style, "retro");
    }

    #[test]
    fn test_plan_response_optional_lists_default_to_none() {
        let plan: PlanResponse = serde_json::from_str(
            r#"{"theme":"Garden","date":"d","time":"t","location":"l","flyer":"Come!"}"#,
        )
        .unwrap();
        assert!(plan.food.is_none());
        assert!(plan.flyer_image_url.is_none());

        let json = serde_json::to_string(&plan).unwrap();
        assert!(!json.contains("food"));
        assert!(!json.contains("flyer_image_url"));
    }

    #[test]
    fn test_plan_response_validate_rejects_blank_flyer() {
        let plan = PlanResponse {
            theme: "Garden".to_string(),
            date: "d".to_string(),
            time: "t".to_string(),
            location: "l".to_string(),
            food: None,
            drinks: None,
            activities: None,
            entertainment: None,
            flyer: "  ".to_string(),
            flyer_image_url: None,
        };
        assert!(matches!(plan.validate(), Err(Error::Parse(_))));

        let plan = PlanResponse {
            flyer: "Come along".to_string(),
            theme: String::new(),
            ..plan
        };
        assert!(matches!(plan.validate(), Err(Error::Parse(_))));
    }
}
