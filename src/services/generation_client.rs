use std::{env, time::Duration};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::openai_client::{
    extract_message_content, ChatCompletionRequest, OpenAIClient, DEFAULT_BASE_URL,
};
use crate::error::Result;

/// Text returned in place of a model reply whenever generation is unavailable.
pub const EMPTY_JSON: &str = "{}";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Boundary to the external text generation service.
///
/// Implementations never fail: any problem is reported as [`EMPTY_JSON`] so
/// callers fall back to their static data.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether a live service is behind this generator
    fn is_configured(&self) -> bool;

    async fn generate(&self, prompt: &str) -> String;
}

/// Settings for [`GenerationClient`], normally read from the environment.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GenerationConfig {
    /// Read `GEMINI_API_KEY`/`OPENAI_API_KEY`, `TRAVEL_PLANNER_BASE_URL`/`OPENAI_BASE_URL`,
    /// `TRAVEL_PLANNER_MODEL` and `TRAVEL_PLANNER_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let base_url = env::var("TRAVEL_PLANNER_BASE_URL")
            .or_else(|_| env::var("OPENAI_BASE_URL"))
            .unwrap_or(defaults.base_url);

        let model = env::var("TRAVEL_PLANNER_MODEL").unwrap_or(defaults.model);

        let timeout = env::var("TRAVEL_PLANNER_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_key,
            base_url,
            model,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP-backed [`TextGenerator`]. Without an API key it never touches the network.
#[derive(Clone, Debug)]
pub struct GenerationClient {
    client: Option<OpenAIClient>,
    model: String,
}

impl GenerationClient {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = match config.api_key {
            Some(api_key) => {
                let mut client = OpenAIClient::new(api_key, config.timeout)?;
                client.set_base_url(config.base_url);
                Some(client)
            }
            None => None,
        };

        Ok(Self {
            client,
            model: config.model,
        })
    }

    /// A generator that always falls back.
    pub fn disabled() -> Self {
        Self {
            client: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GenerationConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, client: &OpenAIClient, prompt: &str) -> Result<String> {
        let body = ChatCompletionRequest::from_prompt(self.model.as_str(), prompt)
            .with_temperature(Some(TEMPERATURE))
            .with_max_tokens(Some(MAX_OUTPUT_TOKENS))
            .into_value();

        let response = client.chat_completion(&body).await?;
        extract_message_content(&response)
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn generate(&self, prompt: &str) -> String {
        let Some(client) = &self.client else {
            debug!(target: "travel_planner::generation", "generation not configured, using fallback");
            return EMPTY_JSON.to_string();
        };

        match self.complete(client, prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    target: "travel_planner::generation",
                    model = %self.model,
                    code = err.error_code(),
                    error = %err,
                    "generation failed, using fallback"
                );
                EMPTY_JSON.to_string()
            }
        }
    }
}
