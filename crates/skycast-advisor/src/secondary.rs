//! Text-generation tier: one stateless `generateContent` call.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use skycast_core::{NetworkError, SecondaryProviderConfig};
use skycast_weather::WeatherSnapshot;
use tracing::instrument;

use crate::error::ProviderError;
use crate::http::{endpoint, post_json, require_text};
use crate::prompt;
use crate::provider::RecommendationProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Sampling settings for a generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Settings used for recommendation text
    pub const RECOMMENDATION: Self = Self {
        temperature: 0.7,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 1000,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

impl SafetySetting {
    /// Block medium-and-above for every category
    pub fn standard_policy() -> Vec<Self> {
        [
            HarmCategory::Harassment,
            HarmCategory::HateSpeech,
            HarmCategory::SexuallyExplicit,
            HarmCategory::DangerousContent,
        ]
        .into_iter()
        .map(|category| Self {
            category,
            threshold: BlockThreshold::BlockMediumAndAbove,
        })
        .collect()
    }
}

/// Body of a `generateContent` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    /// Bare single-prompt request
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
            generation_config: None,
            safety_settings: Vec::new(),
        }
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn with_safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = settings;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()
            .map(|part| part.text)
    }
}

/// HTTP client for the generative language API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, config: &SecondaryProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Run one generation request and return the first candidate's text.
    #[instrument(skip(self, request), fields(model = %self.model), level = "debug")]
    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<String, NetworkError> {
        let url = endpoint(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", self.model),
        );

        tracing::debug!("Requesting generated content");
        let response: GenerateContentResponse = post_json(
            self.client.post(url).bearer_auth(&self.api_key),
            request,
        )
        .await?;

        let text = response
            .into_first_text()
            .ok_or_else(|| NetworkError::InvalidResponse("no candidates".to_string()))?;
        require_text(text, "candidate text")
    }
}

/// Second recommendation tier
#[derive(Debug, Clone)]
pub struct SecondaryProvider {
    client: GeminiClient,
}

impl SecondaryProvider {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecommendationProvider for SecondaryProvider {
    fn name(&self) -> &'static str {
        "secondary"
    }

    async fn attempt(&self, weather: &WeatherSnapshot) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::from_prompt(prompt::recommendation_prompt(weather))
            .with_generation_config(GenerationConfig::RECOMMENDATION)
            .with_safety_settings(SafetySetting::standard_policy());

        let text = self
            .client
            .generate(&request)
            .await
            .map_err(ProviderError::SecondaryProviderFailed)?;

        tracing::info!("Generated recommendations for {}", weather.name);
        Ok(text)
    }
}
