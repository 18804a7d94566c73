//! Dashboard header briefing.

use anyhow::Result;
use chrono::Utc;
use reqwest::Client;
use skycast_core::Config;
use skycast_weather::{WeatherBriefing, WeatherSnapshot};

use crate::error::BriefingError;
use crate::http::build_client;
use crate::prompt;
use crate::secondary::{GenerateContentRequest, GeminiClient};

/// One-line tip for the day. Rain wins over any temperature tip.
pub fn daily_tip(weather: &WeatherSnapshot) -> &'static str {
    let temp = weather.main.temp;

    if weather.is_raining() {
        "Don't forget your umbrella!"
    } else if temp > 30.0 {
        "It's very hot - stay hydrated and seek shade!"
    } else if temp > 25.0 {
        "Pleasant warm weather - great for outdoor activities!"
    } else if temp < 10.0 {
        "It's chilly - bundle up!"
    } else {
        "Enjoy the weather!"
    }
}

/// Generates briefings through the text-generation provider.
#[derive(Debug, Clone)]
pub struct BriefingGenerator {
    client: GeminiClient,
}

impl BriefingGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Fails only if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_client(config.http.request_timeout())?;
        Ok(Self::from_client(client, config))
    }

    /// Briefings over an existing client, e.g. the one the orchestrator uses.
    pub fn from_client(client: Client, config: &Config) -> Self {
        Self::new(GeminiClient::new(client, &config.secondary))
    }

    /// # Errors
    /// Returns the provider failure; there is no fallback briefing.
    pub async fn generate(
        &self,
        city: &str,
        weather: &WeatherSnapshot,
    ) -> Result<WeatherBriefing, BriefingError> {
        let request = GenerateContentRequest::from_prompt(prompt::briefing_prompt(city, weather));
        let text = self.client.generate(&request).await.map_err(|e| {
            tracing::warn!("Briefing generation failed for {}: {}", city, e);
            BriefingError::from(e)
        })?;

        Ok(WeatherBriefing {
            text,
            tips: vec![daily_tip(weather).to_string()],
            timestamp: Utc::now(),
        })
    }
}
