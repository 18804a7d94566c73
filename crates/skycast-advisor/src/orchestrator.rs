//! Public entry point: tries each tier in order, ending in the fallback text.

use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use skycast_core::Config;
use skycast_weather::WeatherSnapshot;

use crate::fallback::FallbackTextGenerator;
use crate::http::build_client;
use crate::primary::{AgentStudioClient, PrimaryPipeline};
use crate::provider::RecommendationProvider;
use crate::secondary::{GeminiClient, SecondaryProvider};

/// Which tier produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationSource {
    Provider(&'static str),
    Fallback,
}

/// Recommendation text and its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub text: String,
    pub source: RecommendationSource,
}

/// Owns the tier list and, through the primary pipeline, the provider session.
///
/// Build one per process and share it by reference or `Arc`.
pub struct Orchestrator {
    tiers: Vec<Arc<dyn RecommendationProvider>>,
    fallback: FallbackTextGenerator,
}

impl Orchestrator {
    /// Primary pipeline then secondary provider, sharing one HTTP client.
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_client(config.http.request_timeout())?;
        Ok(Self::from_client(client, config))
    }

    /// Default tier list over an existing client.
    pub fn from_client(client: Client, config: &Config) -> Self {
        let primary = PrimaryPipeline::new(AgentStudioClient::new(
            client.clone(),
            &config.primary,
            &config.secondary.api_key,
        ));
        let secondary = SecondaryProvider::new(GeminiClient::new(client, &config.secondary));

        let tiers: Vec<Arc<dyn RecommendationProvider>> =
            vec![Arc::new(primary), Arc::new(secondary)];
        Self::with_tiers(tiers)
    }

    /// Custom tier list, tried in order before the fallback text.
    pub fn with_tiers(tiers: Vec<Arc<dyn RecommendationProvider>>) -> Self {
        Self {
            tiers,
            fallback: FallbackTextGenerator::new(),
        }
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|tier| tier.name()).collect()
    }

    /// Recommendation from the first tier that succeeds.
    pub async fn recommend(&self, weather: &WeatherSnapshot) -> Recommendation {
        for tier in &self.tiers {
            match tier.attempt(weather).await {
                Ok(text) => {
                    tracing::debug!("Recommendation served by {} tier", tier.name());
                    return Recommendation {
                        text,
                        source: RecommendationSource::Provider(tier.name()),
                    };
                }
                Err(e) => {
                    tracing::warn!("{} tier failed, trying next: {}", tier.name(), e);
                }
            }
        }

        tracing::warn!(
            "All providers failed for {}, using fallback recommendations",
            weather.name
        );
        Recommendation {
            text: self.fallback.generate(weather),
            source: RecommendationSource::Fallback,
        }
    }

    /// Recommendation text for `weather`. Never fails.
    pub async fn get_recommendations(&self, weather: &WeatherSnapshot) -> String {
        self.recommend(weather).await.text
    }
}
