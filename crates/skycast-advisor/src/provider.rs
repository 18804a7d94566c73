use async_trait::async_trait;
use skycast_weather::WeatherSnapshot;

use crate::error::ProviderError;

/// One remote tier of the recommendation chain.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Short tier name used in logs
    fn name(&self) -> &'static str;

    /// Produce recommendation text for `weather`.
    ///
    /// # Errors
    /// Any failure; the orchestrator moves on to the next tier.
    async fn attempt(&self, weather: &WeatherSnapshot) -> Result<String, ProviderError>;
}
