//! Recommendation text for the SkyCast dashboard.
//!
//! An [`Orchestrator`] walks an ordered list of remote providers (the agent
//! platform pipeline, then a single-shot text-generation call) and returns
//! the first answer it gets. When every provider fails it returns a canned
//! message from the [`FallbackTextGenerator`], so callers always get text.

pub mod briefing;
pub mod error;
pub mod fallback;
mod http;
pub mod orchestrator;
pub mod primary;
pub mod prompt;
pub mod provider;
pub mod secondary;
pub mod session;

pub use briefing::{daily_tip, BriefingGenerator};
pub use error::{BestEffort, BriefingError, Logged, PipelineError, ProviderError};
pub use fallback::FallbackTextGenerator;
pub use http::build_client;
pub use orchestrator::{Orchestrator, Recommendation, RecommendationSource};
pub use primary::{AgentStudioClient, PrimaryPipeline};
pub use provider::RecommendationProvider;
pub use secondary::{GeminiClient, GenerateContentRequest, SecondaryProvider};
pub use session::{ProviderSession, SessionError, SessionState};
