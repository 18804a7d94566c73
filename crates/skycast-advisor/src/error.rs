//! Advisor error types.
//!
//! Pipeline steps fail with a specific [`PipelineError`], which is logged and
//! then collapsed into [`ProviderError::PrimaryProviderFailed`]. Best-effort
//! calls return [`BestEffort`], whose error carries nothing but the fact that
//! the failure has already been logged.

use skycast_core::NetworkError;
use thiserror::Error;

use crate::session::SessionError;

/// Failure of one fatal step of the primary provider pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to create environment: {0}")]
    EnvironmentCreationFailed(#[source] NetworkError),

    #[error("Failed to create agent: {0}")]
    AgentCreationFailed(#[source] NetworkError),

    #[error("Chat request failed: {0}")]
    ChatRequestFailed(#[source] NetworkError),

    #[error("Session state error: {0}")]
    Session(#[from] SessionError),
}

/// Failure of one recommendation tier.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Primary provider failed")]
    PrimaryProviderFailed,

    #[error("Secondary provider failed: {0}")]
    SecondaryProviderFailed(#[source] NetworkError),
}

/// Marker for a failure that has been logged and must not propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logged(());

impl Logged {
    pub(crate) fn warn(operation: &str, error: &dyn std::error::Error) -> Self {
        tracing::warn!("{} failed (continuing): {}", operation, error);
        Logged(())
    }
}

/// Result of an operation whose failure never changes control flow.
pub type BestEffort = Result<(), Logged>;

/// The briefing call has no fallback, so its failure reaches the caller.
#[derive(Debug, Error)]
#[error("Failed to generate weather briefing: {0}")]
pub struct BriefingError(#[from] pub NetworkError);

impl BriefingError {
    pub fn user_message(&self) -> &'static str {
        self.0.user_message()
    }
}
