//! Remote session identifiers for the primary provider.
//!
//! Setup only ever moves forward: `Empty -> EnvironmentReady -> AgentReady`.
//! A failed step leaves the state where it was, so the next request resumes
//! at the step that failed instead of starting over.

use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Empty,
    EnvironmentReady {
        environment_id: String,
    },
    AgentReady {
        environment_id: String,
        agent_id: String,
    },
}

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("environment already created")]
    EnvironmentAlreadySet,

    #[error("agent requires an environment")]
    MissingEnvironment,

    #[error("agent already created")]
    AgentAlreadySet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSession {
    state: SessionState,
}

impl ProviderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn environment_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::EnvironmentReady { environment_id }
            | SessionState::AgentReady { environment_id, .. } => Some(environment_id),
        }
    }

    pub fn agent_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::AgentReady { agent_id, .. } => Some(agent_id),
            _ => None,
        }
    }

    /// Record the environment created for this session.
    pub fn set_environment_id(&mut self, environment_id: String) -> Result<(), SessionError> {
        match self.state {
            SessionState::Empty => {
                self.state = SessionState::EnvironmentReady { environment_id };
                Ok(())
            }
            _ => Err(SessionError::EnvironmentAlreadySet),
        }
    }

    /// Record the agent created inside the current environment.
    pub fn set_agent_id(&mut self, agent_id: String) -> Result<(), SessionError> {
        match std::mem::take(&mut self.state) {
            SessionState::EnvironmentReady { environment_id } => {
                self.state = SessionState::AgentReady {
                    environment_id,
                    agent_id,
                };
                Ok(())
            }
            SessionState::Empty => Err(SessionError::MissingEnvironment),
            ready @ SessionState::AgentReady { .. } => {
                self.state = ready;
                Err(SessionError::AgentAlreadySet)
            }
        }
    }
}
