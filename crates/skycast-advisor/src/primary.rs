//! Agent platform tier.
//!
//! Before the platform can answer, it needs an environment and an agent
//! inside it. Both are created on first use and kept in a [`ProviderSession`]
//! for the lifetime of the pipeline. Each request then registers a weather
//! tool (best effort) and sends one chat message.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use skycast_core::{NetworkError, PrimaryProviderConfig};
use skycast_weather::WeatherSnapshot;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{BestEffort, Logged, PipelineError, ProviderError};
use crate::http::{endpoint, post_json, require_text};
use crate::prompt;
use crate::provider::RecommendationProvider;
use crate::session::{ProviderSession, SessionState};

/// Platform modules enabled on every environment we create.
pub const ENVIRONMENT_FEATURES: [&str; 4] = [
    "TOOL_CALLING",
    "OPEN_AI_RETRIEVAL_ASSISTANT",
    "SHORT_TERM_MEMORY",
    "LONG_TERM_MEMORY",
];

#[derive(Debug, Serialize)]
struct Feature {
    module: &'static str,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct CreateEnvironmentRequest<'a> {
    features: Vec<Feature>,
    llm_api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateEnvironmentResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateAgentRequest<'a> {
    name: &'a str,
    system_prompt: &'a str,
    environment_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateAgentResponse {
    agent_id: String,
}

#[derive(Debug, Serialize)]
struct CreateToolRequest {
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CreateToolResponse {
    tool_ids: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    user_id: &'a str,
    agent_id: &'a str,
    session_id: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// HTTP client for the agent platform's `/v2` API.
#[derive(Debug, Clone)]
pub struct AgentStudioClient {
    client: Client,
    base_url: String,
    api_key: String,
    llm_api_key: String,
    user_id: String,
    agent_name: String,
}

impl AgentStudioClient {
    /// `llm_api_key` is the credential the platform uses for its own model calls.
    pub fn new(client: Client, config: &PrimaryProviderConfig, llm_api_key: &str) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            llm_api_key: llm_api_key.to_string(),
            user_id: config.user_id.clone(),
            agent_name: config.agent_name.clone(),
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(endpoint(&self.base_url, path))
            .header("x-api-key", &self.api_key)
    }

    /// Create an execution environment and return its id.
    #[instrument(skip(self), level = "debug")]
    pub async fn create_environment(&self) -> Result<String, NetworkError> {
        tracing::debug!("Creating agent environment");

        let request = CreateEnvironmentRequest {
            features: ENVIRONMENT_FEATURES
                .iter()
                .map(|&module| Feature {
                    module,
                    enabled: true,
                })
                .collect(),
            llm_api_key: &self.llm_api_key,
        };

        let created: CreateEnvironmentResponse =
            post_json(self.post("v2/environment"), &request).await?;
        let id = require_text(created.id, "environment id")?;

        tracing::info!("Created agent environment {}", id);
        Ok(id)
    }

    /// Create the advisor agent inside `environment_id` and return its id.
    #[instrument(skip(self), level = "debug")]
    pub async fn create_agent(&self, environment_id: &str) -> Result<String, NetworkError> {
        tracing::debug!("Creating advisor agent");

        let request = CreateAgentRequest {
            name: &self.agent_name,
            system_prompt: prompt::ADVISOR_PERSONA,
            environment_id,
        };

        let created: CreateAgentResponse = post_json(self.post("v2/agent"), &request).await?;
        let agent_id = require_text(created.agent_id, "agent id")?;

        tracing::info!("Created advisor agent {}", agent_id);
        Ok(agent_id)
    }

    /// Register the weather tool. Returns the platform's tool identifiers.
    #[instrument(skip(self, weather), fields(location = %weather.name), level = "debug")]
    pub async fn create_weather_tool(
        &self,
        weather: &WeatherSnapshot,
    ) -> Result<serde_json::Value, NetworkError> {
        let request = CreateToolRequest {
            schema: prompt::weather_tool_schema(weather),
        };

        let created: CreateToolResponse = post_json(self.post("v2/tool"), &request).await?;
        created
            .tool_ids
            .filter(|ids| !ids.is_null())
            .ok_or_else(|| NetworkError::InvalidResponse("missing tool_ids".to_string()))
    }

    /// Send one chat message to the agent and return its answer.
    #[instrument(skip(self, message), level = "debug")]
    pub async fn chat(
        &self,
        agent_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<String, NetworkError> {
        let request = ChatRequest {
            user_id: &self.user_id,
            agent_id,
            session_id,
            message,
        };

        let reply: ChatResponse = post_json(self.post("v2/chat"), &request).await?;
        require_text(reply.response, "chat response")
    }
}

/// First recommendation tier: setup steps plus one chat call.
#[derive(Debug)]
pub struct PrimaryPipeline {
    client: AgentStudioClient,
    session: Mutex<ProviderSession>,
}

impl PrimaryPipeline {
    pub fn new(client: AgentStudioClient) -> Self {
        Self {
            client,
            session: Mutex::new(ProviderSession::new()),
        }
    }

    /// Copy of the current session state.
    pub async fn session_state(&self) -> SessionState {
        self.session.lock().await.state().clone()
    }

    /// Run the whole pipeline for one snapshot.
    ///
    /// # Errors
    /// Returns the step that failed. Tool registration never fails the run.
    pub async fn run(&self, weather: &WeatherSnapshot) -> Result<String, PipelineError> {
        let agent_id = self.ensure_agent().await?;

        if self.register_weather_tool(weather).await.is_err() {
            tracing::debug!("Chatting without the weather tool");
        }

        let message = prompt::chat_digest(weather);
        let session_id = prompt::session_key(weather);
        let answer = self
            .client
            .chat(&agent_id, &session_id, &message)
            .await
            .map_err(PipelineError::ChatRequestFailed)?;

        tracing::info!("Agent answered for {}", weather.name);
        Ok(answer)
    }

    /// Resume setup from wherever the session stands and return the agent id.
    ///
    /// The session lock is held across the remote calls, so concurrent first
    /// requests wait for one setup instead of each creating their own.
    async fn ensure_agent(&self) -> Result<String, PipelineError> {
        let mut session = self.session.lock().await;

        if let Some(agent_id) = session.agent_id() {
            return Ok(agent_id.to_string());
        }

        let environment_id = match session.environment_id() {
            Some(id) => id.to_string(),
            None => {
                let id = self
                    .client
                    .create_environment()
                    .await
                    .map_err(PipelineError::EnvironmentCreationFailed)?;
                session.set_environment_id(id.clone())?;
                id
            }
        };

        let agent_id = self
            .client
            .create_agent(&environment_id)
            .await
            .map_err(PipelineError::AgentCreationFailed)?;
        session.set_agent_id(agent_id.clone())?;

        Ok(agent_id)
    }

    async fn register_weather_tool(&self, weather: &WeatherSnapshot) -> BestEffort {
        match self.client.create_weather_tool(weather).await {
            Ok(tool_ids) => {
                tracing::debug!("Registered weather tool: {}", tool_ids);
                Ok(())
            }
            Err(e) => Err(Logged::warn("Weather tool registration", &e)),
        }
    }
}

#[async_trait]
impl RecommendationProvider for PrimaryPipeline {
    fn name(&self) -> &'static str {
        "primary"
    }

    async fn attempt(&self, weather: &WeatherSnapshot) -> Result<String, ProviderError> {
        self.run(weather).await.map_err(|e| {
            tracing::warn!("Primary provider pipeline failed: {}", e);
            ProviderError::PrimaryProviderFailed
        })
    }
}
