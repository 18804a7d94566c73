//! Shared request plumbing for the provider clients.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use skycast_core::{NetworkError, ReqwestErrorExt};

/// Client shared by every provider call in the process.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("SkyCast/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// Send `body` as JSON and decode a JSON reply.
///
/// Non-2xx statuses become `ServerError` and undecodable bodies become
/// `InvalidResponse`.
pub(crate) async fn post_json<B, T>(request: RequestBuilder, body: &B) -> Result<T, NetworkError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = request
        .json(body)
        .send()
        .await
        .map_err(ReqwestErrorExt::into_network_error)?;

    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, NetworkError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(NetworkError::ServerError {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(ReqwestErrorExt::into_network_error)?;

    serde_json::from_slice(&body).map_err(|e| NetworkError::InvalidResponse(e.to_string()))
}

/// Reject blank identifiers and answers.
pub(crate) fn require_text(value: String, field: &str) -> Result<String, NetworkError> {
    if value.trim().is_empty() {
        Err(NetworkError::InvalidResponse(format!("empty {}", field)))
    } else {
        Ok(value)
    }
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
