//! HTTP client for the remote test generation service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::protocol::{generate_test_url, GenerateTestRequest, GenerateTestResponse};
use tracing::{debug, info};

use crate::error::GenerationError;

/// Anything that can turn source text into generated test code.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, code: &str) -> Result<String, GenerationError>;
}

pub struct GenerationClient {
    http: Client,
    endpoint: String,
}

impl GenerationClient {
    /// The underlying client has no request timeout: a hung service leaves the
    /// request in flight.
    pub fn new(backend_url: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: generate_test_url(backend_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationService for GenerationClient {
    async fn generate(&self, code: &str) -> Result<String, GenerationError> {
        info!(endpoint = %self.endpoint, bytes = code.len(), "requesting test generation");
        let res = self
            .http
            .post(&self.endpoint)
            .json(&GenerateTestRequest::new(code))
            .send()
            .await
            .map_err(GenerationError::transport)?;
        let status = res.status();
        let body = res.bytes().await.map_err(GenerationError::transport)?;
        debug!(%status, bytes = body.len(), "generation service responded");
        interpret_response(status, &body)
    }
}

/// Maps a raw service response onto the lifecycle outcome.
///
/// An unparsable body is a transport failure even when the status is an
/// error; a parsed body with a non-empty error field or a failing status is
/// an application failure.
pub fn interpret_response(status: StatusCode, body: &[u8]) -> Result<String, GenerationError> {
    let response = GenerateTestResponse::from_body(body)
        .map_err(|err| GenerationError::Transport(err.description()))?;

    if !status.is_success() || response.error_message().is_some() {
        let message = response
            .error_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(GenerationError::Application(message));
    }

    Ok(response.test_code.unwrap_or_default())
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
