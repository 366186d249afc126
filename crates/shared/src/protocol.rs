use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Route of the generation endpoint, joined onto the configured base URL.
pub const GENERATE_TEST_ROUTE: &str = "/generate-test";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateTestRequest {
    pub code: String,
}

impl GenerateTestRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Body returned by the generation service. Every field is optional; an empty
/// object with a success status is an empty successful result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateTestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl GenerateTestResponse {
    pub fn from_body(body: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Application level error message, if the service reported one.
    /// An empty string counts as no message.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}

/// Joins the base URL and the generation route, dropping trailing slashes on
/// the base first.
pub fn generate_test_url(base_url: &str) -> String {
    format!("{}{GENERATE_TEST_ROUTE}", base_url.trim_end_matches('/'))
}
