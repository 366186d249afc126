use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Human readable description, falling back to the debug form when the
    /// underlying error renders as an empty string.
    pub fn description(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            format!("{self:?}")
        } else {
            text
        }
    }
}
