use thiserror::Error;

/// Errors produced by the graphdesk core.
#[derive(Error, Debug)]
pub enum GraphdeskError {
    /// No node could be extracted from the backend response.
    #[error("{type_name} not found")]
    NotFound { type_name: String },

    /// A required field was missing before a mutating call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The HTTP request itself failed (connection, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// A success response carried a body that is not valid JSON.
    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An operation was attempted while disallowed by the current mode,
    /// e.g. a save dispatched while another save is in flight.
    #[error("operation not allowed: {0}")]
    State(String),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl GraphdeskError {
    /// The user-visible banner message for this error: the backend's `detail`
    /// field when present, otherwise the supplied generic fallback.
    pub fn banner_message(&self, fallback: &str) -> String {
        match self {
            GraphdeskError::NotFound { .. } => self.to_string(),
            GraphdeskError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}
