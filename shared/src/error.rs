use thiserror::Error;

/// Message shown to the user for every failed query. The underlying error is
/// only logged.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to find attractions. Please check your API key or try different locations.";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("API key not found in build environment (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("start and end locations must not be empty")]
    EmptyLocation,
    #[error("request to the Gemini API failed: {0}")]
    Transport(String),
    #[error("Gemini API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("prompt was blocked by the Gemini API: {0}")]
    Blocked(String),
    #[error("invalid attractions payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("attraction #{index} is invalid: {reason}")]
    InvalidAttraction { index: usize, reason: String },
}

impl QueryError {
    /// Text safe to put in front of the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            QueryError::EmptyLocation => "Please enter both a start and a destination.",
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}
