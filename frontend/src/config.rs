//! Build-time configuration. Values are baked in by the bundler environment,
//! the browser has no process environment of its own.

use shared::{QueryError, gemini::GeminiConfig};

pub fn gemini() -> Result<GeminiConfig, QueryError> {
    GeminiConfig::from_values(
        option_env!("GEMINI_API_KEY").or(option_env!("API_KEY")),
        option_env!("GEMINI_MODEL"),
        option_env!("GEMINI_API_ROOT"),
    )
}
