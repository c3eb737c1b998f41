//! Maps provider errors to the user-facing categories the dashboard shows.
//!
//! Classification is substring matching on the error message. That is a
//! heuristic, not a contract: keep every call site going through this one
//! function so a structured error API can replace it later without
//! touching callers.

use crate::provider::LlmError;

pub const MSG_BAD_KEY: &str = "OpenRouter API key is invalid or expired";
pub const MSG_QUOTA: &str = "OpenRouter API quota exceeded";
pub const MSG_NETWORK: &str = "Network error connecting to OpenRouter API";

/// Convert an [`LlmError`] to a human-readable category string.
pub fn classify_llm_error(err: &LlmError) -> String {
    match err {
        // Configuration errors carry their own instruction text.
        LlmError::NotConfigured(msg) => msg.clone(),
        LlmError::HttpError(_) => MSG_NETWORK.to_string(),
        other => {
            let msg = other.to_string();
            if msg.contains("API_KEY") || msg.contains("401") {
                MSG_BAD_KEY.to_string()
            } else if msg.contains("quota") || msg.contains("limit") || msg.contains("429") {
                MSG_QUOTA.to_string()
            } else if msg.contains("network") || msg.contains("fetch") {
                MSG_NETWORK.to_string()
            } else {
                msg
            }
        }
    }
}
