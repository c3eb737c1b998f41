//! Connection probing: walk a short list of candidate models with a
//! trivial prompt and report the first one that answers. Used by the
//! CLI's `test-connection` command so a misconfigured key or an
//! unavailable model shows up before anyone types a real question.

use sortie_core::config::LlmConfig;
use tracing::{debug, warn};

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers;

/// Models tried in order until one responds.
pub const PROBE_MODELS: &[&str] = &[
    "google/gemini-pro",
    "google/gemini-flash-1.5",
    "anthropic/claude-3-haiku",
];

const PROBE_PROMPT: &str = "Say 'Hello, API test successful!' and nothing else.";

#[derive(Debug)]
pub struct ProbeReport {
    pub success: bool,
    pub message: String,
    /// Model that answered, when any did.
    pub model: Option<String>,
    pub response: Option<String>,
}

/// Probe with the default OpenRouter providers.
pub async fn probe_connection(config: &LlmConfig, explicit_key: Option<&str>) -> ProbeReport {
    probe_with(
        |model| providers::create_openrouter_model(config, explicit_key, model),
        PROBE_MODELS,
    )
    .await
}

/// Probe seam: `make` builds a provider per model name.
pub async fn probe_with<M>(make: M, models: &[&str]) -> ProbeReport
where
    M: Fn(&str) -> Result<Box<dyn LlmProvider>, LlmError>,
{
    for model in models {
        let provider = match make(model) {
            Ok(p) => p,
            Err(e) => {
                // Credential problems are the same for every model, stop.
                return ProbeReport {
                    success: false,
                    message: crate::classify_llm_error(&e),
                    model: None,
                    response: None,
                };
            }
        };

        debug!("probing model {}", model);
        match provider
            .complete(vec![Message::user(PROBE_PROMPT)], 0.1, 50)
            .await
        {
            Ok(text) => {
                return ProbeReport {
                    success: true,
                    message: format!("API key works! Successfully connected using {model}"),
                    model: Some(model.to_string()),
                    response: Some(text),
                };
            }
            Err(e) => {
                warn!("model {} failed: {}", model, e);
                continue;
            }
        }
    }

    ProbeReport {
        success: false,
        message: "All models failed to connect".to_string(),
        model: None,
        response: None,
    }
}
