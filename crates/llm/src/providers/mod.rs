pub mod openrouter;

use sortie_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Message used when no credential can be resolved. Kept verbatim so the
/// caller-facing error stays stable across the CLI and tests.
pub const NO_API_KEY_MSG: &str =
    "No API key provided. Set OPENROUTER_API_KEY environment variable, or pass the key directly.";

/// Resolve the API credential: an explicit key wins, then the configured
/// (environment) key. Absence is a configuration error raised before any
/// client is built or network call issued.
pub fn resolve_api_key(config: &LlmConfig, explicit_key: Option<&str>) -> Result<String, LlmError> {
    explicit_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| config.api_key.as_ref().map(|k| k.trim().to_string()))
        .ok_or_else(|| LlmError::NotConfigured(NO_API_KEY_MSG.into()))
}

/// Create an OpenRouter provider using the configured model.
pub fn create_openrouter(
    config: &LlmConfig,
    explicit_key: Option<&str>,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    create_openrouter_model(config, explicit_key, &config.model)
}

/// Create an OpenRouter provider for a specific model (connection probing
/// walks a list of candidate models).
pub fn create_openrouter_model(
    config: &LlmConfig,
    explicit_key: Option<&str>,
    model: &str,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    let api_key = resolve_api_key(config, explicit_key)?;
    Ok(Box::new(openrouter::OpenRouterProvider::new(
        api_key,
        model.to_string(),
        config.base_url.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortie_core::config::{DEFAULT_MODEL, DEFAULT_OPENROUTER_BASE_URL};

    fn config_with_key(key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: key.map(str::to_string),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            temperature: 0.1,
            max_tokens: 2048,
        }
    }

    #[test]
    fn explicit_key_wins_over_config() {
        let cfg = config_with_key(Some("from-env"));
        let key = resolve_api_key(&cfg, Some("explicit")).unwrap();
        assert_eq!(key, "explicit");
    }

    #[test]
    fn config_key_used_when_no_explicit() {
        let cfg = config_with_key(Some("from-env"));
        assert_eq!(resolve_api_key(&cfg, None).unwrap(), "from-env");
    }

    #[test]
    fn keys_are_trimmed() {
        let cfg = config_with_key(None);
        assert_eq!(resolve_api_key(&cfg, Some("  sk-123  ")).unwrap(), "sk-123");
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let cfg = config_with_key(None);
        let err = resolve_api_key(&cfg, None).unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }
}
