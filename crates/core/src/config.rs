use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            backend: BackendConfig::from_env(),
            llm: LlmConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  backend:  url={}, key={}",
            self.backend.url.as_deref().unwrap_or("(none)"),
            if self.backend.anon_key.is_some() { "set" } else { "(none)" }
        );
        tracing::info!(
            "  llm:      model={}, key={}",
            self.llm.model,
            if self.llm.api_key.is_some() { "set" } else { "(none)" }
        );
    }
}

// ── Backend (hosted database) ─────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. https://xyz.supabase.co
    pub url: Option<String>,
    /// Anonymous (public) API key; row-level security does the real gating.
    pub anon_key: Option<String>,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self {
            url: env_opt("SUPABASE_URL"),
            anon_key: env_opt("SUPABASE_ANON_KEY"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}

// ── LLM (OpenRouter) ──────────────────────────────────────────

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-pro";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt("OPENROUTER_API_KEY"),
            model: env_or("OPENROUTER_MODEL", DEFAULT_MODEL),
            base_url: env_or("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
            temperature: env_or("LLM_TEMPERATURE", "0.1").parse().unwrap_or(0.1),
            max_tokens: env_or("LLM_MAX_TOKENS", "2048").parse().unwrap_or(2048),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
