//! Caller-level composition: translate, then execute, strictly in that
//! order. A translation error short-circuits before any execution
//! attempt; an execution error is surfaced separately so the translated
//! SQL and explanation stay visible. Nothing is cached or retried and
//! each invocation builds fresh collaborator handles.

use async_trait::async_trait;
use serde_json::Value;
use sortie_backend::{BackendClient, BackendError};
use sortie_core::config::{BackendConfig, Config, LlmConfig};
use tracing::{info, warn};

use crate::provider::{LlmError, LlmProvider};
use crate::providers;
use crate::translator::{QueryResult, Translator};

/// Shown when `ask`/`translate` is called with a blank question.
pub const MSG_EMPTY_QUESTION: &str = "Please enter a question.";

/// Produces a fresh provider handle per invocation (no persistent
/// connection or session object).
pub trait ProviderFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn LlmProvider>, LlmError>;
}

/// Default factory: OpenRouter with the configured model, credential
/// resolved at creation time.
pub struct OpenRouterFactory {
    config: LlmConfig,
    explicit_key: Option<String>,
}

impl OpenRouterFactory {
    pub fn new(config: LlmConfig, explicit_key: Option<String>) -> Self {
        Self {
            config,
            explicit_key,
        }
    }
}

impl ProviderFactory for OpenRouterFactory {
    fn create(&self) -> Result<Box<dyn LlmProvider>, LlmError> {
        providers::create_openrouter(&self.config, self.explicit_key.as_deref())
    }
}

/// Executes an already-translated SQL string and returns normalized rows.
/// No validation or sanitization happens on this side of the seam.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<Vec<Value>, BackendError>;
}

/// Default executor: a fresh [`BackendClient`] per call, forwarding to
/// the `execute_dynamic_query` remote procedure.
pub struct RpcExecutor {
    config: BackendConfig,
}

impl RpcExecutor {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SqlExecutor for RpcExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Value>, BackendError> {
        let client = BackendClient::new(&self.config)?;
        client.execute_dynamic_query(sql).await
    }
}

/// Final state of one `ask` invocation.
///
/// A translation failure lives inside `result.error` (with empty sql and
/// data). An execution failure after a successful translation lives in
/// `execution_error`, leaving `result.sql` and `result.explanation`
/// intact for the caller to show.
#[derive(Debug)]
pub struct AskOutcome {
    pub result: QueryResult,
    pub execution_error: Option<String>,
}

impl AskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.error.is_none() && self.execution_error.is_none()
    }
}

/// The translate-then-execute pipeline.
pub struct QueryPipeline<F: ProviderFactory, X: SqlExecutor> {
    providers: F,
    executor: X,
    temperature: f32,
    max_tokens: u32,
}

impl QueryPipeline<OpenRouterFactory, RpcExecutor> {
    /// Wire up the default collaborators from config. An explicit API key
    /// overrides the configured one.
    pub fn from_config(config: &Config, explicit_key: Option<&str>) -> Self {
        Self::new(
            OpenRouterFactory::new(config.llm.clone(), explicit_key.map(str::to_string)),
            RpcExecutor::new(config.backend.clone()),
            &config.llm,
        )
    }
}

impl<F: ProviderFactory, X: SqlExecutor> QueryPipeline<F, X> {
    pub fn new(providers: F, executor: X, llm: &LlmConfig) -> Self {
        Self {
            providers,
            executor,
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
        }
    }

    /// Translate only. The question must be non-empty and credential
    /// resolution happens here, both before any network call; failing
    /// either yields a failed result without the provider ever being
    /// invoked.
    pub async fn translate(&self, question: &str) -> QueryResult {
        let question = question.trim();
        if question.is_empty() {
            return QueryResult::failure(MSG_EMPTY_QUESTION);
        }
        let provider = match self.providers.create() {
            Ok(p) => p,
            Err(e) => {
                warn!("provider unavailable: {}", e);
                return QueryResult::failure(crate::classify_llm_error(&e));
            }
        };
        Translator::new(provider, self.temperature, self.max_tokens)
            .translate(question)
            .await
    }

    /// Full pipeline: translate, and when that produced non-empty SQL and
    /// no error, execute and merge the rows into the result.
    pub async fn ask(&self, question: &str) -> AskOutcome {
        let mut result = self.translate(question).await;

        if result.error.is_some() || result.sql.is_empty() {
            return AskOutcome {
                result,
                execution_error: None,
            };
        }

        match self.executor.execute(&result.sql).await {
            Ok(rows) => {
                info!(rows = rows.len(), "query executed");
                result.data = rows;
                AskOutcome {
                    result,
                    execution_error: None,
                }
            }
            Err(e) => {
                warn!("query execution failed: {}", e);
                AskOutcome {
                    result,
                    execution_error: Some(format!(
                        "Failed to execute query. Please try a different query. ({e})"
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;
    use sortie_core::config::{DEFAULT_MODEL, DEFAULT_OPENROUTER_BASE_URL};

    use super::*;
    use crate::provider::Message;

    fn llm_config() -> LlmConfig {
        LlmConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            temperature: 0.1,
            max_tokens: 2048,
        }
    }

    /// Counts completions and replies with a canned text.
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        reply: String,
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        async fn complete(
            &self,
            _messages: Vec<Message>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    /// Factory with a resolvable credential handing out counting providers.
    struct MockFactory {
        calls: Arc<AtomicUsize>,
        reply: String,
    }

    impl ProviderFactory for MockFactory {
        fn create(&self) -> Result<Box<dyn LlmProvider>, LlmError> {
            Ok(Box::new(CountingProvider {
                calls: self.calls.clone(),
                reply: self.reply.clone(),
            }))
        }
    }

    /// Factory with no credential: creation fails, but it still tracks a
    /// transport so the test can assert zero network activity.
    struct UnconfiguredFactory {
        calls: Arc<AtomicUsize>,
    }

    impl ProviderFactory for UnconfiguredFactory {
        fn create(&self) -> Result<Box<dyn LlmProvider>, LlmError> {
            // Same resolution path the real factory takes with no key set.
            providers::resolve_api_key(&llm_config(), None)?;
            Ok(Box::new(CountingProvider {
                calls: self.calls.clone(),
                reply: String::new(),
            }))
        }
    }

    struct MockExecutor {
        calls: Arc<AtomicUsize>,
        rows: Result<Vec<Value>, String>,
    }

    #[async_trait]
    impl SqlExecutor for MockExecutor {
        async fn execute(&self, _sql: &str) -> Result<Vec<Value>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.rows {
                Ok(rows) => Ok(rows.clone()),
                Err(msg) => Err(BackendError::Remote {
                    status: 400,
                    message: msg.clone(),
                }),
            }
        }
    }

    fn pipeline(
        reply: &str,
        rows: Result<Vec<Value>, String>,
    ) -> (
        QueryPipeline<MockFactory, MockExecutor>,
        Arc<AtomicUsize>,
        Arc<AtomicUsize>,
    ) {
        let llm_calls = Arc::new(AtomicUsize::new(0));
        let exec_calls = Arc::new(AtomicUsize::new(0));
        let p = QueryPipeline::new(
            MockFactory {
                calls: llm_calls.clone(),
                reply: reply.to_string(),
            },
            MockExecutor {
                calls: exec_calls.clone(),
                rows,
            },
            &llm_config(),
        );
        (p, llm_calls, exec_calls)
    }

    #[tokio::test]
    async fn end_to_end_happy_path() {
        let completion = "SQL: SELECT * FROM profiles WHERE specialization = 'Pilot' LIMIT 1000\n\
                          Explanation: Returns pilot personnel";
        let rows = vec![json!({"first_name": "Arjun"}), json!({"first_name": "Meera"})];
        let (p, llm_calls, exec_calls) = pipeline(completion, Ok(rows));

        let outcome = p.ask("Show me all pilots").await;

        assert!(outcome.is_success());
        assert!(outcome.result.sql.contains("WHERE specialization = 'Pilot'"));
        assert_eq!(outcome.result.explanation, "Returns pilot personnel");
        assert_eq!(outcome.result.data.len(), 2);
        assert!(outcome.result.error.is_none());
        assert_eq!(llm_calls.load(Ordering::SeqCst), 1);
        assert_eq!(exec_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_network_call() {
        let llm_calls = Arc::new(AtomicUsize::new(0));
        let exec_calls = Arc::new(AtomicUsize::new(0));
        let p = QueryPipeline::new(
            UnconfiguredFactory {
                calls: llm_calls.clone(),
            },
            MockExecutor {
                calls: exec_calls.clone(),
                rows: Ok(vec![]),
            },
            &llm_config(),
        );

        let outcome = p.ask("Show me all pilots").await;

        let err = outcome.result.error.expect("configuration error expected");
        assert!(err.contains("OPENROUTER_API_KEY"));
        assert!(outcome.result.sql.is_empty());
        assert!(outcome.result.data.is_empty());
        assert_eq!(llm_calls.load(Ordering::SeqCst), 0);
        assert_eq!(exec_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn error_and_data_are_mutually_exclusive() {
        let llm_calls = Arc::new(AtomicUsize::new(0));
        let exec_calls = Arc::new(AtomicUsize::new(0));
        let p = QueryPipeline::new(
            UnconfiguredFactory { calls: llm_calls },
            MockExecutor {
                calls: exec_calls,
                rows: Ok(vec![json!({"a": 1})]),
            },
            &llm_config(),
        );

        let result = p.translate("anything").await;
        assert!(result.error.is_some());
        assert!(result.sql.is_empty());
        assert!(result.data.is_empty());
    }

    #[tokio::test]
    async fn execution_failure_keeps_translated_sql_visible() {
        let completion = "SQL: SELECT * FROM profiles\nExplanation: lists all profiles";
        let (p, _, exec_calls) = pipeline(completion, Err("syntax error at or near".into()));

        let outcome = p.ask("list everyone").await;

        assert_eq!(exec_calls.load(Ordering::SeqCst), 1);
        // The translated parts survive the execution failure.
        assert_eq!(outcome.result.sql, "SELECT * FROM profiles");
        assert_eq!(outcome.result.explanation, "lists all profiles");
        assert!(outcome.result.error.is_none());
        let exec_err = outcome.execution_error.expect("execution error expected");
        assert!(exec_err.contains("Failed to execute query"));
    }

    #[tokio::test]
    async fn empty_sql_skips_execution() {
        // Completion with no SQL: line at all. Parse degradation is not an
        // error, but nothing gets executed either.
        let (p, llm_calls, exec_calls) = pipeline("I cannot answer that.", Ok(vec![]));

        let outcome = p.ask("gibberish").await;

        assert!(outcome.result.sql.is_empty());
        assert!(outcome.result.error.is_none());
        assert!(outcome.execution_error.is_none());
        assert_eq!(llm_calls.load(Ordering::SeqCst), 1);
        assert_eq!(exec_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_question_fails_before_any_network_call() {
        let completion = "SQL: SELECT 1\nExplanation: one";
        let (p, llm_calls, exec_calls) = pipeline(completion, Ok(vec![]));

        for question in ["", "   ", "\n\t"] {
            let outcome = p.ask(question).await;
            assert_eq!(outcome.result.error.as_deref(), Some(MSG_EMPTY_QUESTION));
            assert!(outcome.result.sql.is_empty());
            assert!(outcome.result.data.is_empty());
        }
        assert_eq!(llm_calls.load(Ordering::SeqCst), 0);
        assert_eq!(exec_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn each_ask_creates_a_fresh_provider() {
        let completion = "SQL: SELECT 1\nExplanation: one";
        let (p, llm_calls, _) = pipeline(completion, Ok(vec![]));

        p.ask("first").await;
        p.ask("second").await;

        assert_eq!(llm_calls.load(Ordering::SeqCst), 2);
    }
}
