pub mod classify;
pub mod pipeline;
pub mod probe;
pub mod provider;
pub mod providers;
pub mod translator;

pub use classify::classify_llm_error;
pub use pipeline::{AskOutcome, QueryPipeline, RpcExecutor, SqlExecutor};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use translator::{QueryResult, Translator};
