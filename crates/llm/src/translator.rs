//! Natural language to SQL translation.
//!
//! One question in, one candidate `SELECT` plus an explanation out. The
//! prompt pins the schema and output format; the completion is parsed
//! with a two-state line scanner keyed on the `SQL:` and `Explanation:`
//! prefixes the prompt asks for.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::classify::classify_llm_error;
use crate::provider::{LlmProvider, Message};

/// Explanation used when the completion never produced one.
pub const DEFAULT_EXPLANATION: &str = "Query generated successfully";

/// Instruction block appended after the schema description.
const INSTRUCTIONS: &str = "\
Instructions:
1. Convert the natural language query to a valid PostgreSQL SELECT statement
2. Use appropriate JOINs when querying related data
3. Include proper WHERE clauses for filtering
4. Use LIMIT for large result sets (max 1000 rows)
5. Ensure the query is safe and doesn't modify data
6. Return only SELECT statements, no INSERT, UPDATE, DELETE, or DDL
7. Use table aliases for clarity
8. Format dates properly if needed
";

/// One-shot transfer object from translator to caller. Constructed fresh
/// per request; `error` and populated `data` are mutually exclusive.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub sql: String,
    pub explanation: String,
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Failed result: empty sql/explanation/data, only the error text set.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            sql: String::new(),
            explanation: String::new(),
            data: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Converts natural language questions into candidate SQL via an LLM.
pub struct Translator {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl Translator {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Translate one question. Provider failures come back classified in
    /// `QueryResult::error`; the returned `data` is always empty here,
    /// execution is the caller's concern.
    pub async fn translate(&self, question: &str) -> QueryResult {
        let prompt = build_prompt(question);
        info!("Translating question: {}", question);
        debug!(prompt_len = prompt.len(), "sending translation prompt");

        let completion = match self
            .provider
            .complete(vec![Message::user(prompt)], self.temperature, self.max_tokens)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                debug!("translation failed: {}", e);
                return QueryResult::failure(classify_llm_error(&e));
            }
        };

        debug!(completion_len = completion.len(), "parsing completion");
        let (sql, explanation) = parse_completion(&completion);
        info!(sql_len = sql.len(), "translated question to SQL");

        QueryResult {
            sql,
            explanation,
            data: Vec::new(),
            error: None,
        }
    }
}

/// Build the full prompt: schema description, instruction block, the
/// question, and the literal output-format markers the scanner keys on.
pub fn build_prompt(question: &str) -> String {
    format!(
        "{schema}\n{instructions}\nNatural Language Query: \"{question}\"\n\n\
         Please convert this to a PostgreSQL SELECT statement. Return the SQL query \
         and a brief explanation of what it does.\n\n\
         Response format:\nSQL: [your SQL query here]\nExplanation: [brief explanation]\n",
        schema = sortie_core::schema::schema_description(),
        instructions = INSTRUCTIONS,
        question = question,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    Scanning,
    InSql,
}

/// Parse a completion into `(sql, explanation)`.
///
/// Two-state scanner: an `sql:` prefix (case-insensitive) enters SQL
/// capture with the line's remainder, an `explanation:` prefix leaves it
/// and takes the remainder as the explanation, and every other line seen
/// while capturing is appended to the SQL buffer verbatim.
///
/// Known quirk kept on purpose: when the model never emits an
/// `Explanation:` line there is no transition out of capture, so any
/// trailing prose is folded into the SQL. Callers see that as a bad query
/// at execution time, not as a parse error.
pub fn parse_completion(text: &str) -> (String, String) {
    let mut sql = String::new();
    let mut explanation = DEFAULT_EXPLANATION.to_string();
    let mut state = ScanState::Scanning;

    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.starts_with("sql:") {
            state = ScanState::InSql;
            sql = line["sql:".len()..].trim().to_string();
        } else if lower.starts_with("explanation:") {
            state = ScanState::Scanning;
            explanation = line["explanation:".len()..].trim().to_string();
        } else if state == ScanState::InSql {
            sql.push('\n');
            sql.push_str(line);
        }
    }

    (sql.trim().to_string(), explanation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_round_trip() {
        let completion = "SQL: SELECT * FROM profiles\nExplanation: lists all profiles";
        let (sql, explanation) = parse_completion(completion);
        assert_eq!(sql, "SELECT * FROM profiles");
        assert_eq!(explanation, "lists all profiles");
    }

    #[test]
    fn multiline_sql_is_newline_joined() {
        let completion = "SQL: SELECT p.rank, count(*)\nFROM profiles p\nGROUP BY p.rank\nExplanation: rank counts";
        let (sql, explanation) = parse_completion(completion);
        assert_eq!(sql, "SELECT p.rank, count(*)\nFROM profiles p\nGROUP BY p.rank");
        assert_eq!(explanation, "rank counts");
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        let completion = "sql: SELECT 1\nEXPLANATION: one";
        let (sql, explanation) = parse_completion(completion);
        assert_eq!(sql, "SELECT 1");
        assert_eq!(explanation, "one");
    }

    // Current behavior, kept deliberately: without an Explanation: line the
    // scanner never leaves SQL capture, so trailing prose lands in the SQL.
    #[test]
    fn missing_explanation_folds_trailing_lines_into_sql() {
        let completion = "SQL: SELECT * FROM profiles LIMIT 10\nThis query lists ten profiles.";
        let (sql, explanation) = parse_completion(completion);
        assert_eq!(
            sql,
            "SELECT * FROM profiles LIMIT 10\nThis query lists ten profiles."
        );
        assert_eq!(explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn preamble_before_sql_is_ignored() {
        let completion = "Sure, here is the query:\nSQL: SELECT 1\nExplanation: trivial";
        let (sql, _) = parse_completion(completion);
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn no_sql_line_yields_empty_sql_and_default_explanation() {
        let (sql, explanation) = parse_completion("I cannot answer that.");
        assert!(sql.is_empty());
        assert_eq!(explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn prompt_advertises_every_table_and_the_format_markers() {
        let prompt = build_prompt("Show me all pilots");
        for t in sortie_core::schema::SCHEMA {
            assert!(prompt.contains(t.name), "prompt missing table {}", t.name);
        }
        assert!(prompt.contains("Return only SELECT statements"));
        assert!(prompt.contains("LIMIT for large result sets (max 1000 rows)"));
        assert!(prompt.contains("SQL: [your SQL query here]"));
        assert!(prompt.contains("Explanation: [brief explanation]"));
        assert!(prompt.contains("Show me all pilots"));
    }

    #[test]
    fn failure_result_has_empty_sql_and_data() {
        let r = QueryResult::failure("boom");
        assert!(r.sql.is_empty());
        assert!(r.explanation.is_empty());
        assert!(r.data.is_empty());
        assert_eq!(r.error.as_deref(), Some("boom"));
    }
}
