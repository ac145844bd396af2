//! Statement executor.
//!
//! This layer performs no I/O of its own: the caller supplies an async
//! callback that runs one statement against whatever driver it owns and
//! returns rows as JSON objects. The executor invokes it once for the data
//! statement and, when present, once for the total statement, then merges
//! the results. Callback errors propagate unchanged — no retry, no backoff,
//! no partial results.

use std::future::Future;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::ast::pipeline::{Statements, TOTAL_COUNT_COLUMN};
use crate::ast::statement::Statement;

/// Merged result of the data query and the optional total-count query.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecResult {
    /// Rows in the order the execution callback returned them.
    pub data: Vec<JsonValue>,
    /// Total filtered-row count, when requested.
    pub total_count: Option<i64>,
}

/// Run the derived statements through the caller's execution callback.
///
/// The total statement depends on nothing computed from the data statement;
/// it is issued sequentially after it here, but that ordering is not a
/// correctness requirement.
pub async fn execute<F, Fut>(statements: Statements, handler: F) -> Result<ExecResult>
where
    F: Fn(Statement) -> Fut,
    Fut: Future<Output = Result<Vec<JsonValue>>>,
{
    let data = handler(statements.data).await?;
    debug!(rows = data.len(), "data statement executed");

    let mut total_count = None;
    if let Some(total) = statements.total {
        let rows = handler(total).await?;
        let count = rows
            .first()
            .and_then(|row| row.get(TOTAL_COUNT_COLUMN))
            .and_then(JsonValue::as_i64)
            .with_context(|| {
                format!("total statement returned no usable '{TOTAL_COUNT_COLUMN}' column")
            })?;
        debug!(count, "total statement executed");
        total_count = Some(count);
    }

    Ok(ExecResult { data, total_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::pipeline::LoadOptionsParser;
    use crate::dialect::Postgres;
    use crate::load_options::LoadOptions;
    use serde_json::json;

    fn statements(options_json: &str) -> Statements {
        let options: LoadOptions = serde_json::from_str(options_json).unwrap();
        LoadOptionsParser::new(&Postgres).parse(&options).unwrap()
    }

    #[tokio::test]
    async fn test_execute_data_only() {
        let result = execute(statements("{}"), |_statement| async {
            Ok(vec![json!({"id": 1}), json!({"id": 2})])
        })
        .await
        .unwrap();

        assert_eq!(result.data.len(), 2);
        assert_eq!(result.total_count, None);
    }

    #[tokio::test]
    async fn test_execute_with_total_count() {
        let handler = |statement: Statement| async move {
            let is_total = statement
                .select
                .iter()
                .any(|column| column.alias == TOTAL_COUNT_COLUMN);
            if is_total {
                Ok(vec![json!({"total_count": 42})])
            } else {
                Ok(vec![json!({"id": 1})])
            }
        };

        let result = execute(statements(r#"{"requireTotalCount": true}"#), handler)
            .await
            .unwrap();

        assert_eq!(result.data, vec![json!({"id": 1})]);
        assert_eq!(result.total_count, Some(42));
    }

    #[tokio::test]
    async fn test_handler_errors_propagate_unchanged() {
        let err = execute(statements("{}"), |_statement| async {
            Err(anyhow::anyhow!("connection reset"))
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_missing_total_column_is_an_error() {
        let err = execute(statements(r#"{"requireTotalCount": true}"#), |_statement| {
            async { Ok(vec![json!({"wrong": 1})]) }
        })
        .await
        .unwrap_err();

        assert!(err.to_string().contains("total_count"));
    }
}
