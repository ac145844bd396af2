//! Statement: the copy-on-write query builder and SQL compiler.
//!
//! A `Statement` accumulates a select list, filter expression, grouping,
//! ordering, pagination, and an arena of bound parameters. It is built by
//! pure copy-then-mutate transitions from an empty base and compiled exactly
//! once against a caller-supplied source query, which is treated as an opaque
//! subquery block — never parsed, only wrapped in a CTE under the alias
//! `src`.

use tracing::debug;

use crate::ast::expr::{ColumnDefinition, ExprNode, OrderByItem, ParamSlot, RenderContext};
use crate::dialect::Dialect;
use crate::error::CompileError;
use crate::value::Value;

/// One arena parameter: a value plus its rendering mode.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParam {
    pub value: Value,
    /// Render as literal text and keep out of the positional bind list.
    /// Set for membership values on dialects without array binds.
    pub inline: bool,
}

/// Parameterized SQL text: the shape of both the caller's source query and
/// the compiler's output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlQuery {
    pub text: String,
    /// Flat ordered bind values, aligned to ascending placeholder index.
    pub values: Vec<Value>,
}

impl SqlQuery {
    pub fn new(text: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            text: text.into(),
            values,
        }
    }
}

/// Alias under which the source query is embedded.
const SOURCE_ALIAS: &str = "src";

#[derive(Debug, Clone, Default)]
pub struct Statement {
    pub select: Vec<ColumnDefinition>,
    pub filter: Option<ExprNode>,
    pub group_by: Vec<ExprNode>,
    pub order_by: Vec<OrderByItem>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    params: Vec<QueryParam>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter to the arena, returning its position for use in an
    /// `ExprNode::Param`.
    pub fn push_param(&mut self, value: Value, inline: bool) -> usize {
        let pos = self.params.len();
        self.params.push(QueryParam { value, inline });
        pos
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// Compile this statement against a source query.
    ///
    /// Parameter numbering starts at the count of the source query's own
    /// bound values; each arena parameter gets a sequential 1-based
    /// placeholder in declaration order, except inline-literal parameters,
    /// which render as text, append no value, and consume no index.
    pub fn build_query(
        &self,
        source: &SqlQuery,
        dialect: &dyn Dialect,
    ) -> Result<SqlQuery, CompileError> {
        let mut values = source.values.clone();
        let mut slots = Vec::with_capacity(self.params.len());
        let mut index = values.len();
        for param in &self.params {
            if param.inline {
                slots.push(ParamSlot::Inline(dialect.inline_literal(&param.value)?));
            } else {
                index += 1;
                slots.push(ParamSlot::Placeholder(dialect.placeholder(index)));
                values.push(param.value.clone());
            }
        }
        let ctx = RenderContext { slots: &slots };

        let mut parts = vec![format!("with {SOURCE_ALIAS} as (\n{}\n)", source.text)];

        let select_list = if self.select.is_empty() {
            " * ".to_string()
        } else {
            let columns: Vec<String> = self
                .select
                .iter()
                .map(|column| column.to_sql(&ctx))
                .collect::<Result<_, _>>()?;
            columns.join(",\n")
        };
        parts.push(format!("select {select_list}"));
        parts.push(format!("from {SOURCE_ALIAS}"));

        if let Some(filter) = &self.filter {
            parts.push(format!("where {}", filter.to_sql(&ctx)?));
        }

        if !self.group_by.is_empty() {
            let groups: Vec<String> = self
                .group_by
                .iter()
                .map(|expr| expr.to_sql(&ctx))
                .collect::<Result<_, _>>()?;
            parts.push(format!("group by {}", groups.join(", ")));
        }

        if !self.order_by.is_empty() {
            let orders: Vec<String> = self
                .order_by
                .iter()
                .map(|item| item.to_sql(&ctx))
                .collect::<Result<_, _>>()?;
            parts.push(format!("order by {}", orders.join(", ")));
        }

        let mut text = parts.join("\n");

        if self.offset.is_some() || self.limit.is_some() {
            match dialect.wrap_pagination(&text, self.offset, self.limit, index + 1) {
                Some(wrapped) => {
                    text = wrapped.text;
                    values.extend(wrapped.values);
                }
                None => {
                    for clause in dialect.limit_offset(self.offset, self.limit) {
                        text.push('\n');
                        text.push_str(&clause);
                    }
                }
            }
        }

        debug!(
            dialect = dialect.name(),
            binds = values.len(),
            "compiled statement"
        );

        Ok(SqlQuery { text, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Oracle11g, Postgres};

    /// Collapse all whitespace runs to single spaces for shape comparisons.
    fn squash(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_statement_wraps_source() {
        let statement = Statement::new();
        let query = statement
            .build_query(&SqlQuery::new("SELECT 1", vec![]), &Postgres)
            .unwrap();
        assert_eq!(
            squash(&query.text),
            "with src as ( SELECT 1 ) select * from src"
        );
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_param_numbering_continues_from_source() {
        let mut statement = Statement::new();
        let first = statement.push_param(Value::Int(21), false);
        let second = statement.push_param(Value::Str("an".into()), false);
        statement.filter = Some(ExprNode::Composite(vec![
            ExprNode::column("age"),
            ExprNode::text(">"),
            ExprNode::Param(first),
            ExprNode::text("and"),
            ExprNode::column("name"),
            ExprNode::text("="),
            ExprNode::Param(second),
        ]));

        let source = SqlQuery::new("select * from people where org = $1", vec![Value::Int(9)]);
        let query = statement.build_query(&source, &Postgres).unwrap();

        assert!(query.text.contains("age > $2"));
        assert!(query.text.contains("name = $3"));
        assert_eq!(
            query.values,
            vec![Value::Int(9), Value::Int(21), Value::Str("an".into())]
        );
    }

    #[test]
    fn test_inline_params_keep_indices_contiguous() {
        let mut statement = Statement::new();
        let bound = statement.push_param(Value::Int(1), false);
        let inline = statement.push_param(
            Value::List(vec![Value::Str("a".into()), Value::Str("b".into())]),
            true,
        );
        let trailing = statement.push_param(Value::Int(2), false);
        statement.filter = Some(ExprNode::Composite(vec![
            ExprNode::Param(bound),
            ExprNode::Param(inline),
            ExprNode::Param(trailing),
        ]));

        let query = statement
            .build_query(&SqlQuery::new("select * from t", vec![]), &Oracle11g)
            .unwrap();

        assert!(query.text.contains(":1"));
        assert!(query.text.contains("('a', 'b')"));
        assert!(query.text.contains(":2"));
        assert_eq!(query.values, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_foreign_param_node_is_fatal() {
        let mut statement = Statement::new();
        // Position 5 was never pushed into this statement's arena.
        statement.filter = Some(ExprNode::Param(5));
        let err = statement
            .build_query(&SqlQuery::new("select 1", vec![]), &Postgres)
            .unwrap_err();
        assert!(matches!(err, CompileError::UnassignedParameter(5)));
    }

    #[test]
    fn test_postgres_pagination_is_trailing_clauses() {
        let mut statement = Statement::new();
        statement.offset = Some(10);
        statement.limit = Some(5);
        let query = statement
            .build_query(&SqlQuery::new("select * from t", vec![]), &Postgres)
            .unwrap();
        assert!(query.text.ends_with("offset 10\nlimit 5"));
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_oracle_pagination_replaces_whole_text() {
        let mut statement = Statement::new();
        statement.offset = Some(10);
        statement.limit = Some(5);
        let query = statement
            .build_query(&SqlQuery::new("select * from t", vec![]), &Oracle11g)
            .unwrap();
        assert!(query.text.starts_with("SELECT * FROM ("));
        assert!(query.text.contains("ROWNUM <= :1"));
        assert!(query.text.contains("rnum > :2"));
        assert_eq!(query.values, vec![Value::Int(15), Value::Int(10)]);
    }

    #[test]
    fn test_clone_shares_no_collections() {
        let mut original = Statement::new();
        original.group_by.push(ExprNode::column("city"));

        let mut copy = original.clone();
        copy.group_by.push(ExprNode::column("country"));
        copy.push_param(Value::Int(1), false);
        copy.order_by
            .push(OrderByItem::new(ExprNode::column("city"), true));

        assert_eq!(original.group_by.len(), 1);
        assert_eq!(copy.group_by.len(), 2);
        assert!(original.params().is_empty());
        assert!(original.order_by.is_empty());
    }

    #[test]
    fn test_select_list_and_group_by_render() {
        let mut statement = Statement::new();
        statement
            .select
            .push(ColumnDefinition::new(ExprNode::column("city"), "key"));
        statement.group_by.push(ExprNode::column("city"));
        statement
            .order_by
            .push(OrderByItem::new(ExprNode::column("city"), false));

        let query = statement
            .build_query(&SqlQuery::new("select * from people", vec![]), &Postgres)
            .unwrap();
        assert_eq!(
            squash(&query.text),
            "with src as ( select * from people ) select city as key from src group by city order by city"
        );
    }
}
