//! SQL dialect providers.
//!
//! A `Dialect` encapsulates one backend's syntax differences: operator
//! spelling, bind-placeholder markers, the row-count aggregate, and how (or
//! whether) pagination can be expressed as trailing clauses. Providers are
//! stateless: every method is a pure function of already-rendered operand
//! nodes, returning the ordered token sequence the caller wraps into a
//! composite expression. Dispatch is always through `&dyn Dialect` — the
//! compiler never knows which backend it is targeting.

pub mod oracle;
pub mod postgres;

pub use oracle::Oracle11g;
pub use postgres::Postgres;

use crate::ast::expr::ExprNode;
use crate::error::CompileError;
use crate::value::Value;

/// A whole-query pagination rewrite produced by a dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedQuery {
    /// Replacement for the entire statement text.
    pub text: String,
    /// Bound values for the placeholders the wrap introduced, in index order.
    pub values: Vec<Value>,
}

/// Strategy object for one backend's SQL syntax.
///
/// Boolean combinators and plain comparisons are spelled identically across
/// the supported backends, so they are default methods; everything a backend
/// actually disagrees on is required.
pub trait Dialect: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    fn and(&self, items: Vec<ExprNode>) -> Vec<ExprNode> {
        infix(items, "and")
    }

    fn or(&self, items: Vec<ExprNode>) -> Vec<ExprNode> {
        infix(items, "or")
    }

    fn not(&self, item: ExprNode) -> Vec<ExprNode> {
        vec![ExprNode::text("not"), item]
    }

    fn equal(&self, lhs: ExprNode, rhs: ExprNode) -> Vec<ExprNode> {
        vec![lhs, ExprNode::text("="), rhs]
    }

    fn not_equal(&self, lhs: ExprNode, rhs: ExprNode) -> Vec<ExprNode> {
        vec![lhs, ExprNode::text("<>"), rhs]
    }

    fn greater_than(&self, lhs: ExprNode, rhs: ExprNode) -> Vec<ExprNode> {
        vec![lhs, ExprNode::text(">"), rhs]
    }

    fn greater_than_or_equal(&self, lhs: ExprNode, rhs: ExprNode) -> Vec<ExprNode> {
        vec![lhs, ExprNode::text(">="), rhs]
    }

    fn less_than(&self, lhs: ExprNode, rhs: ExprNode) -> Vec<ExprNode> {
        vec![lhs, ExprNode::text("<"), rhs]
    }

    fn less_than_or_equal(&self, lhs: ExprNode, rhs: ExprNode) -> Vec<ExprNode> {
        vec![lhs, ExprNode::text("<="), rhs]
    }

    /// Case-insensitive substring match.
    fn contains(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode>;

    /// Negated case-insensitive substring match.
    fn not_contains(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode>;

    /// Case-insensitive prefix match.
    fn starts_with(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode>;

    /// Case-insensitive suffix match.
    fn ends_with(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode>;

    /// Set membership against an array-valued operand.
    fn in_list(&self, column: ExprNode, values: ExprNode) -> Vec<ExprNode>;

    /// Whether an array value can travel as a single bind parameter. When
    /// false, membership parameters are inlined as literal tuples and
    /// excluded from the positional bind list.
    fn binds_array_params(&self) -> bool;

    /// Row-count aggregate over the filtered set.
    fn count(&self) -> Vec<ExprNode>;

    /// Bind-placeholder marker for a 1-based index.
    fn placeholder(&self, index: usize) -> String;

    /// Render a value as literal SQL text, for parameters excluded from the
    /// bind list. Strings get doubled internal quotes, numbers render bare,
    /// dates render as typed literals, arrays recurse into tuples.
    fn inline_literal(&self, value: &Value) -> Result<String, CompileError> {
        sql_literal(value)
    }

    /// Trailing pagination clause tokens, appended after the composed query.
    /// Dialects without a clause form return nothing and rely on
    /// [`Dialect::wrap_pagination`].
    fn limit_offset(&self, offset: Option<u64>, limit: Option<u64>) -> Vec<String>;

    /// Rewrite the entire composed query to emulate pagination, introducing
    /// placeholders numbered from `next_index` upward. Returns `None` when
    /// the dialect paginates with trailing clauses instead.
    fn wrap_pagination(
        &self,
        sql: &str,
        offset: Option<u64>,
        limit: Option<u64>,
        next_index: usize,
    ) -> Option<WrappedQuery>;
}

/// Interleave a connective between operand nodes.
fn infix(items: Vec<ExprNode>, connective: &str) -> Vec<ExprNode> {
    let mut tokens = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            tokens.push(ExprNode::text(connective));
        }
        tokens.push(item);
    }
    tokens
}

/// Shared inline-literal renderer.
///
/// Accepts exactly {string, number, date, nested array}; anything else is a
/// caller contract violation.
pub(crate) fn sql_literal(value: &Value) -> Result<String, CompileError> {
    match value {
        Value::Str(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(n) => Ok(n.to_string()),
        Value::Date(d) => Ok(format!("DATE '{}'", d.format("%Y-%m-%d"))),
        Value::Timestamp(ts) => Ok(format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S"))),
        Value::List(items) => {
            let rendered: Vec<String> = items.iter().map(sql_literal).collect::<Result<_, _>>()?;
            Ok(format!("({})", rendered.join(", ")))
        }
        Value::Bool(_) => Err(CompileError::UnsupportedLiteral("boolean")),
        Value::Null => Err(CompileError::UnsupportedLiteral("null")),
    }
}
