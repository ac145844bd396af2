//! ANSI/Postgres-style dialect provider.
//!
//! The easy backend: native `ILIKE` for case-insensitive matching, array
//! binds with `= ANY(..)` for membership, positional `$N` placeholders, and
//! plain trailing `offset`/`limit` clauses.

use super::{Dialect, WrappedQuery};
use crate::ast::expr::ExprNode;

pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &str {
        "postgres"
    }

    fn contains(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![
            column,
            ExprNode::text("ILIKE '%' ||"),
            needle,
            ExprNode::text("|| '%'"),
        ]
    }

    fn not_contains(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![
            column,
            ExprNode::text("NOT ILIKE '%' ||"),
            needle,
            ExprNode::text("|| '%'"),
        ]
    }

    fn starts_with(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![
            column,
            ExprNode::text("ILIKE"),
            needle,
            ExprNode::text("|| '%'"),
        ]
    }

    fn ends_with(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![column, ExprNode::text("ILIKE '%' ||"), needle]
    }

    fn in_list(&self, column: ExprNode, values: ExprNode) -> Vec<ExprNode> {
        vec![
            column,
            ExprNode::text("= ANY("),
            values,
            ExprNode::text(")"),
        ]
    }

    fn binds_array_params(&self) -> bool {
        true
    }

    fn count(&self) -> Vec<ExprNode> {
        vec![ExprNode::text("count(*)::int")]
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn limit_offset(&self, offset: Option<u64>, limit: Option<u64>) -> Vec<String> {
        let mut clauses = Vec::new();
        if let Some(offset) = offset {
            clauses.push(format!("offset {offset}"));
        }
        if let Some(limit) = limit {
            clauses.push(format!("limit {limit}"));
        }
        clauses
    }

    fn wrap_pagination(
        &self,
        _sql: &str,
        _offset: Option<u64>,
        _limit: Option<u64>,
        _next_index: usize,
    ) -> Option<WrappedQuery> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_positional() {
        assert_eq!(Postgres.placeholder(1), "$1");
        assert_eq!(Postgres.placeholder(12), "$12");
    }

    #[test]
    fn test_limit_offset_clause_order() {
        assert_eq!(
            Postgres.limit_offset(Some(10), Some(5)),
            vec!["offset 10".to_string(), "limit 5".to_string()]
        );
        assert_eq!(Postgres.limit_offset(None, Some(5)), vec!["limit 5".to_string()]);
        assert_eq!(Postgres.limit_offset(Some(10), None), vec!["offset 10".to_string()]);
    }

    #[test]
    fn test_no_pagination_wrapping() {
        assert_eq!(
            Postgres.wrap_pagination("select 1", Some(10), Some(5), 1),
            None
        );
    }

    #[test]
    fn test_in_list_lowers_to_any() {
        let tokens = Postgres.in_list(ExprNode::column("id"), ExprNode::Param(0));
        assert_eq!(
            tokens,
            vec![
                ExprNode::column("id"),
                ExprNode::text("= ANY("),
                ExprNode::Param(0),
                ExprNode::text(")"),
            ]
        );
    }
}
