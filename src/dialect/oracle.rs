//! Oracle 11g dialect provider.
//!
//! Oracle 11g lacks three things the Postgres provider leans on: a native
//! case-insensitive match operator, array-valued bind parameters, and a
//! LIMIT/OFFSET clause form. Matching case-folds both operands with
//! `UPPER(..)`, membership inlines the value list as a literal tuple (the
//! parameter is excluded from the positional bind list), and pagination
//! wraps the whole composed query in nested ROWNUM subqueries.

use super::{Dialect, WrappedQuery};
use crate::ast::expr::ExprNode;
use crate::value::Value;

/// Upper bound used when an offset is requested without a limit. ROWNUM
/// filtering needs some ceiling; this one is practically unbounded.
const MAX_ROWS: u64 = 999_999_999;

pub struct Oracle11g;

impl Dialect for Oracle11g {
    fn name(&self) -> &str {
        "oracle11g"
    }

    fn contains(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![
            ExprNode::text("UPPER("),
            column,
            ExprNode::text(") LIKE UPPER('%' ||"),
            needle,
            ExprNode::text("|| '%')"),
        ]
    }

    fn not_contains(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![
            ExprNode::text("UPPER("),
            column,
            ExprNode::text(") NOT LIKE UPPER('%' ||"),
            needle,
            ExprNode::text("|| '%')"),
        ]
    }

    fn starts_with(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![
            ExprNode::text("UPPER("),
            column,
            ExprNode::text(") LIKE UPPER("),
            needle,
            ExprNode::text("|| '%')"),
        ]
    }

    fn ends_with(&self, column: ExprNode, needle: ExprNode) -> Vec<ExprNode> {
        vec![
            ExprNode::text("UPPER("),
            column,
            ExprNode::text(") LIKE UPPER('%' ||"),
            needle,
            ExprNode::text(")"),
        ]
    }

    fn in_list(&self, column: ExprNode, values: ExprNode) -> Vec<ExprNode> {
        vec![column, ExprNode::text("IN"), values]
    }

    fn binds_array_params(&self) -> bool {
        false
    }

    fn count(&self) -> Vec<ExprNode> {
        vec![ExprNode::text("CAST(count(*) AS NUMBER)")]
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{index}")
    }

    fn limit_offset(&self, _offset: Option<u64>, _limit: Option<u64>) -> Vec<String> {
        // No clause form; wrap_pagination handles it.
        Vec::new()
    }

    fn wrap_pagination(
        &self,
        sql: &str,
        offset: Option<u64>,
        limit: Option<u64>,
        next_index: usize,
    ) -> Option<WrappedQuery> {
        match (offset, limit) {
            (None, None) => None,
            // Limit only: a single wrap bounding ROWNUM from above.
            (None, Some(limit)) => {
                let max_row = self.placeholder(next_index);
                Some(WrappedQuery {
                    text: format!(
                        "SELECT * FROM (\n  SELECT inner.*, ROWNUM rnum FROM (\n{sql}\n  ) inner WHERE ROWNUM <= {max_row}\n)"
                    ),
                    values: vec![Value::Int(limit as i64)],
                })
            }
            // Offset present: the outer wrapper filters rows below the
            // lower bound; the upper bound is offset+limit, or the
            // practically-unbounded maximum when no limit was given.
            (Some(offset), limit) => {
                let upper = limit.map_or(MAX_ROWS, |limit| offset + limit);
                let max_row = self.placeholder(next_index);
                let min_row = self.placeholder(next_index + 1);
                Some(WrappedQuery {
                    text: format!(
                        "SELECT * FROM (\n  SELECT inner.*, ROWNUM rnum FROM (\n{sql}\n  ) inner WHERE ROWNUM <= {max_row}\n) WHERE rnum > {min_row}"
                    ),
                    values: vec![Value::Int(upper as i64), Value::Int(offset as i64)],
                })
            }
        }
    }
}
