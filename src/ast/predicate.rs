//! Predicate normalizer: nested-array filter grammar → canonical tree.
//!
//! The wire grammar is ambiguous by design: a 3-element leaf
//! `[column, operator, value]`, a unary not `["!", inner]`, or an implicit
//! group where predicates alternate with `"and"`/`"or"` connectives.
//! Normalization resolves every shape into a `Predicate` tree and rejects
//! anything else up front, so the downstream compiler never sees a malformed
//! filter. One optimization is applied here: an `or` of equality leaves on a
//! single column collapses into one `in` membership test.

use crate::error::CompileError;
use crate::value::Value;

/// Comparison operators accepted in filter leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    StartsWith,
    EndsWith,
    Contains,
    NotContains,
}

impl CompareOp {
    /// Map a wire-grammar operator token to its canonical form.
    pub fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "=" => CompareOp::Equal,
            "<>" => CompareOp::NotEqual,
            ">" => CompareOp::GreaterThan,
            ">=" => CompareOp::GreaterThanOrEqual,
            "<" => CompareOp::LessThan,
            "<=" => CompareOp::LessThanOrEqual,
            "startswith" => CompareOp::StartsWith,
            "endswith" => CompareOp::EndsWith,
            "contains" => CompareOp::Contains,
            "notcontains" => CompareOp::NotContains,
            _ => return None,
        })
    }
}

/// Canonical filter tree.
///
/// Invariants: leaves carry exactly a column name and a scalar/array value,
/// `Not` has exactly one child, `And`/`Or` have at least one.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    Not(Box<Predicate>),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

/// Normalize a raw nested-array filter into a canonical `Predicate`.
pub fn normalize(filter: &Value) -> Result<Predicate, CompileError> {
    let Value::List(items) = filter else {
        return Err(CompileError::InvalidPredicate(
            "filter must be an array".into(),
        ));
    };
    if items.is_empty() {
        return Err(CompileError::InvalidPredicate("empty filter group".into()));
    }

    // A lone nested array with no following operator wraps a predicate.
    if items.len() == 1 {
        return match &items[0] {
            inner @ Value::List(_) => normalize(inner),
            _ => Err(CompileError::InvalidPredicate(
                "single-element filter must wrap a nested predicate".into(),
            )),
        };
    }

    if items[0].as_str() == Some("!") {
        return Ok(Predicate::Not(Box::new(normalize(&items[1])?)));
    }

    let Some(op) = items[1].as_str() else {
        return Err(CompileError::InvalidPredicate(
            "operator must be a string".into(),
        ));
    };

    if let Some(cmp) = CompareOp::parse(op) {
        let (column, value) = leaf_parts(items, op)?;
        return Ok(Predicate::Compare {
            column,
            op: cmp,
            value,
        });
    }

    if op == "in" {
        let (column, value) = leaf_parts(items, op)?;
        let Value::List(values) = value else {
            return Err(CompileError::InvalidPredicate(
                "'in' requires an array of values".into(),
            ));
        };
        return Ok(Predicate::In { column, values });
    }

    if op == "and" || op == "or" {
        let operands: Vec<&Value> = items.iter().step_by(2).collect();
        if op == "or" {
            if let Some(collapsed) = collapse_or_to_in(&operands) {
                return Ok(collapsed);
            }
        }
        let children: Vec<Predicate> = operands
            .iter()
            .map(|operand| normalize(operand))
            .collect::<Result<_, _>>()?;
        return Ok(if op == "and" {
            Predicate::And(children)
        } else {
            Predicate::Or(children)
        });
    }

    Err(CompileError::UnknownOperator(op.to_string()))
}

/// Extract `(column, value)` from a 3-element leaf.
fn leaf_parts(items: &[Value], op: &str) -> Result<(String, Value), CompileError> {
    if items.len() != 3 {
        return Err(CompileError::InvalidPredicate(format!(
            "'{op}' expects [column, operator, value]"
        )));
    }
    let Some(column) = items[0].as_str() else {
        return Err(CompileError::InvalidPredicate(
            "column name must be a string".into(),
        ));
    };
    Ok((column.to_string(), items[2].clone()))
}

/// Collapse `[col,"=",v1] or [col,"=",v2] or …` into one `in` predicate.
///
/// Requires at least two operands, all of them 3-element equality leaves on
/// the same column; any non-matching operand aborts the collapse. Value types
/// are not checked across operands. The rewrite preserves result semantics —
/// it only changes the shape of the tree.
fn collapse_or_to_in(operands: &[&Value]) -> Option<Predicate> {
    if operands.len() < 2 {
        return None;
    }
    let mut column: Option<&str> = None;
    let mut values = Vec::with_capacity(operands.len());
    for operand in operands {
        let Value::List(parts) = operand else {
            return None;
        };
        if parts.len() != 3 {
            return None;
        }
        let (Some(col), Some("=")) = (parts[0].as_str(), parts[1].as_str()) else {
            return None;
        };
        match column {
            None => column = Some(col),
            Some(first) if first == col => {}
            Some(_) => return None,
        }
        values.push(parts[2].clone());
    }
    Some(Predicate::In {
        column: column?.to_string(),
        values,
    })
}
