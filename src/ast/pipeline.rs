//! Load-options parse pipeline.
//!
//! A linear state machine over statements:
//!
//! ```text
//! Empty → Filtered → Grouped → Sorted → Limited   (the "data" statement)
//!             └────→ Totaled                      (the "count" statement)
//! ```
//!
//! Each transition clones its input and mutates the clone; no transition
//! inspects a later one. The total statement branches off the filtered
//! statement, so grouping, ordering, and pagination never leak into the
//! count query.

use crate::ast::expr::{ColumnDefinition, ExprNode, OrderByItem};
use crate::ast::predicate::{normalize, CompareOp, Predicate};
use crate::ast::statement::Statement;
use crate::dialect::Dialect;
use crate::error::CompileError;
use crate::load_options::LoadOptions;
use crate::value::Value;

/// Output column carrying the total row count.
pub const TOTAL_COUNT_COLUMN: &str = "total_count";

/// Output column carrying a grouping key.
pub const GROUP_KEY_COLUMN: &str = "key";

/// The statements derived from one `LoadOptions`.
#[derive(Debug, Clone)]
pub struct Statements {
    pub data: Statement,
    /// Present only when a total row count was requested.
    pub total: Option<Statement>,
}

/// Turns a `LoadOptions` into executable statements for one dialect.
pub struct LoadOptionsParser<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> LoadOptionsParser<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn parse(&self, options: &LoadOptions) -> Result<Statements, CompileError> {
        let initial = Statement::new();
        let filtered = self.filtered_statement(&initial, options)?;
        let grouped = self.grouped_statement(&filtered, options);
        let sorted = self.sorted_statement(&grouped, options);
        let limited = self.limited_statement(&sorted, options);
        let total = self.total_statement(&filtered, options);
        Ok(Statements {
            data: limited,
            total,
        })
    }

    fn filtered_statement(
        &self,
        base: &Statement,
        options: &LoadOptions,
    ) -> Result<Statement, CompileError> {
        let mut result = base.clone();
        if let Some(filter) = &options.filter {
            let predicate = normalize(filter)?;
            let tokens = self.convert_predicate(&predicate, &mut result)?;
            result.filter = Some(ExprNode::Composite(tokens));
        }
        Ok(result)
    }

    fn grouped_statement(&self, base: &Statement, options: &LoadOptions) -> Statement {
        let mut result = base.clone();
        if let Some(group) = &options.group {
            for entry in group.as_slice() {
                let column = ExprNode::column(entry.selector());
                result.group_by.push(column.clone());
                result
                    .select
                    .push(ColumnDefinition::new(column, GROUP_KEY_COLUMN));
            }
        }
        result
    }

    fn sorted_statement(&self, base: &Statement, options: &LoadOptions) -> Statement {
        let mut result = base.clone();
        if let Some(sort) = &options.sort {
            for entry in sort.as_slice() {
                result.order_by.push(OrderByItem::new(
                    ExprNode::column(entry.selector()),
                    entry.is_desc(),
                ));
            }
        }
        result
    }

    fn limited_statement(&self, base: &Statement, options: &LoadOptions) -> Statement {
        let mut result = base.clone();
        result.offset = options.skip;
        result.limit = options.take;
        result
    }

    fn total_statement(&self, base: &Statement, options: &LoadOptions) -> Option<Statement> {
        if !options.require_total_count {
            return None;
        }
        let mut result = base.clone();
        result.select = vec![ColumnDefinition::new(
            ExprNode::Composite(self.dialect.count()),
            TOTAL_COUNT_COLUMN,
        )];
        Some(result)
    }

    /// Lower a normalized predicate into dialect tokens, registering bound
    /// parameters in the statement's arena as leaves are reached.
    fn convert_predicate(
        &self,
        predicate: &Predicate,
        statement: &mut Statement,
    ) -> Result<Vec<ExprNode>, CompileError> {
        match predicate {
            Predicate::And(children) => {
                let items = self.convert_children(children, statement)?;
                Ok(self.dialect.and(items))
            }
            Predicate::Or(children) => {
                let items = self.convert_children(children, statement)?;
                Ok(self.dialect.or(items))
            }
            Predicate::Not(inner) => {
                let item = ExprNode::Composite(self.convert_predicate(inner, statement)?);
                Ok(self.dialect.not(item))
            }
            Predicate::Compare { column, op, value } => {
                let pos = statement.push_param(value.clone(), false);
                let lhs = ExprNode::column(column.clone());
                let rhs = ExprNode::Param(pos);
                let dialect = self.dialect;
                Ok(match op {
                    CompareOp::Equal => dialect.equal(lhs, rhs),
                    CompareOp::NotEqual => dialect.not_equal(lhs, rhs),
                    CompareOp::GreaterThan => dialect.greater_than(lhs, rhs),
                    CompareOp::GreaterThanOrEqual => dialect.greater_than_or_equal(lhs, rhs),
                    CompareOp::LessThan => dialect.less_than(lhs, rhs),
                    CompareOp::LessThanOrEqual => dialect.less_than_or_equal(lhs, rhs),
                    CompareOp::StartsWith => dialect.starts_with(lhs, rhs),
                    CompareOp::EndsWith => dialect.ends_with(lhs, rhs),
                    CompareOp::Contains => dialect.contains(lhs, rhs),
                    CompareOp::NotContains => dialect.not_contains(lhs, rhs),
                })
            }
            Predicate::In { column, values } => {
                // Dialects without array binds get the value list inlined as
                // a literal tuple, outside the positional bind list.
                let inline = !self.dialect.binds_array_params();
                let pos = statement.push_param(Value::List(values.clone()), inline);
                Ok(self
                    .dialect
                    .in_list(ExprNode::column(column.clone()), ExprNode::Param(pos)))
            }
        }
    }

    fn convert_children(
        &self,
        children: &[Predicate],
        statement: &mut Statement,
    ) -> Result<Vec<ExprNode>, CompileError> {
        children
            .iter()
            .map(|child| {
                self.convert_predicate(child, statement)
                    .map(ExprNode::Composite)
            })
            .collect()
    }
}
