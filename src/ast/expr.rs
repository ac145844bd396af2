//! Expression AST rendered into SQL fragments.
//!
//! Nodes are deliberately small: literal text fragments, column references,
//! positional parameters, and composites. Dialect providers return ordered
//! token sequences of these, and the statement compiler renders them once
//! placeholder numbering is fixed. A `Param` node holds only a position into
//! its owning statement's parameter arena — placeholder indices are assigned
//! at render time, never by mutating node identity.

use crate::error::CompileError;

/// A node in the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// Raw SQL text emitted verbatim.
    Text(String),
    /// Reference to a column of the wrapped source query.
    Column(String),
    /// Bound parameter, addressed by position in the owning statement's
    /// arena. Rendering resolves the position to a placeholder or an inlined
    /// literal; an unresolved position is a fatal error.
    Param(usize),
    /// Parenthesized sequence of child nodes joined by single spaces.
    Composite(Vec<ExprNode>),
}

impl ExprNode {
    pub fn text(t: impl Into<String>) -> Self {
        ExprNode::Text(t.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        ExprNode::Column(name.into())
    }

    pub(crate) fn to_sql(&self, ctx: &RenderContext<'_>) -> Result<String, CompileError> {
        match self {
            ExprNode::Text(t) => Ok(t.clone()),
            ExprNode::Column(name) => Ok(name.clone()),
            ExprNode::Param(pos) => match ctx.slots.get(*pos) {
                Some(ParamSlot::Placeholder(p)) => Ok(p.clone()),
                Some(ParamSlot::Inline(text)) => Ok(text.clone()),
                None => Err(CompileError::UnassignedParameter(*pos)),
            },
            ExprNode::Composite(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| item.to_sql(ctx))
                    .collect::<Result<_, _>>()?;
                Ok(format!("({})", rendered.join(" ")))
            }
        }
    }
}

/// A select-list entry: `expr as alias`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub expr: ExprNode,
    pub alias: String,
}

impl ColumnDefinition {
    pub fn new(expr: ExprNode, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }

    pub(crate) fn to_sql(&self, ctx: &RenderContext<'_>) -> Result<String, CompileError> {
        Ok(format!("{} as {}", self.expr.to_sql(ctx)?, self.alias))
    }
}

/// An order-by entry: `expr [desc]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expr: ExprNode,
    pub desc: bool,
}

impl OrderByItem {
    pub fn new(expr: ExprNode, desc: bool) -> Self {
        Self { expr, desc }
    }

    pub(crate) fn to_sql(&self, ctx: &RenderContext<'_>) -> Result<String, CompileError> {
        let mut sql = self.expr.to_sql(ctx)?;
        if self.desc {
            sql.push_str(" desc");
        }
        Ok(sql)
    }
}

/// Resolved form of one arena parameter, produced during placeholder
/// assignment.
#[derive(Debug, Clone)]
pub(crate) enum ParamSlot {
    /// Renders as the dialect's bind placeholder for the assigned index.
    Placeholder(String),
    /// Renders as pre-rendered literal text; excluded from the bind list.
    Inline(String),
}

/// Lookup table from parameter position to resolved slot, valid for one
/// `build_query` call.
pub(crate) struct RenderContext<'a> {
    pub(crate) slots: &'a [ParamSlot],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(slots: &[ParamSlot]) -> RenderContext<'_> {
        RenderContext { slots }
    }

    #[test]
    fn test_composite_renders_parenthesized() {
        let node = ExprNode::Composite(vec![
            ExprNode::column("age"),
            ExprNode::text(">"),
            ExprNode::Param(0),
        ]);
        let slots = vec![ParamSlot::Placeholder("$1".into())];
        assert_eq!(node.to_sql(&ctx(&slots)).unwrap(), "(age > $1)");
    }

    #[test]
    fn test_param_renders_inline_slot() {
        let node = ExprNode::Param(0);
        let slots = vec![ParamSlot::Inline("('a', 'b')".into())];
        assert_eq!(node.to_sql(&ctx(&slots)).unwrap(), "('a', 'b')");
    }

    #[test]
    fn test_param_without_slot_is_fatal() {
        let node = ExprNode::Param(2);
        let err = node.to_sql(&ctx(&[])).unwrap_err();
        assert!(matches!(err, CompileError::UnassignedParameter(2)));
    }

    #[test]
    fn test_column_definition_alias() {
        let def = ColumnDefinition::new(ExprNode::column("city"), "key");
        assert_eq!(def.to_sql(&ctx(&[])).unwrap(), "city as key");
    }

    #[test]
    fn test_order_by_desc_suffix() {
        let asc = OrderByItem::new(ExprNode::column("name"), false);
        let desc = OrderByItem::new(ExprNode::column("name"), true);
        assert_eq!(asc.to_sql(&ctx(&[])).unwrap(), "name");
        assert_eq!(desc.to_sql(&ctx(&[])).unwrap(), "name desc");
    }
}
