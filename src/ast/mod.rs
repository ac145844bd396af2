/// Load-options compilation pipeline.
///
/// This module turns a declarative query specification into parameterized
/// SQL wrapping a caller-supplied base query:
///
/// ```text
/// LoadOptions (filter / sort / group / paging)
///       ↓
/// Predicate Normalizer     (predicate.rs)
///       ↓
/// Statement Pipeline       (pipeline.rs)
///       ↓
/// Expression AST           (expr.rs)
///       ↓
/// Statement Compiler       (statement.rs)  →  SQL text + bind values
/// ```
///
/// Backend syntax differences are isolated behind the dialect providers
/// (dialect module).
pub mod expr;
pub mod pipeline;
pub mod predicate;
pub mod statement;

// Re-export key types for convenience
pub use expr::{ColumnDefinition, ExprNode, OrderByItem};
pub use pipeline::{LoadOptionsParser, Statements, GROUP_KEY_COLUMN, TOTAL_COUNT_COLUMN};
pub use predicate::{normalize, CompareOp, Predicate};
pub use statement::{QueryParam, SqlQuery, Statement};
