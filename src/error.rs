//! Failure taxonomy for the load-options compiler.
//!
//! All compiler failures are local and fast: they signal contract violations
//! in the caller's input or in the compiler itself, never transient
//! conditions to retry. Errors raised by the caller's execution callback are
//! opaque `anyhow::Error` values and propagate through the executor
//! unchanged.

use thiserror::Error;

/// Errors raised while normalizing a filter or compiling a statement.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A predicate, sort, or group operator outside the supported set.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// A filter value whose shape the nested-array grammar does not admit.
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    /// A parameter node was rendered before its statement assigned
    /// placeholder numbering. Compiler-invariant violation.
    #[error("parameter at position {0} rendered without an assigned index")]
    UnassignedParameter(usize),

    /// The inline-literal renderer was given a value outside
    /// {string, number, date, nested array}.
    #[error("cannot render {0} value as an inline SQL literal")]
    UnsupportedLiteral(&'static str),
}
