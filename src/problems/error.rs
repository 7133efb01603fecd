//! Errors raised while building problem strategies.

use crate::expr::ExprError;
use thiserror::Error;

/// A problem definition that cannot be evolved against.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// The table has no rows.
    #[error("truth table has no rows")]
    EmptyTable,

    /// Rows have no inputs, or differing numbers of inputs.
    #[error("row {row} has {found} inputs, expected {expected}")]
    RaggedInputs {
        /// Index of the offending row.
        row: usize,
        /// Input count of the first row.
        expected: usize,
        /// Input count of the offending row.
        found: usize,
    },

    /// Input rows and expected outputs differ in length.
    #[error("{inputs} input rows but {outputs} expected outputs")]
    LengthMismatch {
        /// Number of input rows.
        inputs: usize,
        /// Number of expected outputs.
        outputs: usize,
    },

    /// A tuning parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A genome failed validation against the problem.
    #[error(transparent)]
    Expr(#[from] ExprError),
}
