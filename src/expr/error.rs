//! Errors for expression construction and validation.

use super::types::{Arity, Operator};
use thiserror::Error;

/// A violated expression-tree invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// A node's child count is outside its operator's arity.
    #[error("{operator} expects {expected} children, got {actual}")]
    ArityViolation {
        /// Operator of the offending node.
        operator: Operator,
        /// Arity the operator admits (variadic cap applied when validating).
        expected: Arity,
        /// Number of children found.
        actual: usize,
    },

    /// A leaf references an input slot that does not exist.
    #[error("input index {index} out of range for {input_arity} inputs")]
    InputOutOfRange {
        /// The leaf's input index.
        index: usize,
        /// Length of the input vector.
        input_arity: usize,
    },

    /// `VALUE` was used where a gate operator is required.
    #[error("VALUE is a leaf and cannot take children")]
    NotAGate,
}
