//! Boolean expression-tree genome for genetic programming.
//!
//! An [`Expression`] is a tree of logic gates over the slots of a boolean
//! input vector. It knows nothing about the GA engine; the operators in
//! this module are plain functions that a [`Strategy`](crate::ga::Strategy)
//! wires into a run.
//!
//! # Key Types
//!
//! - [`Operator`]: `VALUE` leaf plus `NOT`, `AND`, `OR`, `NAND`, `NOR`,
//!   `XOR`, `NXOR` gates
//! - [`Arity`]: child-count bounds per operator
//! - [`Expression`]: the tree, with evaluation, complexity and rendering
//!
//! # Operators
//!
//! - [`create`]: random tree bounded by a maximum depth
//! - [`merge`]: fitness-biased crossover
//! - [`mutate`]: random structural change
//! - [`optimize`]: truth-table-preserving simplification

mod error;
mod operators;
mod optimize;
mod types;

pub use error::ExprError;
pub use operators::{create, merge, mutate};
pub use optimize::optimize;
pub use types::{Arity, Expression, Operator};
