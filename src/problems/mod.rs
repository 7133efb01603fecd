//! Ready-made [`Strategy`](crate::ga::Strategy) implementations.
//!
//! - [`TruthTable`]: evolve an [`Expression`](crate::expr::Expression)
//!   matching a boolean table, with an optional size penalty
//!   ([`ComplexityPolicy`])
//! - [`TextMatch`]: evolve a byte string toward a target text
//! - [`bits`]: helpers turning integers and bytes into input rows

pub mod bits;
mod error;
mod text;
mod truth_table;

pub use error::ProblemError;
pub use text::TextMatch;
pub use truth_table::{ComplexityPolicy, TruthTable};
