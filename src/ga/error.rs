//! Errors surfaced by the GA engine.

use thiserror::Error;

/// Failure modes of [`GaRunner`](super::GaRunner).
#[derive(Error, Debug)]
pub enum GaError {
    /// A [`GaConfig`](super::GaConfig) parameter is out of range.
    #[error("invalid GA configuration: {0}")]
    InvalidConfig(String),

    /// [`Strategy::validate`](super::Strategy::validate) rejected the
    /// strategy's own parameters.
    #[error("invalid strategy: {0}")]
    InvalidStrategy(String),

    /// The worker pool for `num_threads` could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The strategy returned NaN or an infinite fitness.
    #[error("strategy returned non-finite fitness {fitness} in generation {generation}")]
    NonFiniteFitness {
        /// Generation being built when the value appeared (0 = initial population).
        generation: usize,
        /// The offending value.
        fitness: f64,
    },
}

/// Result alias for GA operations.
pub type Result<T> = std::result::Result<T, GaError>;
