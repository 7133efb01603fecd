//! Generational Genetic Algorithm engine.
//!
//! A generic, problem-agnostic engine built on a single trait. Users
//! describe their problem by implementing [`Strategy`], which specifies how
//! to create, score, recombine and mutate genomes, and when to stop.
//!
//! # Core Types
//!
//! - [`Strategy`]: Problem definition, generic over its genome type
//! - [`Organism`]: A genome paired with its fitness (higher is better)
//! - [`GaConfig`]: Population size, survival rate, mutation rate, limits
//! - [`GaRunner`]: Executes the generational loop
//! - [`GaResult`]: Best organism, generation count and history
//!
//! # Generation Loop
//!
//! Each generation evaluates the population in parallel, hands its best
//! organism to [`Strategy::has_finished`], then keeps the top
//! `floor(survival_rate * population_size)` organisms unchanged and fills
//! the rest with offspring bred from fitness-proportionate parents.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod error;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use error::{GaError, Result};
pub use runner::{GaResult, GaRunner, Termination};
pub use selection::{FitnessTable, Selection};
pub use types::{GenerationStats, Organism, Strategy};
