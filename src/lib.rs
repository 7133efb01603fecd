//! Generational genetic algorithm engine with a boolean expression-tree
//! genome.
//!
//! - **Genetic Algorithm (GA)**: Generic evolution engine with parallel
//!   evaluation, fitness-proportionate selection, elitism and a pluggable
//!   [`Strategy`](ga::Strategy) for creation, scoring, crossover, mutation
//!   and termination.
//! - **Expression genome**: Variable-arity boolean logic trees with
//!   random creation, fitness-biased crossover, mutation and
//!   simplification, for evolving logic from truth tables.
//! - **Problems**: Strategies binding concrete tasks (truth tables, text
//!   matching) to the engine.
//!
//! # Example
//!
//! ```
//! use u_genprog::ga::{GaConfig, GaRunner};
//! use u_genprog::problems::TruthTable;
//!
//! let table = TruthTable::from_fn(2, |row| row[0] ^ row[1])
//!     .unwrap()
//!     .with_max_depth(4);
//! let config = GaConfig::default()
//!     .with_population_size(200)
//!     .with_survival_rate(0.05)
//!     .with_max_generations(5_000)
//!     .with_seed(11);
//!
//! let result = GaRunner::run(&table, &config).unwrap();
//! assert!(table.is_solved_by(&result.best.genome));
//! ```

pub mod expr;
pub mod ga;
pub mod problems;
