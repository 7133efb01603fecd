//! Generational evolution loop.
//!
//! [`GaRunner`] orchestrates a run:
//! initialization → evaluation → termination check → elitism →
//! selection → crossover → mutation → repeat.
//!
//! Initialization and reproduction are fanned out across rayon workers,
//! one unit of work per population slot, with a barrier between phases.
//! Every unit gets its own generator seeded from the run's master
//! generator before the fan-out, so a seeded run is reproducible no matter
//! how the units are scheduled.

use super::config::GaConfig;
use super::error::{GaError, Result};
use super::selection::FitnessTable;
use super::types::{GenerationStats, Organism, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// [`Strategy::has_finished`] accepted the best organism.
    Finished,
    /// [`GaConfig::max_generations`] was reached.
    GenerationLimit,
    /// [`GaConfig::time_limit_ms`] elapsed.
    TimeLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<G> {
    /// Best organism of the last generation evaluated.
    pub best: Organism<G>,

    /// Number of generations evaluated, including the last one.
    pub generations: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Best fitness of each generation, in order.
    pub fitness_history: Vec<f64>,
}

impl<G> GaResult<G> {
    /// Whether the strategy itself ended the run.
    pub fn is_finished(&self) -> bool {
        self.termination == Termination::Finished
    }

    /// Consumes the result, returning the best genome.
    pub fn into_genome(self) -> G {
        self.best.genome
    }
}

/// Executes the generational GA.
///
/// # Usage
///
/// ```ignore
/// let strategy = MyStrategy::new();
/// let config = GaConfig::default().with_survival_rate(0.01).with_seed(42);
/// let result = GaRunner::run(&strategy, &config)?;
/// println!("best fitness: {}", result.best.fitness);
/// ```
///
/// # Panics
///
/// A panic inside a strategy callback is not caught: it propagates out of
/// the worker pool to the caller of [`run`](Self::run).
#[derive(Debug)]
pub struct GaRunner;

impl GaRunner {
    /// Runs until the strategy reports it has finished, or a configured
    /// limit is hit.
    pub fn run<S: Strategy>(strategy: &S, config: &GaConfig) -> Result<GaResult<S::Genome>> {
        Self::run_with_cancel(strategy, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The flag is checked once per generation, after the termination
    /// predicate. A cancelled run still returns the best organism of the
    /// last evaluated generation.
    pub fn run_with_cancel<S: Strategy>(
        strategy: &S,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<S::Genome>> {
        config.validate()?;
        strategy.validate().map_err(GaError::InvalidStrategy)?;
        let cancel = cancel.as_deref();

        match config.num_threads {
            Some(threads) if config.parallel => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| evolve(strategy, config, cancel))
            }
            _ => evolve(strategy, config, cancel),
        }
    }
}

fn evolve<S: Strategy>(
    strategy: &S,
    config: &GaConfig,
    cancel: Option<&AtomicBool>,
) -> Result<GaResult<S::Genome>> {
    strategy.on_start();
    let started = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random::<u64>));

    let size = config.population_size;
    let elite_count = config.elite_count();

    // 1. Initialize population
    let seeds: Vec<u64> = (0..size).map(|_| rng.random()).collect();
    let mut population = fan_out(config.parallel, seeds, |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        Organism::evaluate(strategy, strategy.create(&mut rng))
    });
    ensure_finite(&population, 0)?;
    log::trace!("initialized population of {size} ({elite_count} elites per generation)");

    let mut fitness_history = Vec::new();
    let mut generation = 0usize;

    // 2. Generation loop
    loop {
        generation += 1;

        let best_idx = best_index(&population);
        let best_fitness = population[best_idx].fitness;
        fitness_history.push(best_fitness);

        let stats = generation_stats(generation, &population, best_fitness);
        log::debug!(
            "generation {}: best={:.4} mean={:.4} worst={:.4}",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness,
            stats.worst_fitness
        );
        strategy.on_generation(&stats);

        let termination = if strategy.has_finished(
            generation,
            &population[best_idx].genome,
            best_fitness,
        ) {
            Some(Termination::Finished)
        } else {
            interruption(config, started, cancel, generation)
        };

        if let Some(termination) = termination {
            log::info!(
                "run ended after {generation} generations ({termination:?}), best fitness {best_fitness:.4}"
            );
            return Ok(GaResult {
                best: population.swap_remove(best_idx),
                generations: generation,
                termination,
                fitness_history,
            });
        }

        // 3. Rank: ascending, fittest last
        population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        let fitness: Vec<f64> = population.iter().map(|o| o.fitness).collect();
        let table = FitnessTable::from_sorted(&fitness);

        // 4. Choose parents on the master generator
        let couples: Vec<(usize, usize, u64)> = (0..size - elite_count)
            .map(|_| {
                let a = config.selection.select(&table, &mut rng);
                let b = config.selection.select(&table, &mut rng);
                (a, b, rng.random())
            })
            .collect();

        // 5. Breed offspring
        let offspring = fan_out(config.parallel, couples, |(a, b, seed)| {
            breed(
                strategy,
                &population[a],
                &population[b],
                config.mutation_rate,
                seed,
            )
        });
        ensure_finite(&offspring, generation)?;

        // 6. Offspring followed by the untouched top tail
        let elites = population.split_off(size - elite_count);
        population = offspring;
        population.extend(elites);
    }
}

/// Produces one child: crossover, optional mutation, evaluation.
fn breed<S: Strategy>(
    strategy: &S,
    parent_a: &Organism<S::Genome>,
    parent_b: &Organism<S::Genome>,
    mutation_rate: f64,
    seed: u64,
) -> Organism<S::Genome> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut child = strategy.crossover(
        &parent_a.genome,
        parent_a.fitness,
        &parent_b.genome,
        parent_b.fitness,
        &mut rng,
    );
    if rng.random_range(0.0..1.0) < mutation_rate {
        child = strategy.mutate(&child, &mut rng);
    }

    Organism::evaluate(strategy, child)
}

/// Maps independent units of work, in parallel when enabled.
///
/// Output order matches input order.
fn fan_out<U, T, F>(parallel: bool, units: Vec<U>, work: F) -> Vec<T>
where
    U: Send,
    T: Send,
    F: Fn(U) -> T + Send + Sync,
{
    if parallel {
        units.into_par_iter().map(work).collect()
    } else {
        units.into_iter().map(work).collect()
    }
}

/// Index of the fittest organism; the first one wins ties.
fn best_index<G>(population: &[Organism<G>]) -> usize {
    let mut best = 0;
    for (i, organism) in population.iter().enumerate().skip(1) {
        if organism.fitness > population[best].fitness {
            best = i;
        }
    }
    best
}

fn generation_stats<G>(
    generation: usize,
    population: &[Organism<G>],
    best_fitness: f64,
) -> GenerationStats {
    let sum: f64 = population.iter().map(|o| o.fitness).sum();
    let worst_fitness = population
        .iter()
        .map(|o| o.fitness)
        .fold(f64::INFINITY, f64::min);

    GenerationStats {
        generation,
        best_fitness,
        mean_fitness: sum / population.len() as f64,
        worst_fitness,
    }
}

fn ensure_finite<G>(organisms: &[Organism<G>], generation: usize) -> Result<()> {
    match organisms.iter().find(|o| !o.fitness.is_finite()) {
        Some(o) => Err(GaError::NonFiniteFitness {
            generation,
            fitness: o.fitness,
        }),
        None => Ok(()),
    }
}

/// Limits checked at the generation boundary.
fn interruption(
    config: &GaConfig,
    started: Instant,
    cancel: Option<&AtomicBool>,
    generation: usize,
) -> Option<Termination> {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        return Some(Termination::Cancelled);
    }
    if let Some(limit) = config.time_limit_ms {
        if started.elapsed().as_millis() >= u128::from(limit) {
            return Some(Termination::TimeLimit);
        }
    }
    if config.max_generations.is_some_and(|max| generation >= max) {
        return Some(Termination::GenerationLimit);
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
