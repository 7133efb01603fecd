//! Core trait definitions for the GA engine.
//!
//! [`Strategy`] is the contract between the generic generational engine and
//! a concrete problem. [`Organism`] pairs a genome with the fitness the
//! strategy assigned to it.

use rand::Rng;

/// A candidate solution in the population: a genome and its fitness.
///
/// Fitness is **maximized**: higher is better. The scale is defined by the
/// strategy and may be negative, but it must be finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Organism<G> {
    /// The genome produced by the strategy.
    pub genome: G,

    /// Fitness computed by [`Strategy::fitness`] for `genome`.
    pub fitness: f64,
}

impl<G> Organism<G> {
    /// Evaluates `genome` with `strategy` and wraps both.
    pub fn evaluate<S>(strategy: &S, genome: G) -> Self
    where
        S: Strategy<Genome = G> + ?Sized,
    {
        let fitness = strategy.fitness(&genome);
        Self { genome, fitness }
    }
}

/// Per-generation population statistics handed to
/// [`Strategy::on_generation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// 1-based generation index.
    pub generation: usize,

    /// Highest fitness in the population.
    pub best_fitness: f64,

    /// Arithmetic mean of all fitness values.
    pub mean_fitness: f64,

    /// Lowest fitness in the population.
    pub worst_fitness: f64,
}

/// Defines an evolutionary problem.
///
/// This is the trait users implement to plug a problem into
/// [`GaRunner`](super::GaRunner). It covers:
///
/// 1. **Creation**: how to produce a random genome
/// 2. **Evaluation**: how to score a genome (higher is better)
/// 3. **Crossover**: how to derive one child from two scored parents
/// 4. **Mutation**: how to perturb a genome
/// 5. **Termination**: when the best genome of a generation is good enough
///
/// # Genome ownership
///
/// Crossover and mutation receive shared references and must return new
/// genomes. Parents can be selected several times in one generation, so an
/// implementation must never hand back storage aliased with a parent.
///
/// # Thread Safety
///
/// The runner calls `create`, `fitness`, `crossover` and `mutate` from
/// rayon worker threads, each with its own random generator.
///
/// # Examples
///
/// ```ignore
/// struct OneMax { len: usize }
///
/// impl Strategy for OneMax {
///     type Genome = Vec<bool>;
///
///     fn create<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
///         (0..self.len).map(|_| rng.random_bool(0.5)).collect()
///     }
///
///     fn fitness(&self, genome: &Vec<bool>) -> f64 {
///         genome.iter().filter(|&&b| b).count() as f64
///     }
///
///     fn crossover<R: Rng>(&self, a: &Vec<bool>, _: f64, b: &Vec<bool>, _: f64, rng: &mut R) -> Vec<bool> {
///         let cut = rng.random_range(0..self.len);
///         a[..cut].iter().chain(&b[cut..]).copied().collect()
///     }
///
///     fn mutate<R: Rng>(&self, genome: &Vec<bool>, rng: &mut R) -> Vec<bool> {
///         let mut next = genome.clone();
///         let i = rng.random_range(0..self.len);
///         next[i] = !next[i];
///         next
///     }
///
///     fn has_finished(&self, _generation: usize, _best: &Vec<bool>, fitness: f64) -> bool {
///         fitness >= self.len as f64
///     }
/// }
/// ```
pub trait Strategy: Send + Sync {
    /// The genome (solution representation) for this problem.
    type Genome: Clone + Send + Sync;

    /// Creates a random genome consistent with the problem configuration.
    fn create<R: Rng>(&self, rng: &mut R) -> Self::Genome;

    /// Scores a genome. Higher is better.
    ///
    /// Used both for ranking and as the weight in fitness-proportionate
    /// selection. Must return a finite value.
    fn fitness(&self, genome: &Self::Genome) -> f64;

    /// Produces one child from two parents and their fitness values.
    fn crossover<R: Rng>(
        &self,
        parent_a: &Self::Genome,
        fitness_a: f64,
        parent_b: &Self::Genome,
        fitness_b: f64,
        rng: &mut R,
    ) -> Self::Genome;

    /// Returns a mutated copy of `genome`.
    fn mutate<R: Rng>(&self, genome: &Self::Genome, rng: &mut R) -> Self::Genome;

    /// Decides whether the run is over, given the best organism of the
    /// current generation. `generation` is 1-based.
    fn has_finished(&self, generation: usize, best: &Self::Genome, best_fitness: f64) -> bool;

    /// Checks strategy-level parameters before a run starts.
    ///
    /// An error aborts the run with
    /// [`GaError::InvalidStrategy`](super::GaError::InvalidStrategy) before
    /// any genome is created. The default accepts everything.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Called once at the start of every run, before the initial
    /// population is created.
    ///
    /// Strategies that keep per-run state (counters, adaptive switches)
    /// reset it here so that reusing a strategy for another run starts
    /// from the same state. The default implementation is a no-op.
    fn on_start(&self) {}

    /// Called once per generation, after evaluation and before
    /// [`has_finished`](Self::has_finished).
    ///
    /// Useful for progress reporting. The default implementation is a no-op.
    fn on_generation(&self, _stats: &GenerationStats) {}
}
