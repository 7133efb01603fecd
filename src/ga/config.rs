//! GA configuration.
//!
//! [`GaConfig`] holds every parameter of a run. It is immutable once the
//! run starts; problem-specific parameters (tree depth, input arity,
//! targets) live in the [`Strategy`](super::Strategy) instead.

use super::error::{GaError, Result};
use super::selection::Selection;

/// Configuration for the generational GA.
///
/// # Defaults
///
/// ```
/// use u_genprog::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert!(config.max_generations.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_genprog::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_survival_rate(0.05)
///     .with_mutation_rate(0.1)
///     .with_selection(Selection::Roulette)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of organisms in the population. Fixed for the whole run.
    pub population_size: usize,

    /// Fraction of the population carried unchanged into the next
    /// generation (`0.0..1.0`).
    ///
    /// `floor(survival_rate * population_size)` of the fittest organisms
    /// survive. Zero regenerates the whole population every generation.
    pub survival_rate: f64,

    /// Probability that an offspring is passed through
    /// [`Strategy::mutate`](super::Strategy::mutate) (`0.0..=1.0`).
    pub mutation_rate: f64,

    /// Parent selection scheme.
    pub selection: Selection,

    /// Optional generation budget.
    ///
    /// `None` runs until [`Strategy::has_finished`](super::Strategy::has_finished)
    /// accepts a generation.
    pub max_generations: Option<usize>,

    /// Optional wall-clock limit in milliseconds.
    ///
    /// Checked once per generation, so a run may overshoot by up to one
    /// generation's worth of work.
    pub time_limit_ms: Option<u64>,

    /// Number of worker threads used for evaluation and reproduction.
    ///
    /// `None` uses rayon's global pool, sized to the available cores.
    pub num_threads: Option<usize>,

    /// Whether to fan work out across workers at all.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            survival_rate: 0.0,
            mutation_rate: 0.1,
            selection: Selection::default(),
            max_generations: None,
            time_limit_ms: None,
            num_threads: None,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the survival (elitism) rate.
    pub fn with_survival_rate(mut self, rate: f64) -> Self {
        self.survival_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the selection scheme.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the number of worker threads.
    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Enables or disables parallel work.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of organisms carried unchanged into each next generation.
    pub fn elite_count(&self) -> usize {
        (self.survival_rate * self.population_size as f64).floor() as usize
    }

    /// Validates the configuration.
    ///
    /// Called by the runner before the first generation; an invalid
    /// configuration never reaches the generation loop.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GaError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.survival_rate) {
            return Err(GaError::InvalidConfig(format!(
                "survival_rate must be in [0, 1), got {}",
                self.survival_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GaError::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(GaError::InvalidConfig(
                "tournament size must be at least 1".into(),
            ));
        }
        if self.max_generations == Some(0) {
            return Err(GaError::InvalidConfig(
                "max_generations must be positive or None".into(),
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(GaError::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(GaError::InvalidConfig(
                "num_threads must be positive or None".into(),
            ));
        }
        Ok(())
    }
}
