//! Evolving an expression that reproduces a boolean truth table.
//!
//! Logic gates, character classifiers and arithmetic-bit predictors are all
//! truth tables: a list of input rows and the expected output of each.

use super::error::ProblemError;
use crate::expr::{self, Expression};
use crate::ga::Strategy;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// How tree size feeds into fitness.
///
/// The bonus is `weight / complexity`, added to the number of matching
/// rows. Keep `weight` below 1 so that no size advantage can outweigh a
/// single extra matching row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComplexityPolicy {
    /// Fitness is the raw match count.
    #[default]
    Disabled,

    /// The bonus is always applied.
    Always {
        /// Bonus scale.
        weight: f64,
    },

    /// The bonus switches on once the best raw match count has not
    /// improved for `generations` consecutive generations, and then stays
    /// on for the rest of the run.
    AfterPlateau {
        /// Bonus scale.
        weight: f64,
        /// Stale generations before the bonus activates.
        generations: usize,
    },
}

impl ComplexityPolicy {
    fn weight(self) -> f64 {
        match self {
            ComplexityPolicy::Disabled => 0.0,
            ComplexityPolicy::Always { weight }
            | ComplexityPolicy::AfterPlateau { weight, .. } => weight,
        }
    }
}

#[derive(Debug, Default)]
struct Plateau {
    best_score: Option<usize>,
    stale: usize,
}

/// A [`Strategy`] evolving an [`Expression`] to match a truth table.
///
/// # Examples
///
/// ```
/// use u_genprog::problems::TruthTable;
///
/// // Two-input AND
/// let table = TruthTable::from_fn(2, |row| row[0] && row[1]).unwrap();
/// assert_eq!(table.rows(), 4);
/// assert_eq!(table.input_arity(), 2);
/// ```
#[derive(Debug)]
pub struct TruthTable {
    inputs: Vec<Vec<bool>>,
    outputs: Vec<bool>,
    max_depth: usize,
    mutation_rate: f64,
    complexity: ComplexityPolicy,
    simplify_offspring: bool,
    generation_limit: Option<usize>,
    bonus_active: AtomicBool,
    plateau: Mutex<Plateau>,
}

impl TruthTable {
    /// Builds a table from input rows and the expected output of each.
    ///
    /// Every row must have the same, nonzero number of inputs.
    pub fn new(inputs: Vec<Vec<bool>>, outputs: Vec<bool>) -> Result<Self, ProblemError> {
        if inputs.is_empty() {
            return Err(ProblemError::EmptyTable);
        }
        if inputs.len() != outputs.len() {
            return Err(ProblemError::LengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        let expected = inputs[0].len();
        if let Some((row, found)) = inputs
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected || len == 0)
        {
            return Err(ProblemError::RaggedInputs {
                row,
                expected,
                found,
            });
        }

        Ok(Self {
            inputs,
            outputs,
            max_depth: 4,
            mutation_rate: 0.1,
            complexity: ComplexityPolicy::Disabled,
            simplify_offspring: false,
            generation_limit: None,
            bonus_active: AtomicBool::new(false),
            plateau: Mutex::new(Plateau::default()),
        })
    }

    /// Builds the full table of a boolean function over `input_arity`
    /// inputs: all `2^input_arity` rows, input 0 as the least significant
    /// bit of the row number.
    pub fn from_fn<F>(input_arity: usize, f: F) -> Result<Self, ProblemError>
    where
        F: Fn(&[bool]) -> bool,
    {
        if input_arity == 0 || input_arity > 16 {
            return Err(ProblemError::InvalidParameter(format!(
                "input_arity must be in 1..=16 for a full table, got {input_arity}"
            )));
        }
        let inputs: Vec<Vec<bool>> = (0..1u64 << input_arity)
            .map(|row| super::bits::lsb_first(row, input_arity))
            .collect();
        let outputs = inputs.iter().map(|row| f(row)).collect();
        Self::new(inputs, outputs)
    }

    /// Sets the maximum tree depth used by creation and mutation.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the per-node mutation rate handed to [`expr::mutate`].
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the complexity policy.
    pub fn with_complexity(mut self, policy: ComplexityPolicy) -> Self {
        self.complexity = policy;
        self.reset_run_state();
        self
    }

    /// Simplifies every crossover child with [`expr::optimize`].
    pub fn with_simplify_offspring(mut self, simplify: bool) -> Self {
        self.simplify_offspring = simplify;
        self
    }

    /// Ends the run after `generations` even without a perfect match.
    pub fn with_generation_limit(mut self, generations: usize) -> Self {
        self.generation_limit = Some(generations);
        self
    }

    /// Checks the tuning parameters.
    ///
    /// [`GaRunner`](crate::ga::GaRunner) calls this before every run and
    /// refuses to start on an error.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.max_depth == 0 {
            return Err(ProblemError::InvalidParameter(
                "max_depth must be at least 1".into(),
            ));
        }
        let weight = self.complexity.weight();
        if !(0.0..1.0).contains(&weight) {
            return Err(ProblemError::InvalidParameter(format!(
                "complexity weight must be in [0, 1), got {weight}"
            )));
        }
        Ok(())
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.inputs.len()
    }

    /// Number of inputs per row.
    pub fn input_arity(&self) -> usize {
        self.inputs[0].len()
    }

    /// Number of rows on which `expr` produces the expected output.
    pub fn score(&self, expr: &Expression) -> usize {
        self.inputs
            .iter()
            .zip(&self.outputs)
            .filter(|&(row, &expected)| expr.evaluate(row) == expected)
            .count()
    }

    /// Checks that `expr` is well formed for this table's inputs.
    ///
    /// ```
    /// use u_genprog::expr::Expression;
    /// use u_genprog::problems::TruthTable;
    ///
    /// let table = TruthTable::from_fn(2, |row| row[0]).unwrap();
    /// assert!(table.check(&Expression::value(1)).is_ok());
    /// assert!(table.check(&Expression::value(2)).is_err());
    /// ```
    pub fn check(&self, expr: &Expression) -> Result<(), ProblemError> {
        expr.validate(self.input_arity())?;
        Ok(())
    }

    /// Whether `expr` reproduces every row.
    pub fn is_solved_by(&self, expr: &Expression) -> bool {
        self.score(expr) == self.rows()
    }

    /// Whether the complexity bonus currently applies.
    pub fn complexity_bonus_active(&self) -> bool {
        self.bonus_active.load(Ordering::Relaxed)
    }

    /// Clears the plateau counter and puts the bonus back in its
    /// starting position for the current policy.
    fn reset_run_state(&self) {
        *self.plateau.lock().unwrap_or_else(|e| e.into_inner()) = Plateau::default();
        self.bonus_active.store(
            matches!(self.complexity, ComplexityPolicy::Always { .. }),
            Ordering::Relaxed,
        );
    }

    fn track_plateau(&self, score: usize) {
        let ComplexityPolicy::AfterPlateau { generations, .. } = self.complexity else {
            return;
        };
        let mut plateau = self.plateau.lock().unwrap_or_else(|e| e.into_inner());
        if plateau.best_score.is_none_or(|best| score > best) {
            plateau.best_score = Some(score);
            plateau.stale = 0;
        } else {
            plateau.stale += 1;
        }
        if plateau.stale >= generations && !self.complexity_bonus_active() {
            log::debug!(
                "best score stuck at {score} for {} generations, enabling complexity bonus",
                plateau.stale
            );
            self.bonus_active.store(true, Ordering::Relaxed);
        }
    }
}

impl Strategy for TruthTable {
    type Genome = Expression;

    fn validate(&self) -> Result<(), String> {
        TruthTable::validate(self).map_err(|e| e.to_string())
    }

    fn on_start(&self) {
        self.reset_run_state();
    }

    fn create<R: Rng>(&self, rng: &mut R) -> Expression {
        expr::create(1, self.max_depth, self.input_arity(), rng)
    }

    fn fitness(&self, genome: &Expression) -> f64 {
        let matches = self.score(genome) as f64;
        if self.complexity_bonus_active() {
            matches + self.complexity.weight() / genome.complexity() as f64
        } else {
            matches
        }
    }

    fn crossover<R: Rng>(
        &self,
        parent_a: &Expression,
        fitness_a: f64,
        parent_b: &Expression,
        fitness_b: f64,
        rng: &mut R,
    ) -> Expression {
        let child = expr::merge(parent_a, fitness_a, parent_b, fitness_b, rng);
        if self.simplify_offspring {
            expr::optimize(&child)
        } else {
            child
        }
    }

    fn mutate<R: Rng>(&self, genome: &Expression, rng: &mut R) -> Expression {
        expr::mutate(
            genome,
            self.mutation_rate,
            self.max_depth,
            self.input_arity(),
            rng,
        )
    }

    fn has_finished(&self, generation: usize, best: &Expression, best_fitness: f64) -> bool {
        let score = self.score(best);
        log::trace!(
            "generation {generation}: {best} scores {score}/{} ({best_fitness:.4})",
            self.rows()
        );
        self.track_plateau(score);

        score == self.rows() || self.generation_limit.is_some_and(|limit| generation >= limit)
    }
}
