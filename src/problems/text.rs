//! Evolving a byte string toward a fixed target text.

use super::error::ProblemError;
use crate::ga::Strategy;
use rand::Rng;

/// Printable ASCII range used for random bytes.
const PRINTABLE: std::ops::Range<u8> = 32..127;

/// A [`Strategy`] whose genome is a byte string of the target's length.
///
/// Fitness is the number of positions matching the target.
///
/// # Examples
///
/// ```
/// use u_genprog::ga::{GaConfig, GaRunner};
/// use u_genprog::problems::TextMatch;
///
/// let problem = TextMatch::new("hello").unwrap();
/// let config = GaConfig::default()
///     .with_population_size(100)
///     .with_survival_rate(0.05)
///     .with_seed(1);
/// let result = GaRunner::run(&problem, &config).unwrap();
/// assert_eq!(result.best.genome, b"hello".to_vec());
/// ```
#[derive(Debug, Clone)]
pub struct TextMatch {
    target: Vec<u8>,
}

impl TextMatch {
    /// Targets `target`, which must be non-empty printable ASCII.
    pub fn new(target: impl Into<Vec<u8>>) -> Result<Self, ProblemError> {
        let target = target.into();
        if target.is_empty() {
            return Err(ProblemError::InvalidParameter("target text is empty".into()));
        }
        if let Some(pos) = target.iter().position(|b| !PRINTABLE.contains(b)) {
            return Err(ProblemError::InvalidParameter(format!(
                "byte {:#04x} at position {pos} is not printable ASCII",
                target[pos]
            )));
        }
        Ok(Self { target })
    }

    /// The target bytes.
    pub fn target(&self) -> &[u8] {
        &self.target
    }
}

impl Strategy for TextMatch {
    type Genome = Vec<u8>;

    fn create<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
        (0..self.target.len())
            .map(|_| rng.random_range(PRINTABLE))
            .collect()
    }

    fn fitness(&self, genome: &Vec<u8>) -> f64 {
        genome
            .iter()
            .zip(&self.target)
            .filter(|(a, b)| a == b)
            .count() as f64
    }

    /// Single-point crossover: `b` up to and including the cut, `a` after.
    fn crossover<R: Rng>(
        &self,
        parent_a: &Vec<u8>,
        _fitness_a: f64,
        parent_b: &Vec<u8>,
        _fitness_b: f64,
        rng: &mut R,
    ) -> Vec<u8> {
        let cut = rng.random_range(0..self.target.len());
        parent_b[..=cut]
            .iter()
            .chain(&parent_a[cut + 1..])
            .copied()
            .collect()
    }

    /// Rewrites one byte that does not yet match the target.
    fn mutate<R: Rng>(&self, genome: &Vec<u8>, rng: &mut R) -> Vec<u8> {
        let mut next = genome.clone();
        let wrong: Vec<usize> = (0..next.len())
            .filter(|&i| next[i] != self.target[i])
            .collect();
        if !wrong.is_empty() {
            let i = wrong[rng.random_range(0..wrong.len())];
            next[i] = rng.random_range(PRINTABLE);
        }
        next
    }

    fn has_finished(&self, generation: usize, best: &Vec<u8>, best_fitness: f64) -> bool {
        log::trace!(
            "generation {generation}: {} ({best_fitness})",
            String::from_utf8_lossy(best)
        );
        *best == self.target
    }
}
