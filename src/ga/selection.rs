//! Parent selection.
//!
//! Selection works on a population sorted by fitness **ascending**, so the
//! fittest organism sits at the end. [`FitnessTable`] captures that order
//! together with cumulative sums once per generation; every draw for the
//! generation then reads the same table.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use rand::Rng;

/// Selection strategy for choosing parents.
///
/// All strategies assume **maximization** (higher fitness = better).
///
/// # Examples
///
/// ```
/// use u_genprog::ga::{FitnessTable, Selection};
///
/// let table = FitnessTable::from_sorted(&[0.0, 0.0, 3.0]);
/// let mut rng = rand::rng();
/// // Zero-fitness organisms own empty slices of the wheel.
/// assert_eq!(Selection::Roulette.select(&table, &mut rng), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Each organism owns the interval `[cumulative - fitness, cumulative)`
    /// of the wheel; a uniform draw in `[0, total)` picks the interval
    /// that contains it. Falls back to uniform selection when the total
    /// fitness is not positive.
    ///
    /// # Complexity
    /// O(n) per selection
    #[default]
    Roulette,

    /// Tournament selection: draw `k` organisms uniformly, keep the fittest.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Linear rank selection: the organism at ascending position `i`
    /// has weight `i + 1`. Insensitive to the fitness scale, including
    /// negative values.
    ///
    /// # Complexity
    /// O(n) per selection
    Rank,
}

/// Fitness values of a sorted population plus their running sums.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessTable {
    fitness: Vec<f64>,
    cumulative: Vec<f64>,
    total: f64,
}

impl FitnessTable {
    /// Builds the table from fitness values sorted ascending.
    pub fn from_sorted(fitness: &[f64]) -> Self {
        debug_assert!(
            fitness.windows(2).all(|w| w[0] <= w[1]),
            "fitness must be sorted ascending"
        );

        let mut total = 0.0;
        let cumulative = fitness
            .iter()
            .map(|&f| {
                total += f;
                total
            })
            .collect();

        Self {
            fitness: fitness.to_vec(),
            cumulative,
            total,
        }
    }

    /// Number of organisms in the table.
    pub fn len(&self) -> usize {
        self.fitness.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.fitness.is_empty()
    }

    /// Sum of all fitness values.
    pub fn total(&self) -> f64 {
        self.total
    }
}

impl Selection {
    /// Selects a parent position in the sorted population.
    ///
    /// # Panics
    /// Panics if `table` is empty.
    pub fn select<R: Rng>(&self, table: &FitnessTable, rng: &mut R) -> usize {
        assert!(!table.is_empty(), "cannot select from empty population");

        match self {
            Selection::Roulette => roulette(table, rng),
            Selection::Tournament(k) => tournament(table, *k, rng),
            Selection::Rank => rank(table, rng),
        }
    }
}

fn roulette<R: Rng>(table: &FitnessTable, rng: &mut R) -> usize {
    let n = table.len();
    if n == 1 {
        return 0;
    }
    // Also catches a NaN total.
    if !(table.total > 0.0) {
        return rng.random_range(0..n);
    }

    let draw = rng.random_range(0.0..table.total);

    // Scan from the fittest end; high-fitness organisms own the widest
    // intervals and are found soonest.
    for i in (0..n).rev() {
        let upper = table.cumulative[i];
        let lower = upper - table.fitness[i];
        if lower <= draw && draw < upper {
            return i;
        }
    }

    // Negative fitness values leave gaps in the wheel.
    n - 1
}

fn tournament<R: Rng>(table: &FitnessTable, k: usize, rng: &mut R) -> usize {
    let n = table.len();
    let mut best = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if table.fitness[idx] > table.fitness[best] {
            best = idx;
        }
    }
    best
}

fn rank<R: Rng>(table: &FitnessTable, rng: &mut R) -> usize {
    let n = table.len();
    if n == 1 {
        return 0;
    }

    let total = (n * (n + 1)) as f64 / 2.0;
    let draw = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for i in 0..n {
        cumulative += (i + 1) as f64;
        if draw < cumulative {
            return i;
        }
    }
    n - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn counts(selection: Selection, fitness: &[f64], draws: usize) -> Vec<usize> {
        let table = FitnessTable::from_sorted(fitness);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = vec![0usize; fitness.len()];
        for _ in 0..draws {
            counts[selection.select(&table, &mut rng)] += 1;
        }
        counts
    }

    #[test]
    fn test_table_cumulative() {
        let table = FitnessTable::from_sorted(&[1.0, 2.0, 4.0]);
        assert_eq!(table.cumulative, vec![1.0, 3.0, 7.0]);
        assert!((table.total() - 7.0).abs() < 1e-12);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_roulette_proportional() {
        let c = counts(Selection::Roulette, &[1.0, 3.0, 6.0], 20_000);
        // Expected shares: 10%, 30%, 60%.
        assert!((1_500..2_500).contains(&c[0]), "counts: {c:?}");
        assert!((5_300..6_700).contains(&c[1]), "counts: {c:?}");
        assert!((11_200..12_800).contains(&c[2]), "counts: {c:?}");
    }

    #[test]
    fn test_roulette_zero_fitness_never_selected() {
        let c = counts(Selection::Roulette, &[0.0, 0.0, 2.0, 2.0], 2_000);
        assert_eq!(c[0], 0);
        assert_eq!(c[1], 0);
        assert!(c[2] > 0 && c[3] > 0);
    }

    #[test]
    fn test_roulette_zero_total_is_uniform() {
        let c = counts(Selection::Roulette, &[0.0, 0.0, 0.0, 0.0], 10_000);
        for &x in &c {
            assert!(x > 2_000, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_roulette_negative_total_is_uniform() {
        let c = counts(Selection::Roulette, &[-5.0, -3.0, -1.0], 9_000);
        for &x in &c {
            assert!(x > 2_400, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_roulette_mixed_sign_stays_in_bounds() {
        let c = counts(Selection::Roulette, &[-2.0, 1.0, 5.0], 5_000);
        assert_eq!(c.iter().sum::<usize>(), 5_000);
        // The negative organism owns no part of the wheel.
        assert_eq!(c[0], 0);
        assert!(c[2] > c[1]);
    }

    #[test]
    fn test_tournament_favors_best() {
        let c = counts(Selection::Tournament(4), &[1.0, 5.0, 8.0, 10.0], 10_000);
        assert!(c[3] > 6_000, "expected best >60%, got {c:?}");
    }

    #[test]
    fn test_tournament_size_one_is_uniform() {
        let c = counts(Selection::Tournament(1), &[1.0, 5.0, 8.0, 10.0], 10_000);
        for &x in &c {
            assert!(x > 2_000, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_rank_favors_best_with_negative_fitness() {
        let c = counts(Selection::Rank, &[-100.0, -50.0, -10.0, -1.0], 10_000);
        assert!(c[3] > c[0], "best should be selected more: {c:?}");
    }

    #[test]
    fn test_single_organism() {
        let table = FitnessTable::from_sorted(&[3.0]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Selection::Roulette.select(&table, &mut rng), 0);
        assert_eq!(Selection::Tournament(3).select(&table, &mut rng), 0);
        assert_eq!(Selection::Rank.select(&table, &mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let table = FitnessTable::from_sorted(&[]);
        let mut rng = StdRng::seed_from_u64(1);
        Selection::Roulette.select(&table, &mut rng);
    }
}
