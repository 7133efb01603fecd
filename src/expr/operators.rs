//! Genetic operators for expression trees.
//!
//! All operators are pure: they read their inputs and return freshly built
//! trees. Subtrees taken from a parent are cloned, never shared.
//!
//! - [`create`]: bounded random generation
//! - [`merge`]: fitness-biased crossover of two parents
//! - [`mutate`]: node-kind-specific random transformation
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming: On the Programming of Computers by
//!   Means of Natural Selection*

use super::optimize::optimize;
use super::types::{Expression, Operator};
use rand::Rng;

/// Creates a random expression.
///
/// `depth` is the 1-based depth of the node being built (0 is treated as
/// 1). A node becomes a leaf with probability `1 / max_depth`, and always
/// once `depth >= max_depth - 1`, so a tree started at depth 1 has at most
/// `max(1, max_depth - 1)` levels. Gates are drawn uniformly from
/// [`Operator::GATES`]; variadic gates get between 1 and `input_arity`
/// children.
///
/// # Panics
/// Panics if `input_arity` is zero.
pub fn create<R: Rng>(
    depth: usize,
    max_depth: usize,
    input_arity: usize,
    rng: &mut R,
) -> Expression {
    assert!(input_arity > 0, "input_arity must be at least 1");

    let depth = depth.max(1);
    let leaf = depth + 1 >= max_depth || chance(rng, 1.0 / max_depth as f64);
    if leaf {
        return Expression::value(rng.random_range(0..input_arity));
    }

    let operator = Operator::GATES[rng.random_range(0..Operator::GATES.len())];
    let arity = operator.arity();
    let count = rng.random_range(arity.min..=arity.capacity(input_arity));
    let children = (0..count)
        .map(|_| create(depth + 1, max_depth, input_arity, rng))
        .collect();

    Expression::node(operator, children)
}

/// Produces one child from two parents, biased toward the fitter one.
///
/// The bias is `r = fitness_a / (fitness_a + fitness_b)`, or `0.5` when the
/// sum is not positive.
///
/// 1. Two leaves: a leaf with `a`'s input.
/// 2. One leaf: a copy of the other parent.
/// 3. Otherwise a copy of `a` with probability `r / 2`, else a copy of `b`
///    with probability `(1 - r) / 2`.
/// 4. Otherwise a position-wise mix under the fitter parent's operator:
///    shared positions take `a`'s child with probability `r`; positions only
///    one parent has are kept with probability `r` (for `a`) or `1 - r`
///    (for `b`), and always while the operator's minimum is unmet.
///
/// The result is not simplified; apply [`optimize`] if wanted.
///
/// # Panics
/// Panics if the mix ends up below the operator's minimum arity. That is
/// only reachable through malformed parents.
pub fn merge<R: Rng>(
    a: &Expression,
    fitness_a: f64,
    b: &Expression,
    fitness_b: f64,
    rng: &mut R,
) -> Expression {
    let total = fitness_a + fitness_b;
    let r = if total > 0.0 {
        (fitness_a / total).clamp(0.0, 1.0)
    } else {
        0.5
    };

    match (a.is_leaf(), b.is_leaf()) {
        (true, true) => return a.clone(),
        (true, false) => return b.clone(),
        (false, true) => return a.clone(),
        (false, false) => {}
    }

    if chance(rng, r / 2.0) {
        return a.clone();
    }
    if chance(rng, (1.0 - r) / 2.0) {
        return b.clone();
    }

    let operator = if r >= 0.5 { a.operator() } else { b.operator() };
    let arity = operator.arity();
    let max = arity.max.unwrap_or(usize::MAX);

    let (left, right) = (a.children(), b.children());
    let mut children = Vec::with_capacity(left.len().max(right.len()));
    for i in 0..left.len().max(right.len()) {
        let below_min = children.len() < arity.min;
        let picked = match (left.get(i), right.get(i)) {
            (Some(x), Some(y)) => Some(if chance(rng, r) { x } else { y }),
            (Some(x), None) => (below_min || chance(rng, r)).then_some(x),
            (None, Some(y)) => (below_min || chance(rng, 1.0 - r)).then_some(y),
            (None, None) => None,
        };
        if let Some(child) = picked {
            if children.len() < max {
                children.push(child.clone());
            }
        }
    }

    assert!(
        arity.admits(children.len()),
        "merge built {} children for {operator} from parents {a} (fitness {fitness_a}) and {b} (fitness {fitness_b})",
        children.len()
    );
    Expression::node(operator, children)
}

/// Returns a randomly mutated copy of `expr`.
///
/// At each visited node, with probability `mutation_rate` a
/// node-kind-specific transformation is applied:
///
/// - leaf: new random input slot
/// - `NOT`: unwrap to its child, or mutate the child
/// - `XOR`/`NXOR`: mutate both children, maybe flip to the other operator
/// - `AND`/`OR`/`NAND`/`NOR`: drop some children and mutate the rest,
///   possibly adding a fresh child; or hoist one child; or switch to a
///   different variadic operator while mutating all children
///
/// Failing that, with decreasing probability the node is simplified with
/// [`optimize`], regenerated with [`create`], or kept as is.
pub fn mutate<R: Rng>(
    expr: &Expression,
    mutation_rate: f64,
    max_depth: usize,
    input_arity: usize,
    rng: &mut R,
) -> Expression {
    let params = MutationParams {
        rate: mutation_rate,
        max_depth,
        input_arity,
    };
    mutate_at(expr, 1, &params, rng)
}

struct MutationParams {
    rate: f64,
    max_depth: usize,
    input_arity: usize,
}

fn mutate_at<R: Rng>(
    expr: &Expression,
    depth: usize,
    p: &MutationParams,
    rng: &mut R,
) -> Expression {
    if chance(rng, p.rate) {
        transform(expr, depth, p, rng)
    } else if chance(rng, p.rate) {
        optimize(expr)
    } else if chance(rng, p.rate) {
        create(depth, p.max_depth, p.input_arity, rng)
    } else {
        expr.clone()
    }
}

fn transform<R: Rng>(
    expr: &Expression,
    depth: usize,
    p: &MutationParams,
    rng: &mut R,
) -> Expression {
    let children = expr.children();

    match expr.operator() {
        Operator::Value => {
            if chance(rng, p.rate) {
                Expression::value(rng.random_range(0..p.input_arity))
            } else {
                expr.clone()
            }
        }
        Operator::Not => {
            if chance(rng, p.rate) {
                children[0].clone()
            } else {
                Expression::not(mutate_at(&children[0], depth + 1, p, rng))
            }
        }
        op @ (Operator::Xor | Operator::Nxor) => {
            let mutated = children
                .iter()
                .map(|child| mutate_at(child, depth + 1, p, rng))
                .collect();
            let op = match (chance(rng, p.rate), op) {
                (true, Operator::Xor) => Operator::Nxor,
                (true, _) => Operator::Xor,
                (false, op) => op,
            };
            Expression::node(op, mutated)
        }
        op => {
            if chance(rng, p.rate) {
                let drop_chance = 1.0 / children.len() as f64;
                let mut kept = Vec::with_capacity(children.len() + 1);
                for child in children {
                    if !chance(rng, drop_chance) {
                        kept.push(mutate_at(child, depth + 1, p, rng));
                    }
                }

                let capacity = op.arity().capacity(p.input_arity);
                if kept.is_empty()
                    || (kept.len() < capacity && chance(rng, 1.0 / kept.len() as f64))
                {
                    kept.push(create(depth + 1, p.max_depth, p.input_arity, rng));
                }
                Expression::node(op, kept)
            } else if chance(rng, p.rate) {
                children[rng.random_range(0..children.len())].clone()
            } else if chance(rng, p.rate) {
                let others: Vec<Operator> =
                    Operator::VARIADIC.into_iter().filter(|&o| o != op).collect();
                let swapped = others[rng.random_range(0..others.len())];
                let mutated = children
                    .iter()
                    .map(|child| mutate_at(child, depth + 1, p, rng))
                    .collect();
                Expression::node(swapped, mutated)
            } else {
                expr.clone()
            }
        }
    }
}

fn chance<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.random_range(0.0..1.0) < probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn v(i: usize) -> Expression {
        Expression::value(i)
    }

    fn g(op: Operator, children: Vec<Expression>) -> Expression {
        Expression::gate(op, children)
    }

    #[test]
    fn test_create_respects_invariants() {
        let mut rng = StdRng::seed_from_u64(1);
        for max_depth in 1..=7 {
            for _ in 0..300 {
                let e = create(1, max_depth, 4, &mut rng);
                assert!(e.validate(4).is_ok(), "invalid tree {e}");
                assert!(
                    e.depth() <= max_depth.saturating_sub(1).max(1),
                    "tree {e} deeper than allowed for max_depth {max_depth}"
                );
            }
        }
    }

    #[test]
    fn test_create_shallow_is_leaf() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            assert!(create(1, 2, 3, &mut rng).is_leaf());
            assert!(create(0, 0, 3, &mut rng).is_leaf());
        }
    }

    #[test]
    fn test_create_uses_every_gate() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(create(1, 6, 3, &mut rng).operator());
        }
        for op in Operator::GATES {
            assert!(seen.contains(&op), "{op} never generated");
        }
        assert!(seen.contains(&Operator::Value));
    }

    #[test]
    #[should_panic(expected = "input_arity must be at least 1")]
    fn test_create_zero_inputs_panics() {
        let mut rng = StdRng::seed_from_u64(4);
        create(1, 4, 0, &mut rng);
    }

    #[test]
    fn test_merge_two_leaves_keeps_a() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            assert_eq!(merge(&v(1), 0.0, &v(2), 10.0, &mut rng), v(1));
        }
    }

    #[test]
    fn test_merge_promotes_non_leaf() {
        let mut rng = StdRng::seed_from_u64(6);
        let tree = g(Operator::Or, vec![v(0), v(1)]);
        assert_eq!(merge(&v(2), 5.0, &tree, 1.0, &mut rng), tree);
        assert_eq!(merge(&tree, 1.0, &v(2), 5.0, &mut rng), tree);
    }

    #[test]
    fn test_merge_respects_arity() {
        let mut rng = StdRng::seed_from_u64(7);
        let parents = [
            g(Operator::Xor, vec![v(0), v(1)]),
            g(Operator::And, vec![v(0), v(1), v(2)]),
            Expression::not(v(2)),
            g(Operator::Nor, vec![v(1)]),
        ];
        for a in &parents {
            for b in &parents {
                for (fa, fb) in [(1.0, 1.0), (3.0, 0.5), (0.5, 3.0), (0.0, 0.0), (-1.0, -2.0)] {
                    for _ in 0..20 {
                        let child = merge(a, fa, b, fb, &mut rng);
                        assert!(child.validate(3).is_ok(), "{a} x {b} -> {child}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_merge_fitter_parent_dominates() {
        let a = g(Operator::And, vec![v(0), v(1)]);
        let b = g(Operator::Or, vec![v(2), v(3)]);
        let mut rng = StdRng::seed_from_u64(8);

        let from_a = (0..1_000)
            .filter(|_| merge(&a, 100.0, &b, 0.0, &mut rng) == a)
            .count();
        assert_eq!(from_a, 1_000);

        let from_a = (0..1_000)
            .filter(|_| merge(&a, 0.0, &b, 100.0, &mut rng) == a)
            .count();
        assert_eq!(from_a, 0);
    }

    #[test]
    fn test_mutate_respects_invariants() {
        let mut rng = StdRng::seed_from_u64(10);
        for rate in [0.1, 0.5, 0.9, 1.0] {
            for _ in 0..300 {
                let e = create(1, 6, 4, &mut rng);
                let m = mutate(&e, rate, 6, 4, &mut rng);
                assert!(m.validate(4).is_ok(), "{e} mutated into invalid {m}");
            }
        }
    }

    #[test]
    fn test_mutate_zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let e = create(1, 6, 4, &mut rng);
            assert_eq!(mutate(&e, 0.0, 6, 4, &mut rng), e);
        }
    }

    #[test]
    fn test_mutate_changes_trees() {
        let mut rng = StdRng::seed_from_u64(12);
        let e = g(
            Operator::And,
            vec![v(0), g(Operator::Xor, vec![v(1), v(2)]), Expression::not(v(3))],
        );
        let changed = (0..200)
            .filter(|_| mutate(&e, 0.5, 6, 4, &mut rng) != e)
            .count();
        assert!(changed > 50, "only {changed} of 200 mutations changed the tree");
    }

    #[test]
    fn test_mutate_variadic_never_exceeds_capacity() {
        let mut rng = StdRng::seed_from_u64(13);
        let e = g(Operator::Or, vec![v(0), v(1)]);
        for _ in 0..500 {
            let m = mutate(&e, 1.0, 5, 2, &mut rng);
            assert!(m.validate(2).is_ok(), "{m}");
        }
    }
}
