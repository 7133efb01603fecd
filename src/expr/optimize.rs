//! Structural simplification of expression trees.
//!
//! Rewrites applied bottom-up:
//!
//! - `NOT(NOT(x))` → `x`
//! - repeated leaves under `AND`/`OR`/`NAND`/`NOR` keep their first occurrence
//! - `AND(x)`/`OR(x)` → `x`
//! - `NAND(x)`/`NOR(x)` → `NOT(x)`, then double negation is collapsed again
//!
//! Every rewrite preserves the truth table. Because children are simplified
//! before their parent and each rewrite only produces already-simplified
//! shapes, the pass is idempotent.

use super::types::{Expression, Operator};
use std::collections::HashSet;

/// Returns a simplified copy of `expr`.
///
/// # Examples
///
/// ```
/// use u_genprog::expr::{optimize, Expression, Operator};
///
/// let e = Expression::gate(
///     Operator::Or,
///     vec![Expression::not(Expression::not(Expression::value(0)))],
/// );
/// assert_eq!(optimize(&e), Expression::value(0));
/// ```
pub fn optimize(expr: &Expression) -> Expression {
    match expr.operator() {
        Operator::Value => expr.clone(),
        Operator::Not => negate(optimize(&expr.children()[0])),
        Operator::Xor | Operator::Nxor => Expression::node(
            expr.operator(),
            expr.children().iter().map(optimize).collect(),
        ),
        op @ (Operator::And | Operator::Or | Operator::Nand | Operator::Nor) => {
            let mut seen = HashSet::new();
            let mut children: Vec<Expression> = expr
                .children()
                .iter()
                .map(optimize)
                .filter(|child| child.input().is_none_or(|input| seen.insert(input)))
                .collect();

            if children.len() == 1 {
                let only = children.remove(0);
                match op {
                    Operator::And | Operator::Or => only,
                    _ => negate(only),
                }
            } else {
                Expression::node(op, children)
            }
        }
    }
}

/// `NOT(inner)` for an already simplified `inner`.
fn negate(inner: Expression) -> Expression {
    if inner.operator() == Operator::Not {
        inner.into_children().remove(0)
    } else {
        Expression::not(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> Expression {
        Expression::value(i)
    }

    fn g(op: Operator, children: Vec<Expression>) -> Expression {
        Expression::gate(op, children)
    }

    fn rows(n: usize) -> Vec<Vec<bool>> {
        (0..1usize << n)
            .map(|bits| (0..n).map(|i| bits >> i & 1 == 1).collect())
            .collect()
    }

    fn same_truth_table(a: &Expression, b: &Expression, n: usize) -> bool {
        rows(n).iter().all(|row| a.evaluate(row) == b.evaluate(row))
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(optimize(&Expression::not(Expression::not(v(2)))), v(2));
    }

    #[test]
    fn test_triple_negation() {
        let e = Expression::not(Expression::not(Expression::not(v(0))));
        assert_eq!(optimize(&e), Expression::not(v(0)));
    }

    #[test]
    fn test_dedup_leaves_keeps_order() {
        let e = g(Operator::And, vec![v(1), v(0), v(1), v(2), v(0)]);
        assert_eq!(optimize(&e), g(Operator::And, vec![v(1), v(0), v(2)]));
    }

    #[test]
    fn test_dedup_then_collapse() {
        let e = g(Operator::Or, vec![v(3), v(3)]);
        assert_eq!(optimize(&e), v(3));
    }

    #[test]
    fn test_single_child_nand_becomes_not() {
        let e = g(Operator::Nand, vec![v(0)]);
        assert_eq!(optimize(&e), Expression::not(v(0)));
        let e = g(Operator::Nor, vec![v(0), v(0)]);
        assert_eq!(optimize(&e), Expression::not(v(0)));
    }

    #[test]
    fn test_single_child_nor_of_not_unwraps() {
        let e = g(Operator::Nor, vec![Expression::not(v(1))]);
        assert_eq!(optimize(&e), v(1));
    }

    #[test]
    fn test_collapsed_child_dedups_with_sibling() {
        // OR(AND(A), A) -> OR(A, A) -> A
        let e = g(Operator::Or, vec![g(Operator::And, vec![v(0)]), v(0)]);
        assert_eq!(optimize(&e), v(0));
    }

    #[test]
    fn test_xor_children_simplified() {
        let e = g(
            Operator::Xor,
            vec![Expression::not(Expression::not(v(0))), v(0)],
        );
        assert_eq!(optimize(&e), g(Operator::Xor, vec![v(0), v(0)]));
    }

    #[test]
    fn test_gate_children_not_deduplicated() {
        let child = g(Operator::Xor, vec![v(0), v(1)]);
        let e = g(Operator::And, vec![child.clone(), child.clone()]);
        assert_eq!(optimize(&e), e);
    }

    #[test]
    fn test_preserves_semantics_and_idempotent() {
        let cases = vec![
            g(
                Operator::Nand,
                vec![g(Operator::Nor, vec![Expression::not(v(0))]), v(2), v(2)],
            ),
            g(
                Operator::Nxor,
                vec![
                    g(Operator::Or, vec![v(1), v(1), v(0)]),
                    Expression::not(g(Operator::Nand, vec![v(2)])),
                ],
            ),
            Expression::not(g(Operator::And, vec![Expression::not(v(1))])),
        ];

        for e in cases {
            let once = optimize(&e);
            assert!(same_truth_table(&e, &once, 3), "{e} -> {once}");
            assert_eq!(optimize(&once), once, "not idempotent for {e}");
            assert!(once.complexity() <= e.complexity());
        }
    }
}
