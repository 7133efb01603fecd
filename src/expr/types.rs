//! The boolean expression tree and its operators.

use super::error::ExprError;
use std::fmt;

/// Node kind of an [`Expression`].
///
/// `Value` is the only leaf kind; all others are gates over their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// Leaf: reads one slot of the input vector.
    Value,
    /// Negation of a single child.
    Not,
    /// Conjunction of one or more children.
    And,
    /// Disjunction of one or more children.
    Or,
    /// Negated conjunction of one or more children.
    Nand,
    /// Negated disjunction of one or more children.
    Nor,
    /// Exclusive-or of exactly two children.
    Xor,
    /// Negated exclusive-or (equivalence) of exactly two children.
    Nxor,
}

impl Operator {
    /// Every non-leaf operator.
    pub const GATES: [Operator; 7] = [
        Operator::Not,
        Operator::And,
        Operator::Or,
        Operator::Nand,
        Operator::Nor,
        Operator::Xor,
        Operator::Nxor,
    ];

    /// Operators taking a variable number of children.
    pub const VARIADIC: [Operator; 4] = [
        Operator::And,
        Operator::Or,
        Operator::Nand,
        Operator::Nor,
    ];

    /// Child-count bounds of the operator.
    ///
    /// | Operator | min | max |
    /// |----------|-----|-----|
    /// | `Value` | 0 | 0 |
    /// | `Not` | 1 | 1 |
    /// | `Xor`, `Nxor` | 2 | 2 |
    /// | `And`, `Or`, `Nand`, `Nor` | 1 | unbounded |
    pub fn arity(self) -> Arity {
        match self {
            Operator::Value => Arity::exactly(0),
            Operator::Not => Arity::exactly(1),
            Operator::Xor | Operator::Nxor => Arity::exactly(2),
            Operator::And | Operator::Or | Operator::Nand | Operator::Nor => Arity {
                min: 1,
                max: None,
            },
        }
    }

    /// Whether the operator takes a variable number of children.
    pub fn is_variadic(self) -> bool {
        self.arity().max.is_none()
    }

    /// Upper-case name used when rendering.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Value => "VALUE",
            Operator::Not => "NOT",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Nand => "NAND",
            Operator::Nor => "NOR",
            Operator::Xor => "XOR",
            Operator::Nxor => "NXOR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum and maximum child count of an operator.
///
/// `max == None` means unbounded; in practice variadic gates are capped at
/// the input arity of the problem, see [`capacity`](Self::capacity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    /// Fewest children allowed.
    pub min: usize,
    /// Most children allowed, `None` if unbounded.
    pub max: Option<usize>,
}

impl Arity {
    fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// Largest child count allowed for a problem with `input_arity` inputs.
    pub fn capacity(self, input_arity: usize) -> usize {
        self.max.unwrap_or_else(|| input_arity.max(self.min))
    }

    /// Whether `count` children satisfy the bounds, ignoring any cap.
    pub fn admits(self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{}..={max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// A boolean expression tree: the genome of a logic-evolving organism.
///
/// Each node owns its children outright; cloning copies the whole tree, so
/// no two organisms ever share substructure.
///
/// # Examples
///
/// ```
/// use u_genprog::expr::{Expression, Operator};
///
/// // AND(A, NOT(B))
/// let e = Expression::gate(
///     Operator::And,
///     vec![Expression::value(0), Expression::not(Expression::value(1))],
/// );
/// assert!(e.evaluate(&[true, false]));
/// assert!(!e.evaluate(&[true, true]));
/// assert_eq!(e.complexity(), 4);
/// assert_eq!(e.to_string(), "AND(A,NOT(B))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    operator: Operator,
    /// Meaningful only for `Value` leaves; zero otherwise.
    input: usize,
    children: Vec<Expression>,
}

impl Expression {
    /// A leaf reading input slot `input`.
    pub fn value(input: usize) -> Self {
        Self {
            operator: Operator::Value,
            input,
            children: Vec::new(),
        }
    }

    /// `NOT(child)`.
    pub fn not(child: Expression) -> Self {
        Self::node(Operator::Not, vec![child])
    }

    /// A gate node.
    ///
    /// # Panics
    /// Panics if `children` violates the operator's arity or `operator`
    /// is `Value`. Use [`try_gate`](Self::try_gate) for a fallible version.
    pub fn gate(operator: Operator, children: Vec<Expression>) -> Self {
        match Self::try_gate(operator, children) {
            Ok(expr) => expr,
            Err(err) => panic!("invalid gate: {err}"),
        }
    }

    /// A gate node, checking the arity table.
    pub fn try_gate(operator: Operator, children: Vec<Expression>) -> Result<Self, ExprError> {
        if operator == Operator::Value {
            return Err(ExprError::NotAGate);
        }
        let arity = operator.arity();
        if !arity.admits(children.len()) {
            return Err(ExprError::ArityViolation {
                operator,
                expected: arity,
                actual: children.len(),
            });
        }
        Ok(Self::node(operator, children))
    }

    /// Builds a gate whose arity the caller has already established.
    pub(crate) fn node(operator: Operator, children: Vec<Expression>) -> Self {
        debug_assert!(operator != Operator::Value);
        debug_assert!(
            operator.arity().admits(children.len()),
            "{operator} given {} children",
            children.len()
        );
        Self {
            operator,
            input: 0,
            children,
        }
    }

    /// The node's operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The input slot of a leaf, `None` for gates.
    pub fn input(&self) -> Option<usize> {
        (self.operator == Operator::Value).then_some(self.input)
    }

    /// The node's children, empty for leaves.
    pub fn children(&self) -> &[Expression] {
        &self.children
    }

    /// Takes ownership of the children, dropping the node.
    pub fn into_children(self) -> Vec<Expression> {
        self.children
    }

    /// Whether the node is a `Value` leaf.
    pub fn is_leaf(&self) -> bool {
        self.operator == Operator::Value
    }

    /// Evaluates the expression against one input vector.
    ///
    /// `And`/`Or` families short-circuit. The tree is never modified.
    ///
    /// # Panics
    /// Panics if a leaf's input index is out of range for `inputs`.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        match self.operator {
            Operator::Value => match inputs.get(self.input) {
                Some(&bit) => bit,
                None => panic!(
                    "input index {} out of range for {} inputs in {self}",
                    self.input,
                    inputs.len()
                ),
            },
            Operator::Not => !self.children[0].evaluate(inputs),
            Operator::And => self.children.iter().all(|c| c.evaluate(inputs)),
            Operator::Nand => !self.children.iter().all(|c| c.evaluate(inputs)),
            Operator::Or => self.children.iter().any(|c| c.evaluate(inputs)),
            Operator::Nor => !self.children.iter().any(|c| c.evaluate(inputs)),
            Operator::Xor => self.children[0].evaluate(inputs) != self.children[1].evaluate(inputs),
            Operator::Nxor => {
                self.children[0].evaluate(inputs) == self.children[1].evaluate(inputs)
            }
        }
    }

    /// Node count: 1 for a leaf, 1 + the children's complexity otherwise.
    pub fn complexity(&self) -> usize {
        1 + self.children.iter().map(Expression::complexity).sum::<usize>()
    }

    /// Number of levels: 1 for a leaf.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Expression::depth)
            .max()
            .unwrap_or(0)
    }

    /// Checks every node against the arity table and every leaf against
    /// `input_arity`.
    ///
    /// Variadic gates are capped at `input_arity` children.
    pub fn validate(&self, input_arity: usize) -> Result<(), ExprError> {
        if self.is_leaf() {
            if self.input >= input_arity {
                return Err(ExprError::InputOutOfRange {
                    index: self.input,
                    input_arity,
                });
            }
            return Ok(());
        }

        let arity = self.operator.arity();
        let capped = Arity {
            min: arity.min,
            max: Some(arity.capacity(input_arity)),
        };
        if !capped.admits(self.children.len()) {
            return Err(ExprError::ArityViolation {
                operator: self.operator,
                expected: capped,
                actual: self.children.len(),
            });
        }
        self.children
            .iter()
            .try_for_each(|child| child.validate(input_arity))
    }
}

impl fmt::Display for Expression {
    /// Renders leaves as letters `A`..`Z` (`#26` and up beyond that) and
    /// gates as `NAME(child,child,...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            return match u8::try_from(self.input) {
                Ok(i) if i < 26 => write!(f, "{}", char::from(b'A' + i)),
                _ => write!(f, "#{}", self.input),
            };
        }

        write!(f, "{}(", self.operator)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
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

    fn truth_table(e: &Expression) -> Vec<bool> {
        [[false, false], [false, true], [true, false], [true, true]]
            .iter()
            .map(|row| e.evaluate(row))
            .collect()
    }

    #[test]
    fn test_arity_table() {
        assert_eq!(Operator::Value.arity(), Arity { min: 0, max: Some(0) });
        assert_eq!(Operator::Not.arity(), Arity { min: 1, max: Some(1) });
        assert_eq!(Operator::Xor.arity(), Arity { min: 2, max: Some(2) });
        assert_eq!(Operator::Nxor.arity(), Arity { min: 2, max: Some(2) });
        for op in Operator::VARIADIC {
            assert_eq!(op.arity(), Arity { min: 1, max: None });
            assert!(op.is_variadic());
        }
    }

    #[test]
    fn test_capacity() {
        assert_eq!(Operator::And.arity().capacity(5), 5);
        assert_eq!(Operator::And.arity().capacity(0), 1);
        assert_eq!(Operator::Xor.arity().capacity(1), 2);
        assert_eq!(Operator::Not.arity().capacity(8), 1);
    }

    #[test]
    fn test_evaluate_gates() {
        let (a, b) = (v(0), v(1));
        assert_eq!(truth_table(&g(Operator::And, vec![a.clone(), b.clone()])), [false, false, false, true]);
        assert_eq!(truth_table(&g(Operator::Or, vec![a.clone(), b.clone()])), [false, true, true, true]);
        assert_eq!(truth_table(&g(Operator::Nand, vec![a.clone(), b.clone()])), [true, true, true, false]);
        assert_eq!(truth_table(&g(Operator::Nor, vec![a.clone(), b.clone()])), [true, false, false, false]);
        assert_eq!(truth_table(&g(Operator::Xor, vec![a.clone(), b.clone()])), [false, true, true, false]);
        assert_eq!(truth_table(&g(Operator::Nxor, vec![a.clone(), b.clone()])), [true, false, false, true]);
        assert_eq!(truth_table(&Expression::not(a)), [true, true, false, false]);
        assert_eq!(truth_table(&b), [false, true, false, true]);
    }

    #[test]
    fn test_evaluate_variadic_three_children() {
        let e = g(Operator::And, vec![v(0), v(1), v(2)]);
        assert!(e.evaluate(&[true, true, true]));
        assert!(!e.evaluate(&[true, false, true]));

        let e = g(Operator::Nor, vec![v(0), v(1), v(2)]);
        assert!(e.evaluate(&[false, false, false]));
        assert!(!e.evaluate(&[false, false, true]));
    }

    #[test]
    #[should_panic(expected = "input index 3 out of range")]
    fn test_evaluate_out_of_range_panics() {
        v(3).evaluate(&[true, false]);
    }

    #[test]
    fn test_complexity_and_depth() {
        let e = g(
            Operator::Or,
            vec![v(0), Expression::not(g(Operator::Xor, vec![v(1), v(2)]))],
        );
        assert_eq!(e.complexity(), 6);
        assert_eq!(e.depth(), 4);
        assert_eq!(v(0).complexity(), 1);
        assert_eq!(v(0).depth(), 1);
    }

    #[test]
    fn test_display() {
        let e = g(
            Operator::Nand,
            vec![v(0), v(25), v(26), g(Operator::Nxor, vec![v(2), v(3)])],
        );
        assert_eq!(e.to_string(), "NAND(A,Z,#26,NXOR(C,D))");
    }

    #[test]
    fn test_try_gate_rejects_bad_arity() {
        assert_eq!(
            Expression::try_gate(Operator::Xor, vec![v(0)]),
            Err(ExprError::ArityViolation {
                operator: Operator::Xor,
                expected: Operator::Xor.arity(),
                actual: 1,
            })
        );
        assert!(Expression::try_gate(Operator::Not, vec![v(0), v(1)]).is_err());
        assert!(Expression::try_gate(Operator::And, vec![]).is_err());
        assert_eq!(
            Expression::try_gate(Operator::Value, vec![]),
            Err(ExprError::NotAGate)
        );
    }

    #[test]
    #[should_panic(expected = "invalid gate")]
    fn test_gate_panics_on_bad_arity() {
        g(Operator::Nxor, vec![v(0), v(1), v(2)]);
    }

    #[test]
    fn test_input_accessor() {
        assert_eq!(v(4).input(), Some(4));
        assert_eq!(Expression::not(v(4)).input(), None);
    }

    #[test]
    fn test_validate() {
        let e = g(Operator::And, vec![v(0), v(1)]);
        assert!(e.validate(2).is_ok());
        assert_eq!(
            e.validate(1),
            Err(ExprError::ArityViolation {
                operator: Operator::And,
                expected: Arity { min: 1, max: Some(1) },
                actual: 2,
            })
        );

        let e = Expression::not(v(5));
        assert_eq!(
            e.validate(3),
            Err(ExprError::InputOutOfRange {
                index: 5,
                input_arity: 3
            })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = Expression::try_gate(Operator::And, vec![]).unwrap_err();
        assert_eq!(err.to_string(), "AND expects at least 1 children, got 0");
        let err = Expression::try_gate(Operator::Xor, vec![v(0)]).unwrap_err();
        assert_eq!(err.to_string(), "XOR expects 2 children, got 1");
    }
}
