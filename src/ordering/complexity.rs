use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::assignment::Assignment;
use crate::error::Result;
use crate::fault_tree::FaultTree;
use crate::ordering::{OrderingStrategy, VariableOrder};

/// Orders basic events by the part of the tree they switch on by themselves.
///
/// Each basic event is scored by setting it, and only it, true. Every occurrence
/// of a non-basic gate that then holds contributes `max_depth - depth`, where
/// `depth` is the depth of that occurrence: gates close to the system gate weigh
/// more. A gate shared by several parents is counted once per path from the
/// root. Events are sorted by descending score; ties keep declaration order.
#[derive(Debug, Copy, Clone, Default)]
pub struct ComplexityOrdering;

impl ComplexityOrdering {
    /// Scores of all basic events, in declaration order.
    pub fn scores(tree: &FaultTree) -> Vec<BigUint> {
        let weights = occurrence_weights(tree);
        tree.basic_events()
            .iter()
            .map(|&event| {
                let values = tree.evaluate_all(&Assignment::from_true([event]));
                tree.gates()
                    .filter(|gate| !gate.is_basic() && values[gate.id().index()])
                    .map(|gate| &weights[gate.id().index()])
                    .sum::<BigUint>()
            })
            .collect()
    }
}

/// Sum of `max_depth - depth` over all occurrences of every gate, indexed by gate id.
///
/// Walking every root path explicitly is exponential on heavily shared trees.
/// Instead, each gate accumulates the number of paths reaching it and the sum of
/// their lengths, pushed from parents to inputs in descending id order. Both
/// grow exponentially with the depth of shared structure, hence big integers.
fn occurrence_weights(tree: &FaultTree) -> Vec<BigUint> {
    let size = tree.gates().map(|g| g.id().index() + 1).max().unwrap_or(0);
    let mut paths = vec![BigUint::zero(); size];
    let mut lengths = vec![BigUint::zero(); size];
    paths[tree.root().index()] = BigUint::one();

    for gate in tree.gates().rev() {
        let (count, length) = (paths[gate.id().index()].clone(), lengths[gate.id().index()].clone());
        if count.is_zero() {
            continue;
        }
        let extended = &length + &count;
        for &input in gate.inputs() {
            let i = input.index();
            paths[i] += &count;
            lengths[i] += &extended;
        }
    }

    // No root path is longer than `max_depth`, so the difference never underflows.
    let max_depth = BigUint::from(tree.max_depth());
    paths
        .into_iter()
        .zip(lengths)
        .map(|(count, length)| count * &max_depth - length)
        .collect()
}

impl OrderingStrategy for ComplexityOrdering {
    fn name(&self) -> &str {
        "Sub-tree complexity"
    }

    fn order(&self, tree: &FaultTree) -> Result<VariableOrder> {
        let scores = Self::scores(tree);
        let mut ranked: Vec<_> = tree.basic_events().iter().copied().zip(scores).collect();
        // Stable, so ties stay in declaration order.
        ranked.sort_by(|(_, x), (_, y)| y.cmp(x));
        debug!(
            "scores: {:?}",
            ranked
                .iter()
                .map(|(e, s)| (tree.gate(*e).name(), s.to_string()))
                .collect::<Vec<_>>()
        );
        VariableOrder::new(tree, ranked.into_iter().map(|(e, _)| e).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::fault_tree::FaultTreeBuilder;
    use crate::ordering::tests::example;
    use crate::types::GateId;

    fn big(scores: &[u64]) -> Vec<BigUint> {
        scores.iter().map(|&s| BigUint::from(s)).collect()
    }

    #[test]
    fn test_scores() {
        // Only C switches the system gate on by itself.
        let tree = example();
        assert_eq!(ComplexityOrdering::scores(&tree), big(&[0, 0, 2]));
        let order = ComplexityOrdering.order(&tree).unwrap();
        assert_eq!(order.names(&tree), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_shared_gate_counts_every_occurrence() {
        // SYSTEM = OR(G, H), H = AND(G, X), G = OR(A, B).
        // G occurs at depths 1 and 2, the maximum depth is 3.
        let mut builder = FaultTreeBuilder::new();
        let x = builder.basic_event_str("X", "0.5").unwrap();
        let a = builder.basic_event_str("A", "0.5").unwrap();
        let b = builder.basic_event_str("B", "0.5").unwrap();
        let g = builder.or("G", &[a, b]).unwrap();
        let h = builder.and("H", &[g, x]).unwrap();
        let system = builder.or("SYSTEM", &[g, h]).unwrap();
        let tree = builder.build(system).unwrap();

        // A alone: SYSTEM (3) + G at depth 1 (2) + G at depth 2 (1).
        assert_eq!(ComplexityOrdering::scores(&tree), big(&[0, 6, 6]));
        let order = ComplexityOrdering.order(&tree).unwrap();
        assert_eq!(order.names(&tree), vec!["A", "B", "X"]);
    }

    #[test]
    fn test_non_monotone_gates() {
        // SYSTEM = AND(NOT(A), B): with only B true, NOT(A) and SYSTEM both hold.
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "0.5").unwrap();
        let b = builder.basic_event_str("B", "0.5").unwrap();
        let not_a = builder.not("NOT_A", a).unwrap();
        let system = builder.and("SYSTEM", &[not_a, b]).unwrap();
        let tree = builder.build(system).unwrap();

        assert_eq!(ComplexityOrdering::scores(&tree), big(&[0, 3]));
    }

    #[test]
    fn test_deep_sharing_keeps_scores_exact() {
        // Level i: X_i = OR(X_{i-1}, Y_{i-1}), Y_i = AND(X_{i-1}, Y_{i-1}), with
        // X_0 = A and Y_0 = B. The number of root paths doubles at every level.
        let levels = 150;
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "0.5").unwrap();
        let b = builder.basic_event_str("B", "0.5").unwrap();
        let c = builder.basic_event_str("C", "0.5").unwrap();
        let (mut x, mut y): (GateId, GateId) = (a, b);
        for i in 1..=levels {
            let next_x = builder.or(format!("X{}", i), &[x, y]).unwrap();
            if i < levels {
                y = builder.and(format!("Y{}", i), &[x, y]).unwrap();
            }
            x = next_x;
        }
        let system = builder.or("SYSTEM", &[x, c]).unwrap();
        let tree = builder.build(system).unwrap();
        assert_eq!(tree.max_depth(), levels + 1);

        let scores = ComplexityOrdering::scores(&tree);
        let expected: BigUint = "1427247692705959881058285969449495136382746774".parse().unwrap();
        assert!(expected > BigUint::from(u128::MAX));
        assert_eq!(scores[0], expected);
        assert_eq!(scores[1], expected);
        // C only switches on SYSTEM.
        assert_eq!(scores[2], BigUint::from(levels as u64 + 1));

        let order = ComplexityOrdering.order(&tree).unwrap();
        assert_eq!(order.names(&tree), vec!["A", "B", "C"]);
    }
}
