use log::debug;

use crate::bitset::BitSet;
use crate::error::Result;
use crate::fault_tree::FaultTree;
use crate::ordering::{OrderingStrategy, VariableOrder};
use crate::types::GateId;

/// Which end of the tree is decided first.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Direction {
    /// Deepest basic events first.
    #[default]
    BottomToTop,
    /// Basic events closest to the system gate first.
    TopToBottom,
}

/// Orders basic events by their minimum depth below the system gate.
///
/// Events at the same depth keep the order in which a left-to-right depth-first
/// walk from the system gate first meets them. With [`Direction::BottomToTop`]
/// the whole sequence is reversed, ties included.
#[derive(Debug, Copy, Clone, Default)]
pub struct DepthOrdering {
    pub direction: Direction,
}

impl DepthOrdering {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// Basic events in the order a left-to-right depth-first walk first meets them.
///
/// A gate seen before is not entered again: everything below it has already
/// been met.
fn discovery_order(tree: &FaultTree) -> Vec<GateId> {
    let mut visited = BitSet::new(tree.num_gates());
    let mut discovered = Vec::with_capacity(tree.num_basic_events());
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        if !visited.insert(id.index()) {
            continue;
        }
        let gate = tree.gate(id);
        if gate.is_basic() {
            discovered.push(id);
        } else {
            stack.extend(gate.inputs().iter().rev());
        }
    }
    discovered
}

impl OrderingStrategy for DepthOrdering {
    fn name(&self) -> &str {
        match self.direction {
            Direction::BottomToTop => "Depth (bottom-to-top)",
            Direction::TopToBottom => "Depth (top-to-bottom)",
        }
    }

    fn order(&self, tree: &FaultTree) -> Result<VariableOrder> {
        let mut events = discovery_order(tree);
        // Reachable events always have a depth.
        events.sort_by_key(|&e| tree.depth(e).unwrap_or(usize::MAX));
        if self.direction == Direction::BottomToTop {
            events.reverse();
        }
        debug!(
            "depths: {:?}",
            events
                .iter()
                .map(|&e| (tree.gate(e).name(), tree.depth(e)))
                .collect::<Vec<_>>()
        );
        VariableOrder::new(tree, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::fault_tree::FaultTreeBuilder;

    /// SYSTEM = OR(A, AND(B, C), D) with A, D at depth 1 and B, C at depth 2.
    fn layered() -> FaultTree {
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "0.1").unwrap();
        let b = builder.basic_event_str("B", "0.2").unwrap();
        let c = builder.basic_event_str("C", "0.3").unwrap();
        let d = builder.basic_event_str("D", "0.4").unwrap();
        let bc = builder.and("BC", &[b, c]).unwrap();
        let system = builder.or("SYSTEM", &[a, bc, d]).unwrap();
        builder.build(system).unwrap()
    }

    #[test]
    fn test_top_to_bottom() {
        let tree = layered();
        let order = DepthOrdering::new(Direction::TopToBottom).order(&tree).unwrap();
        assert_eq!(order.names(&tree), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_bottom_to_top_reverses_ties() {
        let tree = layered();
        let order = DepthOrdering::default().order(&tree).unwrap();
        assert_eq!(order.names(&tree), vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_deeper_event_first() {
        // SYSTEM = OR(A, AND(B, B2)): B is at depth 2, A at depth 1.
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "0.5").unwrap();
        let b = builder.basic_event_str("B", "0.5").unwrap();
        let b2 = builder.basic_event_str("B2", "0.5").unwrap();
        let and = builder.and("AND", &[b, b2]).unwrap();
        let system = builder.or("SYSTEM", &[a, and]).unwrap();
        let tree = builder.build(system).unwrap();

        let order = DepthOrdering::default().order(&tree).unwrap();
        let names = order.names(&tree);
        let pos = |n: &str| names.iter().position(|&x| x == n).unwrap();
        assert!(pos("B") < pos("A"));
    }

    #[test]
    fn test_shared_event_uses_minimum_depth() {
        // B occurs at depth 3 (first met) and at depth 1.
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "0.5").unwrap();
        let b = builder.basic_event_str("B", "0.5").unwrap();
        let c = builder.basic_event_str("C", "0.5").unwrap();
        let inner = builder.and("INNER", &[b, c]).unwrap();
        let mid = builder.or("MID", &[inner, a]).unwrap();
        let system = builder.or("SYSTEM", &[mid, b]).unwrap();
        let tree = builder.build(system).unwrap();

        let order = DepthOrdering::new(Direction::TopToBottom).order(&tree).unwrap();
        assert_eq!(order.names(&tree), vec!["B", "A", "C"]);
    }
}
