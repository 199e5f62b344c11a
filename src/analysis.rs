//! Size statistics of diagrams.

use std::fmt;

use log::debug;

use crate::bitset::BitSet;
use crate::diagram::Diagram;
use crate::node::{LeafSet, Node};

/// Size statistics reported by [`analyse`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct DiagramStats {
    /// Distinct decision nodes reachable from the root.
    pub internal_nodes: usize,
    /// `internal_nodes + 2`: the two terminal values are always counted,
    /// whether or not they are reachable.
    pub nodes: usize,
    /// `max(0, 2 * nodes - 4)`.
    pub edges: usize,
    /// Distinct edges leaving reachable decision nodes. An edge is a pair of a
    /// node and one of its children, so a decision whose branches coincide
    /// contributes a single edge.
    pub traversed_edges: usize,
    /// Number of distinct terminal values reachable from the root (1 or 2).
    pub reachable_terminals: usize,
}

/// Counts the nodes and edges of a diagram.
///
/// Shared nodes are counted once. The traversal is depth-first on an explicit
/// stack and never enters a node twice.
pub fn analyse(diagram: &Diagram) -> DiagramStats {
    let mut visited = BitSet::new(diagram.len());
    let mut stack = vec![diagram.root()];
    let mut internal_nodes = 0usize;
    let mut traversed_edges = 0usize;
    let mut terminals = LeafSet::empty();

    while let Some(id) = stack.pop() {
        if !visited.insert(id.index()) {
            continue;
        }
        match *diagram.node(id) {
            Node::Terminal(value) => terminals = terminals.union(LeafSet::of(value)),
            Node::Decision { high, low, .. } => {
                internal_nodes += 1;
                traversed_edges += if high == low { 1 } else { 2 };
                stack.push(low);
                stack.push(high);
            }
        }
    }

    let nodes = internal_nodes + 2;
    let stats = DiagramStats {
        internal_nodes,
        nodes,
        edges: (2 * nodes).saturating_sub(4),
        traversed_edges,
        reachable_terminals: terminals.len(),
    };
    debug!("{:?}", stats);
    stats
}

impl fmt::Display for DiagramStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes ({} internal), {} edges ({} traversed), {} reachable terminal values",
            self.nodes, self.internal_nodes, self.edges, self.traversed_edges, self.reachable_terminals
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::diagram::DiagramBuilder;
    use crate::types::GateId;

    #[test]
    fn test_terminal_only() {
        let mut builder = DiagramBuilder::new();
        let root = builder.terminal(true);
        let stats = analyse(&builder.build(root));
        assert_eq!(stats.internal_nodes, 0);
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.edges, 0);
        assert_eq!(stats.traversed_edges, 0);
        assert_eq!(stats.reachable_terminals, 1);
    }

    #[test]
    fn test_single_decision() {
        let mut builder = DiagramBuilder::new();
        let t = builder.terminal(true);
        let f = builder.terminal(false);
        let root = builder.decision(GateId::new(0), t, f);
        let stats = analyse(&builder.build(root));
        assert_eq!((stats.nodes, stats.edges), (3, 2));
        assert_eq!(stats.traversed_edges, 2);
        assert_eq!(stats.reachable_terminals, 2);
    }

    #[test]
    fn test_shared_node_counted_once() {
        let mut builder = DiagramBuilder::new();
        let t = builder.terminal(true);
        let f = builder.terminal(false);
        let shared = builder.decision(GateId::new(1), t, f);
        let root = builder.decision(GateId::new(0), shared, shared);
        let stats = analyse(&builder.build(root));
        assert_eq!(stats.internal_nodes, 2);
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.edges, 4);
        assert_eq!(stats.traversed_edges, 3);
    }

    #[test]
    fn test_display() {
        let stats = DiagramStats {
            internal_nodes: 1,
            nodes: 3,
            edges: 2,
            traversed_edges: 2,
            reachable_terminals: 2,
        };
        assert_eq!(
            stats.to_string(),
            "3 nodes (1 internal), 2 edges (2 traversed), 2 reachable terminal values"
        );
    }
}
