//! Binary decision diagrams over the basic events of a fault tree.
//!
//! A [`Diagram`] owns its nodes in an arena. Nodes are only ever appended, and
//! a decision node can only refer to nodes that already exist, so both children
//! of a node always have smaller ids than the node itself and the root is the
//! last node. Forward scans over the arena therefore visit children before their
//! parents, which is how [leaf sets](Diagram::leaf_sets) and the
//! [probability](Diagram::probability) are computed without recursion.
//!
//! Diagrams are produced by [`construct`][crate::construct::construct] and
//! [`minimise`][crate::minimise::minimise] and never change afterwards.

use log::debug;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::assignment::Assignment;
use crate::error::Result;
use crate::fault_tree::FaultTree;
use crate::node::{LeafSet, Node};
use crate::probability::Probability;
use crate::types::{GateId, NodeId};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagram {
    nodes: Vec<Node>,
    root: NodeId,
}

/// Append-only node arena used while a diagram is being built.
#[derive(Debug, Default)]
pub(crate) struct DiagramBuilder {
    nodes: Vec<Node>,
}

impl DiagramBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn terminal(&mut self, value: bool) -> NodeId {
        self.push(Node::Terminal(value))
    }

    pub(crate) fn decision(&mut self, event: GateId, high: NodeId, low: NodeId) -> NodeId {
        let next = self.nodes.len();
        assert!(high.index() < next && low.index() < next, "children must exist before their parent");
        self.push(Node::Decision { event, high, low })
    }

    pub(crate) fn build(self, root: NodeId) -> Diagram {
        assert_eq!(root.index() + 1, self.nodes.len(), "root must be the last node");
        Diagram { nodes: self.nodes, root }
    }
}

impl Diagram {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this diagram.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the arena, terminals included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, children before parents.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u32), node))
    }

    /// Whether the whole diagram is a single terminal, and its value.
    pub fn as_constant(&self) -> Option<bool> {
        self.node(self.root).value()
    }

    /// Terminal values reachable from every node, indexed by node id.
    pub fn leaf_sets(&self) -> Vec<LeafSet> {
        let mut sets: Vec<LeafSet> = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.iter() {
            let set = match *node {
                Node::Terminal(value) => LeafSet::of(value),
                Node::Decision { high, low, .. } => sets[high.index()].union(sets[low.index()]),
            };
            sets.push(set);
        }
        sets
    }

    /// Follows the path selected by the assignment and returns the terminal value.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        let mut current = self.root;
        loop {
            match *self.node(current) {
                Node::Terminal(value) => return value,
                Node::Decision { event, high, low } => {
                    current = if assignment.get(event) { high } else { low };
                }
            }
        }
    }

    /// Computes the exact probability of reaching the `true` terminal, given the
    /// probabilities of the basic events of `tree`.
    ///
    /// A decision on event `e` with probability `p` has probability
    /// `P(low) * (1 - p) + P(high) * p`.
    ///
    /// Fails if the diagram decides on a gate that is not a basic event of `tree`.
    pub fn probability(&self, tree: &FaultTree) -> Result<Probability> {
        let mut values: Vec<BigRational> = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.iter() {
            let value = match *node {
                Node::Terminal(true) => BigRational::one(),
                Node::Terminal(false) => BigRational::zero(),
                Node::Decision { event, high, low } => {
                    let p = tree.probability(event)?;
                    &values[low.index()] * p.complement() + &values[high.index()] * p.value()
                }
            };
            values.push(value);
        }
        let value = values.swap_remove(self.root.index());
        debug!("probability of {:?} is {}", tree.name(), value);
        Probability::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::BigInt;

    use crate::error::Error;
    use crate::fault_tree::FaultTreeBuilder;

    fn single_event() -> (FaultTree, GateId) {
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "1/3").unwrap();
        let system = builder.or("SYSTEM", &[a]).unwrap();
        (builder.build(system).unwrap(), a)
    }

    #[test]
    fn test_builder_and_accessors() {
        let (_, a) = single_event();
        let mut builder = DiagramBuilder::new();
        let t = builder.terminal(true);
        let f = builder.terminal(false);
        let root = builder.decision(a, t, f);
        let diagram = builder.build(root);

        assert_eq!(diagram.len(), 3);
        assert_eq!(diagram.root(), NodeId::new(2));
        assert_eq!(diagram.node(root).event(), Some(a));
        assert_eq!(diagram.as_constant(), None);
        assert!(diagram.get(NodeId::new(3)).is_none());
        assert_eq!(diagram.nodes().count(), 3);
    }

    #[test]
    #[should_panic]
    fn test_builder_rejects_forward_children() {
        let mut builder = DiagramBuilder::new();
        builder.decision(GateId::new(0), NodeId::new(0), NodeId::new(1));
    }

    #[test]
    fn test_leaf_sets_and_evaluate() {
        let (_, a) = single_event();
        let mut builder = DiagramBuilder::new();
        let t = builder.terminal(true);
        let f = builder.terminal(false);
        let root = builder.decision(a, t, f);
        let diagram = builder.build(root);

        let sets = diagram.leaf_sets();
        assert_eq!(sets[t.index()], LeafSet::of(true));
        assert_eq!(sets[root.index()].len(), 2);

        assert!(diagram.evaluate(&Assignment::from_true([a])));
        assert!(!diagram.evaluate(&Assignment::all_false()));
    }

    #[test]
    fn test_probability() {
        let (tree, a) = single_event();
        let mut builder = DiagramBuilder::new();
        let t = builder.terminal(true);
        let f = builder.terminal(false);
        let root = builder.decision(a, t, f);
        let diagram = builder.build(root);

        let p = diagram.probability(&tree).unwrap();
        assert_eq!(p.value(), &BigRational::new(BigInt::from(1), BigInt::from(3)));
    }

    #[test]
    fn test_probability_of_foreign_event() {
        let (tree, _) = single_event();
        let mut builder = DiagramBuilder::new();
        let t = builder.terminal(true);
        let f = builder.terminal(false);
        let root = builder.decision(tree.root(), t, f);
        let diagram = builder.build(root);

        assert!(matches!(diagram.probability(&tree), Err(Error::NotABasicEvent(_))));
    }

    #[test]
    fn test_constant_probability() {
        let (tree, _) = single_event();
        let mut builder = DiagramBuilder::new();
        let root = builder.terminal(false);
        let diagram = builder.build(root);

        assert_eq!(diagram.as_constant(), Some(false));
        assert!(diagram.probability(&tree).unwrap().is_zero());
    }
}
