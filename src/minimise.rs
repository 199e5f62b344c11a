//! Collapsing constant subdiagrams.
//!
//! [`minimise`] rebuilds a diagram, replacing every subdiagram that can only
//! reach one terminal value by a single terminal of that value. Decision nodes
//! that can still reach both values are kept, on the same event, with minimised
//! children.
//!
//! This is not a full reduction to a canonical diagram: isomorphic subdiagrams
//! are not merged, and a decision whose two branches are equal but not constant
//! is kept.

use log::{debug, info};

use crate::diagram::{Diagram, DiagramBuilder};
use crate::node::Node;
use crate::types::{GateId, NodeId};

enum Task {
    Visit(NodeId),
    Assemble(GateId),
}

/// Returns the minimised copy of `diagram`, which is left untouched.
///
/// Nodes are allocated in the same order as by the constructor (post-order,
/// `high` branch first), so minimising an already minimised diagram yields an
/// identical diagram.
pub fn minimise(diagram: &Diagram) -> Diagram {
    let leaf_sets = diagram.leaf_sets();

    let mut builder = DiagramBuilder::new();
    let mut results = Vec::new();
    let mut stack = vec![Task::Visit(diagram.root())];
    let mut collapsed = 0usize;

    while let Some(task) = stack.pop() {
        match task {
            Task::Visit(id) => match (leaf_sets[id.index()].single(), *diagram.node(id)) {
                (Some(value), node) => {
                    if !node.is_terminal() {
                        collapsed += 1;
                        debug!("collapsing {} to terminal {}", id, value);
                    }
                    results.push(builder.terminal(value));
                }
                (None, Node::Decision { event, high, low }) => {
                    stack.push(Task::Assemble(event));
                    stack.push(Task::Visit(low));
                    stack.push(Task::Visit(high));
                }
                (None, Node::Terminal(_)) => unreachable!("a terminal reaches exactly one value"),
            },
            Task::Assemble(event) => {
                let (Some(low), Some(high)) = (results.pop(), results.pop()) else {
                    unreachable!("both branches are rebuilt before they are assembled");
                };
                results.push(builder.decision(event, high, low));
            }
        }
    }

    let Some(root) = results.pop() else {
        unreachable!("visiting the root always yields a node");
    };
    let minimised = builder.build(root);
    info!(
        "minimised diagram from {} to {} nodes ({} subdiagrams collapsed)",
        diagram.len(),
        minimised.len(),
        collapsed
    );
    minimised
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::analysis::analyse;
    use crate::construct::{construct, construct_with_config, ConstructionConfig, EarlyExit};
    use crate::fault_tree::{FaultTree, FaultTreeBuilder};
    use crate::ordering::{NaturalOrdering, OrderingStrategy};

    fn example() -> FaultTree {
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "1/2").unwrap();
        let b = builder.basic_event_str("B", "1/2").unwrap();
        let c = builder.basic_event_str("C", "1/4").unwrap();
        let ab = builder.and("AB", &[a, b]).unwrap();
        let system = builder.or("SYSTEM", &[ab, c]).unwrap();
        builder.build(system).unwrap()
    }

    #[test]
    fn test_collapses_constant_subdiagrams() {
        let mut builder = DiagramBuilder::new();
        let t1 = builder.terminal(true);
        let t2 = builder.terminal(true);
        let inner = builder.decision(GateId::new(1), t1, t2);
        let f = builder.terminal(false);
        let root = builder.decision(GateId::new(0), inner, f);
        let diagram = builder.build(root);

        let minimised = minimise(&diagram);
        assert_eq!(minimised.len(), 3);
        assert_eq!(
            *minimised.node(minimised.root()),
            Node::Decision {
                event: GateId::new(0),
                high: NodeId::new(0),
                low: NodeId::new(1),
            }
        );
        assert_eq!(*minimised.node(NodeId::new(0)), Node::Terminal(true));
        assert_eq!(*minimised.node(NodeId::new(1)), Node::Terminal(false));
        // The input is left alone.
        assert_eq!(diagram.len(), 5);
    }

    #[test]
    fn test_constant_diagram() {
        let mut builder = DiagramBuilder::new();
        let f1 = builder.terminal(false);
        let f2 = builder.terminal(false);
        let root = builder.decision(GateId::new(0), f1, f2);
        let minimised = minimise(&builder.build(root));
        assert_eq!(minimised.as_constant(), Some(false));
        assert_eq!(minimised.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let tree = example();
        let order = NaturalOrdering.order(&tree).unwrap();
        let config = ConstructionConfig::new()
            .with_minimise(false)
            .with_early_exit(EarlyExit::Never);
        let raw = construct_with_config(&tree, &order, &config).unwrap();

        let once = minimise(&raw);
        let twice = minimise(&once);
        assert_eq!(once, twice);
        assert!(once.len() < raw.len());
    }

    #[test]
    fn test_preserves_probability_and_does_not_grow() {
        let tree = example();
        let order = NaturalOrdering.order(&tree).unwrap();
        let raw = construct(&tree, &order, false).unwrap();
        let minimised = minimise(&raw);

        assert!(analyse(&minimised).nodes <= analyse(&raw).nodes);
        assert_eq!(minimised.probability(&tree).unwrap(), raw.probability(&tree).unwrap());
    }
}
