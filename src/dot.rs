//! Diagram and fault tree to DOT (Graphviz) conversion.
//!
//! # DOT Format
//!
//! Diagrams are rendered as follows:
//! - **Terminal nodes** (0 and 1) are rendered once each, as squares at the bottom (sink rank)
//! - **Decision nodes** are labelled with the name of their basic event and
//!   grouped by event, so that all decisions on one event share a rank
//! - **Edges**:
//!   - Solid lines lead to the branch where the event occurs (high)
//!   - Dashed lines lead to the branch where it does not (low)
//! - **The root** is marked by a rectangle at the top (source rank), labelled with the tree name
//!
//! Fault trees are rendered as their gate graph: gates as boxes labelled with
//! their name and kind, basic events as circles labelled with their name and
//! probability. A shared gate is rendered once.
//!
//! # Examples
//!
//! ```
//! use fault_tree_bdd::construct::construct;
//! use fault_tree_bdd::fault_tree::FaultTreeBuilder;
//! use fault_tree_bdd::ordering::{NaturalOrdering, OrderingStrategy};
//!
//! let mut builder = FaultTreeBuilder::new();
//! let a = builder.basic_event_str("A", "0.1").unwrap();
//! let b = builder.basic_event_str("B", "0.2").unwrap();
//! let system = builder.and("SYSTEM", &[a, b]).unwrap();
//! let tree = builder.build(system).unwrap();
//!
//! let order = NaturalOrdering.order(&tree).unwrap();
//! let diagram = construct(&tree, &order, true).unwrap();
//! let dot = diagram.to_dot(&tree).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.contains("label=\"A\""));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::diagram::Diagram;
use crate::fault_tree::FaultTree;
use crate::gate::GateKind;
use crate::node::Node;
use crate::types::{GateId, NodeId};

/// Configuration options for DOT output generation.
///
/// ```
/// use fault_tree_bdd::dot::DotConfig;
///
/// let config = DotConfig {
///     node_shape: "ellipse",
///     show_probabilities: false,
///     ..DotConfig::default()
/// };
/// # let _ = config;
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for decision nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for terminal nodes (default: "square")
    pub terminal_shape: &'static str,
    /// Shape for the root marker (default: "rect")
    pub root_shape: &'static str,
    /// Style for high edges (default: "solid")
    pub high_edge_style: &'static str,
    /// Style for low edges (default: "dashed")
    pub low_edge_style: &'static str,
    /// Shape for fault tree gates (default: "box")
    pub gate_shape: &'static str,
    /// Shape for fault tree basic events (default: "circle")
    pub event_shape: &'static str,
    /// Whether basic events show their probability (default: true)
    pub show_probabilities: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "square",
            root_shape: "rect",
            high_edge_style: "solid",
            low_edge_style: "dashed",
            gate_shape: "box",
            event_shape: "circle",
            show_probabilities: true,
        }
    }
}

/// Escapes a name for use inside a quoted DOT label.
fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

/// DOT key of a diagram node. Terminals of the same value share one key.
fn node_key(diagram: &Diagram, id: NodeId) -> String {
    match diagram.node(id) {
        Node::Terminal(value) => format!("t{}", u8::from(*value)),
        Node::Decision { .. } => format!("n{}", id.index()),
    }
}

impl Diagram {
    /// Converts the diagram to DOT format, naming events after the gates of `tree`.
    pub fn to_dot(&self, tree: &FaultTree) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(tree, &DotConfig::default())
    }

    /// Converts the diagram to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, tree: &FaultTree, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        // Terminal nodes (0 and 1)
        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "t0 [shape={}, label=\"0\"];", config.terminal_shape)?;
        writeln!(dot, "t1 [shape={}, label=\"1\"];", config.terminal_shape)?;
        writeln!(dot, "}}")?;

        // Group decision nodes by event, for the layout
        let mut levels = BTreeMap::<GateId, Vec<NodeId>>::new();
        for (id, node) in self.nodes() {
            if let Some(event) = node.event() {
                levels.entry(event).or_default().push(id);
            }
        }
        for (&event, ids) in levels.iter() {
            let label = match tree.get_gate(event) {
                Some(gate) => escape(gate.name()),
                None => event.to_string(),
            };
            writeln!(dot, "{{ rank=same")?;
            for &id in ids.iter() {
                writeln!(dot, "{} [label=\"{}\"];", node_key(self, id), label)?;
            }
            writeln!(dot, "}}")?;
        }

        for (id, node) in self.nodes() {
            if let Node::Decision { high, low, .. } = *node {
                let key = node_key(self, id);
                writeln!(dot, "{} -- {} [style={}];", key, node_key(self, high), config.high_edge_style)?;
                writeln!(dot, "{} -- {} [style={}];", key, node_key(self, low), config.low_edge_style)?;
            }
        }

        writeln!(dot, "{{ rank=source")?;
        writeln!(dot, "r [shape={}, label=\"{}\"];", config.root_shape, escape(tree.name()))?;
        writeln!(dot, "}}")?;
        writeln!(dot, "r -- {};", node_key(self, self.root()))?;

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

impl FaultTree {
    /// Converts the gate graph to DOT format.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the gate graph to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}];", config.gate_shape)?;

        for gate in self.gates() {
            let name = escape(gate.name());
            match gate.kind() {
                GateKind::Basic(p) if config.show_probabilities => {
                    writeln!(dot, "{} [shape={}, label=\"{}\\n{}\"];", gate.id(), config.event_shape, name, p)?;
                }
                GateKind::Basic(_) => {
                    writeln!(dot, "{} [shape={}, label=\"{}\"];", gate.id(), config.event_shape, name)?;
                }
                kind => {
                    writeln!(dot, "{} [label=\"{}\\n{}\"];", gate.id(), name, kind)?;
                }
            }
        }

        for gate in self.gates().rev() {
            for input in gate.inputs() {
                writeln!(dot, "{} -- {};", gate.id(), input)?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
