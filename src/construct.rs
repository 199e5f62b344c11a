//! Diagram construction by Shannon decomposition.
//!
//! Starting from the all-false assignment, the constructor decides the basic
//! events one at a time in the given order. At every step it evaluates the
//! system gate under the current partial assignment (undecided events read as
//! false). If there is nothing left to decide, or the system gate already holds
//! and stopping early is allowed, the branch ends in a terminal holding the
//! value of the system gate. Otherwise a decision node is created on the next
//! event, with the branch where it occurs as `high` and the branch where it does
//! not as `low`.
//!
//! The decomposition is depth-first, `high` branch first, and runs on an
//! explicit work stack, so deep orders cannot overflow the call stack. Nodes
//! are allocated in post-order. The result is tree-shaped: no node is shared.
//!
//! # Examples
//!
//! ```
//! use fault_tree_bdd::construct::construct;
//! use fault_tree_bdd::fault_tree::FaultTreeBuilder;
//! use fault_tree_bdd::ordering::{NaturalOrdering, OrderingStrategy};
//!
//! let mut builder = FaultTreeBuilder::new();
//! let a = builder.basic_event_str("A", "1/2").unwrap();
//! let b = builder.basic_event_str("B", "1/2").unwrap();
//! let c = builder.basic_event_str("C", "1/4").unwrap();
//! let ab = builder.and("AB", &[a, b]).unwrap();
//! let system = builder.or("SYSTEM", &[ab, c]).unwrap();
//! let tree = builder.build(system).unwrap();
//!
//! let order = NaturalOrdering.order(&tree).unwrap();
//! let diagram = construct(&tree, &order, true).unwrap();
//! assert_eq!(diagram.probability(&tree).unwrap().to_string(), "7/16");
//! ```

use log::{debug, info};

use crate::assignment::Assignment;
use crate::diagram::{Diagram, DiagramBuilder};
use crate::error::Result;
use crate::fault_tree::FaultTree;
use crate::minimise::minimise;
use crate::ordering::VariableOrder;
use crate::types::GateId;

/// When a branch may stop as soon as the system gate holds.
///
/// Stopping early leaves the remaining events undecided (false) on that branch.
/// This is only sound when setting more events true can never make the system
/// gate fail again, that is, when the tree is monotone.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum EarlyExit {
    /// Stop early only if the tree is monotone (no NOT, no multi-input XOR).
    #[default]
    Auto,
    /// Always stop as soon as the system gate holds.
    Always,
    /// Always decide every event.
    Never,
}

impl EarlyExit {
    fn enabled(self, tree: &FaultTree) -> bool {
        match self {
            EarlyExit::Auto => tree.is_monotone(),
            EarlyExit::Always => true,
            EarlyExit::Never => false,
        }
    }
}

/// Configuration for [`construct_with_config`].
#[derive(Debug, Clone)]
pub struct ConstructionConfig {
    /// Pass the result through the minimiser (default: true).
    pub minimise: bool,
    pub early_exit: EarlyExit,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            minimise: true,
            early_exit: EarlyExit::default(),
        }
    }
}

impl ConstructionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minimise(mut self, minimise: bool) -> Self {
        self.minimise = minimise;
        self
    }

    pub fn with_early_exit(mut self, early_exit: EarlyExit) -> Self {
        self.early_exit = early_exit;
        self
    }
}

enum Task {
    /// Decide the events from `position` on, starting from `assignment`.
    Expand { position: usize, assignment: Assignment },
    /// Pop the `low` and `high` results and join them in a decision on `event`.
    Assemble { event: GateId },
}

/// Builds the diagram of `tree` for the given order, optionally minimised.
pub fn construct(tree: &FaultTree, order: &VariableOrder, minimise: bool) -> Result<Diagram> {
    construct_with_config(tree, order, &ConstructionConfig::default().with_minimise(minimise))
}

/// Builds the diagram of `tree` for the given order.
///
/// The order is checked to be a permutation of the tree's basic events before
/// anything is built.
pub fn construct_with_config(tree: &FaultTree, order: &VariableOrder, config: &ConstructionConfig) -> Result<Diagram> {
    order.validate(tree)?;

    let early_exit = config.early_exit.enabled(tree);
    let order = order.as_slice();
    debug!(
        "constructing diagram of {:?} over {} events (early exit: {})",
        tree.name(),
        order.len(),
        early_exit
    );

    let mut builder = DiagramBuilder::new();
    let mut results = Vec::new();
    let mut stack = vec![Task::Expand {
        position: 0,
        assignment: tree.false_state(),
    }];

    while let Some(task) = stack.pop() {
        match task {
            Task::Expand { position, assignment } => {
                let holds = tree.evaluate(&assignment);
                if (holds && early_exit) || position == order.len() {
                    results.push(builder.terminal(holds));
                } else {
                    let event = order[position];
                    let high = assignment.with(event, true);
                    stack.push(Task::Assemble { event });
                    stack.push(Task::Expand {
                        position: position + 1,
                        assignment,
                    });
                    stack.push(Task::Expand {
                        position: position + 1,
                        assignment: high,
                    });
                }
            }
            Task::Assemble { event } => {
                let (Some(low), Some(high)) = (results.pop(), results.pop()) else {
                    unreachable!("both branches are built before they are assembled");
                };
                results.push(builder.decision(event, high, low));
            }
        }
    }

    let Some(root) = results.pop() else {
        unreachable!("the initial task always yields a node");
    };
    let diagram = builder.build(root);
    info!("constructed diagram of {:?} with {} nodes", tree.name(), diagram.len());

    if config.minimise {
        Ok(minimise(&diagram))
    } else {
        Ok(diagram)
    }
}
