//! # fault-tree-bdd: Binary Decision Diagrams for Fault Tree Analysis
//!
//! **`fault-tree-bdd`** translates fault trees into binary decision diagrams and
//! computes the exact probability that the system fails. Its main purpose is to
//! compare **variable ordering strategies**, since the order in which basic
//! events are decided governs the size of the resulting diagram.
//!
//! ## What is a fault tree?
//!
//! A fault tree describes how a system can fail. Its leaves are **basic events**
//! (component failures) with a probability each, and its inner nodes are gates
//! (AND, OR, NOT, k-out-of-n voting, XOR) combining them. The root, the
//! **system gate**, holds exactly when the system fails.
//!
//! ## Pipeline
//!
//! Fault tree → ordering strategy → constructor → raw diagram → minimiser →
//! minimised diagram → probability / statistics.
//!
//! Every step is a plain function of its inputs:
//!
//! ```rust
//! use fault_tree_bdd::fault_tree::FaultTreeBuilder;
//! use fault_tree_bdd::ordering::DepthOrdering;
//! use fault_tree_bdd::{analyse, construct, minimise, order};
//!
//! // 1. Build the fault tree: SYSTEM = OR(AND(A, B), C)
//! let mut builder = FaultTreeBuilder::new();
//! let a = builder.basic_event_str("A", "1/2").unwrap();
//! let b = builder.basic_event_str("B", "1/2").unwrap();
//! let c = builder.basic_event_str("C", "1/4").unwrap();
//! let ab = builder.and("AB", &[a, b]).unwrap();
//! let system = builder.or("SYSTEM", &[ab, c]).unwrap();
//! let tree = builder.build(system).unwrap();
//!
//! // 2. Choose an order for the basic events
//! let order = order(&tree, &DepthOrdering::default()).unwrap();
//!
//! // 3. Build the diagram and minimise it
//! let raw = construct(&tree, &order, false).unwrap();
//! let diagram = minimise(&raw);
//!
//! // 4. Exact failure probability and size
//! assert_eq!(diagram.probability(&tree).unwrap().to_string(), "7/16");
//! assert!(analyse(&diagram).nodes <= analyse(&raw).nodes);
//! ```
//!
//! ## Core Components
//!
//! - **[`fault_tree`]**: the gate graph and its arena builder.
//! - **[`ordering`]**: natural, random, manual, depth and sub-tree complexity orderings.
//! - **[`construct`][mod@construct]**: Shannon decomposition of a fault tree into a [`Diagram`][crate::diagram::Diagram].
//! - **[`minimise`][mod@minimise]**: collapsing of constant subdiagrams.
//! - **[`analysis`]**: node and edge counts.
//! - **[`galileo`]**: reader for the Galileo `.dft` format.
//! - **[`dot`]**: Graphviz export of fault trees and diagrams.
//! - **[`benchmark`]**: timing and size comparison of strategies.

pub mod analysis;
pub mod assignment;
pub mod benchmark;
pub mod bitset;
pub mod construct;
pub mod diagram;
pub mod dot;
pub mod error;
pub mod fault_tree;
pub mod galileo;
pub mod gate;
pub mod minimise;
pub mod node;
pub mod ordering;
pub mod probability;
pub mod types;

pub use analysis::analyse;
pub use construct::construct;
pub use error::{Error, Result};
pub use minimise::minimise;
pub use ordering::order;
