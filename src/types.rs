//! Type-safe indices for gates and diagram nodes.
//!
//! Gates live in the arena of their [`FaultTree`][crate::fault_tree::FaultTree] and
//! nodes live in the arena of their [`Diagram`][crate::diagram::Diagram]. Both are
//! addressed by plain indices wrapped in newtypes, so a gate index can never be
//! passed where a node index is expected.
use std::fmt;

/// Index of a gate in its fault tree.
///
/// Gate ids are assigned in creation order by
/// [`FaultTreeBuilder`][crate::fault_tree::FaultTreeBuilder] and are never reused
/// within a tree. A basic event is identified by the id of its gate, so `GateId`
/// doubles as the key of a decision variable.
///
/// # Invariants
///
/// - The inputs of a gate always have smaller ids than the gate itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GateId(u32);

impl GateId {
    pub const fn new(index: u32) -> Self {
        GateId(index)
    }

    /// Returns the raw index as a `usize`, suitable for indexing the arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl From<GateId> for u32 {
    fn from(id: GateId) -> Self {
        id.0
    }
}

/// Index of a node in its diagram.
///
/// Node ids are stable for the lifetime of the diagram and are used as graph keys
/// when rendering. They carry no meaning across diagrams: the minimiser assigns
/// fresh ids to the nodes it creates.
///
/// # Invariants
///
/// - Both children of a decision node have smaller ids than the node itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
