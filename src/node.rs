use crate::types::{GateId, NodeId};

/// A node of a [`Diagram`][crate::diagram::Diagram].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Node {
    /// A leaf holding the value of the system gate.
    Terminal(bool),
    /// A decision on a basic event.
    ///
    /// `high` is followed when the event occurs (is true), `low` when it does not.
    Decision { event: GateId, high: NodeId, low: NodeId },
}

impl Node {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal(_))
    }

    /// Value of a terminal, `None` for a decision node.
    pub fn value(&self) -> Option<bool> {
        match *self {
            Node::Terminal(value) => Some(value),
            Node::Decision { .. } => None,
        }
    }

    /// Basic event decided by this node, `None` for a terminal.
    pub fn event(&self) -> Option<GateId> {
        match *self {
            Node::Terminal(_) => None,
            Node::Decision { event, .. } => Some(event),
        }
    }

    pub fn high(&self) -> Option<NodeId> {
        match *self {
            Node::Terminal(_) => None,
            Node::Decision { high, .. } => Some(high),
        }
    }

    pub fn low(&self) -> Option<NodeId> {
        match *self {
            Node::Terminal(_) => None,
            Node::Decision { low, .. } => Some(low),
        }
    }
}

/// Set of terminal values reachable from a node: a subset of `{false, true}`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct LeafSet(u8);

impl LeafSet {
    const FALSE: u8 = 0b01;
    const TRUE: u8 = 0b10;

    pub fn empty() -> Self {
        LeafSet(0)
    }

    pub fn of(value: bool) -> Self {
        LeafSet(if value { Self::TRUE } else { Self::FALSE })
    }

    pub fn union(self, other: Self) -> Self {
        LeafSet(self.0 | other.0)
    }

    pub fn contains(self, value: bool) -> bool {
        self.0 & Self::of(value).0 != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The only value in the set, if there is exactly one.
    pub fn single(self) -> Option<bool> {
        match self.0 {
            Self::FALSE => Some(false),
            Self::TRUE => Some(true),
            _ => None,
        }
    }
}
