use crate::error::Result;
use crate::fault_tree::FaultTree;
use crate::ordering::{OrderingStrategy, VariableOrder};
use crate::types::GateId;

#[derive(Debug, Clone)]
enum Events {
    Ids(Vec<GateId>),
    Names(Vec<String>),
}

/// Decides basic events in a fixed, caller-supplied order.
///
/// The order is checked against the tree when [`order`][OrderingStrategy::order]
/// is called: anything that is not a permutation of the tree's basic events is
/// rejected.
#[derive(Debug, Clone)]
pub struct ManualOrdering {
    events: Events,
}

impl ManualOrdering {
    pub fn new(events: Vec<GateId>) -> Self {
        Self {
            events: Events::Ids(events),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: Events::Names(names.into_iter().map(Into::into).collect()),
        }
    }
}

impl OrderingStrategy for ManualOrdering {
    fn name(&self) -> &str {
        "Manual"
    }

    fn order(&self, tree: &FaultTree) -> Result<VariableOrder> {
        match &self.events {
            Events::Ids(ids) => VariableOrder::new(tree, ids.clone()),
            Events::Names(names) => VariableOrder::from_names(tree, names),
        }
    }
}
