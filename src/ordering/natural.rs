use crate::error::Result;
use crate::fault_tree::FaultTree;
use crate::ordering::{OrderingStrategy, VariableOrder};

/// Decides basic events in the order they were declared.
#[derive(Debug, Copy, Clone, Default)]
pub struct NaturalOrdering;

impl OrderingStrategy for NaturalOrdering {
    fn name(&self) -> &str {
        "Natural"
    }

    fn order(&self, tree: &FaultTree) -> Result<VariableOrder> {
        VariableOrder::new(tree, tree.basic_events().to_vec())
    }
}
