//! Variable ordering strategies.
//!
//! The order in which basic events are decided determines the size of the
//! diagram built from a fault tree, often dramatically. A strategy inspects a
//! tree and proposes a [`VariableOrder`]: a permutation of its basic events,
//! outermost decision first.
//!
//! Available strategies:
//!
//! - [`NaturalOrdering`]: declaration order.
//! - [`RandomOrdering`]: a shuffled declaration order, optionally seeded.
//! - [`ManualOrdering`]: a caller-supplied permutation.
//! - [`DepthOrdering`]: by distance from the system gate.
//! - [`ComplexityOrdering`]: by how much of the tree an event switches on by itself.

use log::debug;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::fault_tree::FaultTree;
use crate::types::GateId;

mod complexity;
mod depth;
mod manual;
mod natural;
mod random;

pub use complexity::ComplexityOrdering;
pub use depth::{DepthOrdering, Direction};
pub use manual::ManualOrdering;
pub use natural::NaturalOrdering;
pub use random::RandomOrdering;

/// A strategy proposing the order in which basic events are decided.
pub trait OrderingStrategy {
    /// Human-readable name, used in reports.
    fn name(&self) -> &str;

    /// Computes an order for the basic events of `tree`.
    fn order(&self, tree: &FaultTree) -> Result<VariableOrder>;
}

impl<T: OrderingStrategy + ?Sized> OrderingStrategy for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn order(&self, tree: &FaultTree) -> Result<VariableOrder> {
        (**self).order(tree)
    }
}

impl<T: OrderingStrategy + ?Sized> OrderingStrategy for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn order(&self, tree: &FaultTree) -> Result<VariableOrder> {
        (**self).order(tree)
    }
}

/// A permutation of the basic events of a fault tree.
///
/// Can only be created through [`VariableOrder::new`] (or the `from_names`
/// variant), which checks that it is a permutation of the tree's basic events.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VariableOrder(Vec<GateId>);

impl VariableOrder {
    /// Checks that `events` lists every basic event of `tree` exactly once.
    pub fn new(tree: &FaultTree, events: Vec<GateId>) -> Result<Self> {
        let order = VariableOrder(events);
        order.validate(tree)?;
        Ok(order)
    }

    /// Same as [`VariableOrder::new`], with basic events given by name.
    pub fn from_names<S: AsRef<str>>(tree: &FaultTree, names: &[S]) -> Result<Self> {
        let events = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                tree.basic_event(name)
                    .ok_or_else(|| Error::InvalidOrdering(format!("{:?} is not a basic event of the tree", name)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(tree, events)
    }

    /// Checks that this order is a permutation of the basic events of `tree`.
    ///
    /// An order is created for one tree but may be handed to another; the
    /// constructor calls this before doing any work.
    pub fn validate(&self, tree: &FaultTree) -> Result<()> {
        let mut seen = BitSet::new(tree.num_gates());
        for &event in self.0.iter() {
            if !tree.is_basic_event(event) {
                return Err(Error::InvalidOrdering(format!("{} is not a basic event of the tree", event)));
            }
            if !seen.insert(event.index()) {
                return Err(Error::InvalidOrdering(format!(
                    "{:?} occurs more than once",
                    tree.gate(event).name()
                )));
            }
        }
        if seen.len() != tree.num_basic_events() {
            let missing: Vec<&str> = tree
                .basic_events()
                .iter()
                .filter(|e| !seen.contains(e.index()))
                .map(|&e| tree.gate(e).name())
                .collect();
            return Err(Error::InvalidOrdering(format!("missing basic events {:?}", missing)));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[GateId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = GateId> + '_ {
        self.0.iter().copied()
    }

    pub fn into_inner(self) -> Vec<GateId> {
        self.0
    }

    /// Names of the ordered basic events.
    pub fn names<'a>(&'a self, tree: &'a FaultTree) -> Vec<&'a str> {
        self.0.iter().map(|&e| tree.gate(e).name()).collect()
    }
}

impl<'a> IntoIterator for &'a VariableOrder {
    type Item = &'a GateId;
    type IntoIter = std::slice::Iter<'a, GateId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Computes an order with the given strategy.
pub fn order(tree: &FaultTree, strategy: &impl OrderingStrategy) -> Result<VariableOrder> {
    let order = strategy.order(tree)?;
    debug!("{} ordering: {:?}", strategy.name(), order.names(tree));
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::fault_tree::FaultTreeBuilder;

    pub(super) fn example() -> FaultTree {
        // SYSTEM = OR(AND(A, B), C)
        let mut builder = FaultTreeBuilder::new();
        let a = builder.basic_event_str("A", "1/2").unwrap();
        let b = builder.basic_event_str("B", "1/2").unwrap();
        let c = builder.basic_event_str("C", "1/4").unwrap();
        let ab = builder.and("AB", &[a, b]).unwrap();
        let system = builder.or("SYSTEM", &[ab, c]).unwrap();
        builder.build(system).unwrap()
    }

    #[test]
    fn test_variable_order_validation() {
        let tree = example();
        let [a, b, c] = [0, 1, 2].map(GateId::new);

        assert!(VariableOrder::new(&tree, vec![c, a, b]).is_ok());
        assert!(matches!(VariableOrder::new(&tree, vec![a, b]), Err(Error::InvalidOrdering(_))));
        assert!(matches!(VariableOrder::new(&tree, vec![a, b, b]), Err(Error::InvalidOrdering(_))));
        assert!(matches!(VariableOrder::new(&tree, vec![a, b, c, a]), Err(Error::InvalidOrdering(_))));
        // AB is a gate, not a basic event.
        assert!(matches!(
            VariableOrder::new(&tree, vec![a, b, GateId::new(3)]),
            Err(Error::InvalidOrdering(_))
        ));
    }

    #[test]
    fn test_variable_order_from_names() {
        let tree = example();
        let order = VariableOrder::from_names(&tree, &["B", "C", "A"]).unwrap();
        assert_eq!(order.names(&tree), vec!["B", "C", "A"]);
        assert_eq!(order.len(), 3);
        assert!(VariableOrder::from_names(&tree, &["B", "C", "X"]).is_err());
    }

    #[test]
    fn test_every_strategy_yields_a_permutation() {
        let tree = example();
        let strategies: Vec<Box<dyn OrderingStrategy>> = vec![
            Box::new(NaturalOrdering),
            Box::new(RandomOrdering::new()),
            Box::new(RandomOrdering::with_seed(7)),
            Box::new(DepthOrdering::default()),
            Box::new(DepthOrdering::new(Direction::TopToBottom)),
            Box::new(ComplexityOrdering),
            Box::new(ManualOrdering::from_names(["C", "B", "A"])),
        ];
        for strategy in strategies.iter() {
            let order = order(&tree, strategy).unwrap();
            assert!(order.validate(&tree).is_ok(), "{}", strategy.name());
            assert_eq!(order.len(), 3, "{}", strategy.name());
        }
    }
}
