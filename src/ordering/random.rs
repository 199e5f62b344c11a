use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::fault_tree::FaultTree;
use crate::ordering::{OrderingStrategy, VariableOrder};

/// Decides basic events in a uniformly shuffled order.
///
/// Without a seed every call draws a fresh permutation. With a seed, the same
/// tree always gets the same permutation.
#[derive(Debug, Copy, Clone, Default)]
pub struct RandomOrdering {
    pub seed: Option<u64>,
}

impl RandomOrdering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl OrderingStrategy for RandomOrdering {
    fn name(&self) -> &str {
        "Random"
    }

    fn order(&self, tree: &FaultTree) -> Result<VariableOrder> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let mut events = tree.basic_events().to_vec();
        events.shuffle(&mut rng);
        debug!("shuffled {} basic events (seed = {:?})", events.len(), self.seed);
        VariableOrder::new(tree, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fault_tree::FaultTreeBuilder;

    fn wide_tree(n: usize) -> FaultTree {
        let mut builder = FaultTreeBuilder::new();
        let events: Vec<_> = (0..n)
            .map(|i| builder.basic_event_str(format!("E{}", i), "0.5").unwrap())
            .collect();
        let system = builder.or("SYSTEM", &events).unwrap();
        builder.build(system).unwrap()
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let tree = wide_tree(20);
        let first = RandomOrdering::with_seed(42).order(&tree).unwrap();
        let second = RandomOrdering::with_seed(42).order(&tree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_permutation() {
        let tree = wide_tree(20);
        for seed in 0..10 {
            let order = RandomOrdering::with_seed(seed).order(&tree).unwrap();
            let mut sorted = order.into_inner();
            sorted.sort();
            assert_eq!(sorted, tree.basic_events());
        }
        assert_eq!(RandomOrdering::new().order(&tree).unwrap().len(), 20);
    }
}
