//! Fault trees: a gate graph rooted at the system gate.
//!
//! Gates are allocated in an arena by [`FaultTreeBuilder`]. A gate can only refer
//! to gates that already exist, so the arena is topologically sorted by
//! construction (inputs before the gates using them) and the graph can never
//! contain a cycle. Sharing is allowed: a gate may feed several parents.
//!
//! # Examples
//!
//! ```
//! use fault_tree_bdd::fault_tree::FaultTreeBuilder;
//!
//! let mut builder = FaultTreeBuilder::new();
//! let a = builder.basic_event_str("A", "1/2").unwrap();
//! let b = builder.basic_event_str("B", "1/2").unwrap();
//! let c = builder.basic_event_str("C", "1/4").unwrap();
//! let ab = builder.and("AB", &[a, b]).unwrap();
//! let system = builder.or("SYSTEM", &[ab, c]).unwrap();
//! let tree = builder.build(system).unwrap();
//!
//! assert_eq!(tree.basic_events(), &[a, b, c]);
//! assert_eq!(tree.max_depth(), 2);
//! assert!(!tree.evaluate(&tree.false_state()));
//! ```

use std::collections::HashMap;

use log::{debug, warn};
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::assignment::Assignment;
use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::gate::{Gate, GateKind};
use crate::probability::Probability;
use crate::types::GateId;

/// Largest number of basic events [`FaultTree::enumerate_probability`] accepts.
pub const MAX_ENUMERATED_EVENTS: usize = 24;

/// Arena builder for [`FaultTree`]s.
#[derive(Debug, Default)]
pub struct FaultTreeBuilder {
    gates: Vec<Gate>,
    names: HashMap<String, GateId>,
}

impl FaultTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Looks up a gate added earlier by its name.
    pub fn get(&self, name: &str) -> Option<GateId> {
        self.names.get(name).copied()
    }

    /// Adds a gate of the given kind.
    ///
    /// Fails if the name is already taken, if an input does not exist yet, or if
    /// the gate has the wrong number of inputs for its kind.
    pub fn gate(&mut self, name: impl Into<String>, kind: GateKind) -> Result<GateId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(Error::InvalidGate(format!("duplicate gate name {:?}", name)));
        }

        let id = GateId::new(self.gates.len() as u32);
        let gate = Gate::new(id, name, kind);
        for &input in gate.inputs() {
            if input >= id {
                return Err(Error::UnknownGate(input));
            }
        }
        match gate.kind() {
            GateKind::Basic(_) | GateKind::Not(_) => {}
            GateKind::And(inputs) | GateKind::Or(inputs) | GateKind::Xor(inputs) => {
                if inputs.is_empty() {
                    return Err(Error::InvalidGate(format!("{} gate {:?} has no inputs", gate.kind(), gate.name())));
                }
            }
            GateKind::Vot { threshold, inputs } => {
                if *threshold == 0 || *threshold > inputs.len() {
                    return Err(Error::InvalidGate(format!(
                        "voting gate {:?} has threshold {} for {} inputs",
                        gate.name(),
                        threshold,
                        inputs.len()
                    )));
                }
            }
        }

        debug!("gate {} = {} {:?} {:?}", id, gate.kind(), gate.name(), gate.inputs());
        self.names.insert(gate.name().to_string(), id);
        self.gates.push(gate);
        Ok(id)
    }

    pub fn basic_event(&mut self, name: impl Into<String>, probability: Probability) -> Result<GateId> {
        self.gate(name, GateKind::Basic(probability))
    }

    /// Adds a basic event whose probability is given as a literal (`"1/7"`, `"0.25"`).
    pub fn basic_event_str(&mut self, name: impl Into<String>, probability: &str) -> Result<GateId> {
        let probability = probability.parse()?;
        self.basic_event(name, probability)
    }

    pub fn and(&mut self, name: impl Into<String>, inputs: &[GateId]) -> Result<GateId> {
        self.gate(name, GateKind::And(inputs.into()))
    }

    pub fn or(&mut self, name: impl Into<String>, inputs: &[GateId]) -> Result<GateId> {
        self.gate(name, GateKind::Or(inputs.into()))
    }

    pub fn not(&mut self, name: impl Into<String>, input: GateId) -> Result<GateId> {
        self.gate(name, GateKind::Not(input))
    }

    pub fn vot(&mut self, name: impl Into<String>, threshold: usize, inputs: &[GateId]) -> Result<GateId> {
        self.gate(
            name,
            GateKind::Vot {
                threshold,
                inputs: inputs.into(),
            },
        )
    }

    pub fn xor(&mut self, name: impl Into<String>, inputs: &[GateId]) -> Result<GateId> {
        self.gate(name, GateKind::Xor(inputs.into()))
    }

    /// Finishes the tree with `root` as its system gate.
    ///
    /// Gates not reachable from the root are kept in the arena but are not part
    /// of the tree: they are neither evaluated nor ordered.
    pub fn build(self, root: GateId) -> Result<FaultTree> {
        if root.index() >= self.gates.len() {
            return Err(Error::UnknownGate(root));
        }
        FaultTree::new(self.gates, root)
    }
}

/// A fault tree: the system gate and everything reachable from it.
#[derive(Debug, Clone)]
pub struct FaultTree {
    gates: Vec<Gate>,
    root: GateId,
    /// Reachable gates in ascending id order, hence inputs first.
    reachable: Vec<GateId>,
    /// Reachable basic events in declaration order.
    basic_events: Vec<GateId>,
    event_names: HashMap<String, GateId>,
    /// Minimum depth of every reachable gate (`usize::MAX` for unreachable ones).
    min_depth: Vec<usize>,
    max_depth: usize,
    monotone: bool,
}

impl FaultTree {
    fn new(gates: Vec<Gate>, root: GateId) -> Result<Self> {
        let mut visited = BitSet::new(gates.len());
        let mut stack = vec![root];
        visited.insert(root.index());
        while let Some(id) = stack.pop() {
            for &input in gates[id.index()].inputs() {
                if visited.insert(input.index()) {
                    stack.push(input);
                }
            }
        }
        let reachable: Vec<GateId> = visited.iter().map(|i| GateId::new(i as u32)).collect();

        for gate in gates.iter().filter(|g| !visited.contains(g.id().index())) {
            warn!("gate {:?} is not reachable from {:?}", gate.name(), gates[root.index()].name());
        }

        let basic_events: Vec<GateId> = reachable
            .iter()
            .copied()
            .filter(|id| gates[id.index()].is_basic())
            .collect();
        let event_names = basic_events
            .iter()
            .map(|&id| (gates[id.index()].name().to_string(), id))
            .collect();

        // Parents have larger ids than their inputs, so a descending sweep sees
        // every parent before its inputs.
        let mut min_depth = vec![usize::MAX; gates.len()];
        let mut longest = vec![0usize; gates.len()];
        min_depth[root.index()] = 0;
        for &id in reachable.iter().rev() {
            let (shallow, deep) = (min_depth[id.index()], longest[id.index()]);
            for &input in gates[id.index()].inputs() {
                let i = input.index();
                min_depth[i] = min_depth[i].min(shallow + 1);
                longest[i] = longest[i].max(deep + 1);
            }
        }
        let max_depth = reachable.iter().map(|id| longest[id.index()]).max().unwrap_or(0);

        let monotone = reachable.iter().all(|id| gates[id.index()].is_monotone());

        debug!(
            "fault tree {:?}: {} gates, {} basic events, max depth {}, monotone = {}",
            gates[root.index()].name(),
            reachable.len(),
            basic_events.len(),
            max_depth,
            monotone
        );

        Ok(FaultTree {
            gates,
            root,
            reachable,
            basic_events,
            event_names,
            min_depth,
            max_depth,
            monotone,
        })
    }
}

// Structure
impl FaultTree {
    /// Name of the tree, which is the name of its system gate.
    pub fn name(&self) -> &str {
        self.system().name()
    }

    pub fn root(&self) -> GateId {
        self.root
    }

    /// The system gate.
    pub fn system(&self) -> &Gate {
        &self.gates[self.root.index()]
    }

    /// Returns the gate with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this tree's arena.
    pub fn gate(&self, id: GateId) -> &Gate {
        &self.gates[id.index()]
    }

    pub fn get_gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.index())
    }

    /// Gates reachable from the root, inputs before the gates using them.
    pub fn gates(&self) -> impl DoubleEndedIterator<Item = &Gate> + '_ {
        self.reachable.iter().map(move |id| &self.gates[id.index()])
    }

    pub fn num_gates(&self) -> usize {
        self.reachable.len()
    }

    /// Basic events reachable from the root, in declaration order.
    pub fn basic_events(&self) -> &[GateId] {
        &self.basic_events
    }

    pub fn num_basic_events(&self) -> usize {
        self.basic_events.len()
    }

    pub fn is_basic_event(&self, id: GateId) -> bool {
        self.is_reachable(id) && self.gates[id.index()].is_basic()
    }

    pub fn is_reachable(&self, id: GateId) -> bool {
        self.min_depth.get(id.index()).is_some_and(|&d| d != usize::MAX)
    }

    /// Looks up a basic event by name.
    pub fn basic_event(&self, name: &str) -> Option<GateId> {
        self.event_names.get(name).copied()
    }

    /// Minimum number of edges between the root and the gate, over all paths.
    pub fn depth(&self, id: GateId) -> Option<usize> {
        self.min_depth.get(id.index()).copied().filter(|&d| d != usize::MAX)
    }

    /// Length of the longest path from the root to any gate.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether every reachable gate is monotone (no NOT, no multi-input XOR).
    ///
    /// In a monotone tree, once the system gate holds, setting more basic events
    /// true cannot make it fail again.
    pub fn is_monotone(&self) -> bool {
        self.monotone
    }
}

// Probabilities
impl FaultTree {
    pub fn probability(&self, event: GateId) -> Result<&Probability> {
        if !self.is_basic_event(event) {
            return Err(Error::NotABasicEvent(event));
        }
        self.gates[event.index()]
            .probability()
            .ok_or(Error::NotABasicEvent(event))
    }

    pub fn set_probability(&mut self, event: GateId, probability: Probability) -> Result<()> {
        if !self.is_basic_event(event) {
            return Err(Error::NotABasicEvent(event));
        }
        self.gates[event.index()].set_probability(probability);
        Ok(())
    }

    /// Sets the probability of the named basic event from a literal.
    ///
    /// The literal is validated before anything is changed.
    pub fn set_probability_str(&mut self, name: &str, probability: &str) -> Result<()> {
        let event = self
            .basic_event(name)
            .ok_or_else(|| Error::UnknownEvent(name.to_string()))?;
        let probability = probability.parse()?;
        self.set_probability(event, probability)
    }

    /// Sets several probabilities at once, by basic event name.
    ///
    /// Either all updates are applied or, if any name or literal is invalid, none.
    pub fn set_probabilities<'a>(&mut self, updates: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<()> {
        let updates = updates
            .into_iter()
            .map(|(name, p)| {
                let event = self
                    .basic_event(name)
                    .ok_or_else(|| Error::UnknownEvent(name.to_string()))?;
                Ok((event, p.parse::<Probability>()?))
            })
            .collect::<Result<Vec<_>>>()?;
        for (event, p) in updates {
            self.set_probability(event, p)?;
        }
        Ok(())
    }
}

// Evaluation
impl FaultTree {
    /// The assignment where every basic event is false.
    pub fn false_state(&self) -> Assignment {
        Assignment::all_false()
    }

    /// Evaluates every reachable gate under the assignment.
    ///
    /// The result is indexed by gate id; unreachable gates read as false.
    pub fn evaluate_all(&self, assignment: &Assignment) -> Vec<bool> {
        let mut values = vec![false; self.gates.len()];
        for &id in self.reachable.iter() {
            let gate = &self.gates[id.index()];
            let value = if gate.is_basic() {
                assignment.get(id)
            } else {
                gate.apply(|input| values[input.index()])
            };
            values[id.index()] = value;
        }
        values
    }

    /// Evaluates the system gate under the assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        self.evaluate_all(assignment)[self.root.index()]
    }

    /// Computes the system failure probability by enumerating all `2^n`
    /// assignments of the `n` basic events.
    ///
    /// Exponential; meant as a reference for small trees. Returns `None` for
    /// trees with more than [`MAX_ENUMERATED_EVENTS`] basic events.
    pub fn enumerate_probability(&self) -> Option<BigRational> {
        let n = self.basic_events.len();
        if n > MAX_ENUMERATED_EVENTS {
            debug!("not enumerating {} basic events", n);
            return None;
        }

        let probabilities: Vec<&Probability> = self
            .basic_events
            .iter()
            .filter_map(|id| self.gates[id.index()].probability())
            .collect();

        let mut total = BigRational::zero();
        for bits in 0u64..(1u64 << n) {
            let mut assignment = Assignment::all_false();
            let mut weight = BigRational::one();
            for (i, (&event, p)) in self.basic_events.iter().zip(&probabilities).enumerate() {
                if bits >> i & 1 == 1 {
                    assignment.set(event, true);
                    weight *= p.value();
                } else {
                    weight *= p.complement();
                }
            }
            if self.evaluate(&assignment) {
                total += weight;
            }
        }
        Some(total)
    }
}
