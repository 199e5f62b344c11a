use std::fmt;

use crate::probability::Probability;
use crate::types::GateId;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GateKind {
    /// A basic event: a leaf whose value comes from the state assignment.
    Basic(Probability),
    And(Box<[GateId]>),
    Or(Box<[GateId]>),
    Not(GateId),
    /// True iff at least `threshold` inputs are true.
    Vot { threshold: usize, inputs: Box<[GateId]> },
    /// True iff exactly one input is true.
    Xor(Box<[GateId]>),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Gate {
    id: GateId,
    name: String,
    kind: GateKind,
}

// Constructors
impl Gate {
    pub(crate) fn new(id: GateId, name: impl Into<String>, kind: GateKind) -> Gate {
        Gate {
            id,
            name: name.into(),
            kind,
        }
    }
}

// Getters
impl Gate {
    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    pub fn inputs(&self) -> &[GateId] {
        match &self.kind {
            GateKind::Basic(_) => &[],
            GateKind::Not(input) => std::slice::from_ref(input),
            GateKind::And(inputs) | GateKind::Or(inputs) | GateKind::Xor(inputs) => inputs,
            GateKind::Vot { inputs, .. } => inputs,
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.kind, GateKind::Basic(_))
    }

    /// Probability of a basic event, `None` for any other gate.
    pub fn probability(&self) -> Option<&Probability> {
        match &self.kind {
            GateKind::Basic(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn set_probability(&mut self, probability: Probability) -> bool {
        match &mut self.kind {
            GateKind::Basic(p) => {
                *p = probability;
                true
            }
            _ => false,
        }
    }

    /// Whether turning any input from false to true can never turn this gate from
    /// true to false.
    ///
    /// A single-input XOR is the identity and counts as monotone.
    pub fn is_monotone(&self) -> bool {
        match &self.kind {
            GateKind::Basic(_) | GateKind::And(_) | GateKind::Or(_) | GateKind::Vot { .. } => true,
            GateKind::Xor(inputs) => inputs.len() <= 1,
            GateKind::Not(_) => false,
        }
    }
}

// Evaluation
impl Gate {
    /// Evaluates the gate given the values of the gates it refers to.
    ///
    /// `value` is asked for the value of every input gate; for a basic event it is
    /// asked for the gate's own id, which yields the event's state.
    pub fn apply(&self, value: impl Fn(GateId) -> bool) -> bool {
        match &self.kind {
            GateKind::Basic(_) => value(self.id),
            GateKind::And(inputs) => inputs.iter().all(|&x| value(x)),
            GateKind::Or(inputs) => inputs.iter().any(|&x| value(x)),
            GateKind::Not(input) => !value(*input),
            GateKind::Vot { threshold, inputs } => inputs.iter().filter(|&&x| value(x)).nth(threshold - 1).is_some(),
            GateKind::Xor(inputs) => inputs.iter().filter(|&&x| value(x)).take(2).count() == 1,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Basic(_) => write!(f, "BASIC"),
            GateKind::And(_) => write!(f, "AND"),
            GateKind::Or(_) => write!(f, "OR"),
            GateKind::Not(_) => write!(f, "NOT"),
            GateKind::Vot { threshold, inputs } => write!(f, "VOT({}/{})", threshold, inputs.len()),
            GateKind::Xor(_) => write!(f, "XOR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(xs: &[u32]) -> Box<[GateId]> {
        xs.iter().map(|&x| GateId::new(x)).collect()
    }

    // Inputs 0 and 2 are true, 1 and 3 are false.
    fn value(id: GateId) -> bool {
        id.index() % 2 == 0
    }

    #[test]
    fn test_gate_and_or() {
        let and = Gate::new(GateId::new(10), "and", GateKind::And(ids(&[0, 1])));
        let or = Gate::new(GateId::new(11), "or", GateKind::Or(ids(&[0, 1])));
        assert_eq!(and.inputs(), &[GateId::new(0), GateId::new(1)]);
        assert!(!and.apply(value));
        assert!(or.apply(value));
    }

    #[test]
    fn test_gate_not() {
        let not = Gate::new(GateId::new(10), "not", GateKind::Not(GateId::new(1)));
        assert_eq!(not.inputs(), &[GateId::new(1)]);
        assert!(not.apply(value));
        assert!(!not.is_monotone());
    }

    #[test]
    fn test_gate_vot() {
        let inputs = ids(&[0, 1, 2, 3]);
        for (threshold, expected) in [(1, true), (2, true), (3, false), (4, false)] {
            let vot = Gate::new(
                GateId::new(10),
                "vot",
                GateKind::Vot {
                    threshold,
                    inputs: inputs.clone(),
                },
            );
            assert_eq!(vot.apply(value), expected, "threshold = {}", threshold);
        }
    }

    #[test]
    fn test_gate_xor() {
        let one_true = Gate::new(GateId::new(10), "xor", GateKind::Xor(ids(&[0, 1, 3])));
        let two_true = Gate::new(GateId::new(11), "xor", GateKind::Xor(ids(&[0, 1, 2])));
        let none_true = Gate::new(GateId::new(12), "xor", GateKind::Xor(ids(&[1, 3])));
        assert!(one_true.apply(value));
        assert!(!two_true.apply(value));
        assert!(!none_true.apply(value));
        assert!(!two_true.is_monotone());
    }

    #[test]
    fn test_gate_basic() {
        let p = Probability::from_ratio(1, 3).unwrap();
        let mut basic = Gate::new(GateId::new(2), "e", GateKind::Basic(p.clone()));
        assert!(basic.is_basic());
        assert!(basic.inputs().is_empty());
        assert!(basic.apply(value));
        assert_eq!(basic.probability(), Some(&p));
        assert!(basic.set_probability(Probability::one()));
        assert_eq!(basic.probability(), Some(&Probability::one()));
        assert_eq!(basic.kind().to_string(), "BASIC");
    }
}
