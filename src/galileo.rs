//! Reader for fault trees in the Galileo format.
//!
//! A Galileo file is a sequence of `;`-terminated statements, one per line:
//!
//! ```text
//! toplevel "System";
//! "System" or "Pump" "Valves";
//! "Valves" 2of3 "V1" "V2" "V3";
//! "Pump" prob=1/100;
//! "V1" prob=0.1;
//! "V2" prob=0.1 lambda=3;
//! "V3" prob=1e-1;
//! ```
//!
//! - `toplevel NAME` names the system gate. It must occur exactly once.
//! - `NAME and|or|KofN INPUTS...` defines a gate. `KofN` is a voting gate that
//!   holds when at least `K` of its `N` inputs hold.
//! - Any other statement defines a basic event, followed by `key=value`
//!   attributes. The `prob` attribute gives its probability (0 if absent), any
//!   other attribute is ignored.
//!
//! Names may be quoted. Gates may refer to names defined further down the file.
//! Text after `//` is a comment.
//!
//! Only what is reachable from the top level ends up in the tree. Basic events
//! keep the order in which they are declared in the file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::fault_tree::{FaultTree, FaultTreeBuilder};
use crate::probability::Probability;
use crate::types::GateId;

#[derive(Debug, Clone)]
enum Kind {
    And,
    Or,
    Vot(usize),
    Basic(Probability),
}

#[derive(Debug, Clone)]
struct Definition {
    name: String,
    kind: Kind,
    inputs: Vec<String>,
    line: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Mark {
    New,
    Active,
    Done,
}

/// Reads a fault tree from a Galileo file.
///
/// # Example
///
/// ```no_run
/// use fault_tree_bdd::galileo;
///
/// let tree = galileo::read_file("models/pumps.dft").unwrap();
/// println!("{} basic events", tree.num_basic_events());
/// ```
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<FaultTree> {
    let path = path.as_ref();
    debug!("reading {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a fault tree from a string in Galileo format.
pub fn parse_str(content: &str) -> Result<FaultTree> {
    let mut toplevel: Option<(String, usize)> = None;
    let mut definitions: Vec<Definition> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut last_line = 0;

    for (i, line) in content.lines().enumerate() {
        let line_number = i + 1;
        last_line = line_number;

        let line = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        let line = line.strip_suffix(';').unwrap_or(line);
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        if parts[0] == "toplevel" {
            if toplevel.is_some() {
                return Err(Error::parse(line_number, "Toplevel is defined twice"));
            }
            let name = match parts.as_slice() {
                [_, name] => read_name(name, line_number)?,
                _ => return Err(Error::parse(line_number, "Toplevel takes exactly one name")),
            };
            toplevel = Some((name, line_number));
            continue;
        }

        let definition = if parts.len() > 1 && is_gate(parts[1]) {
            parse_gate(&parts, line_number)?
        } else {
            parse_basic_event(&parts, line_number)?
        };

        if let Some(&first) = index.get(&definition.name) {
            warn!(
                "line {}: {:?} is already defined at line {}, ignoring",
                line_number, definition.name, definitions[first].line
            );
            continue;
        }
        index.insert(definition.name.clone(), definitions.len());
        definitions.push(definition);
    }

    let (toplevel, toplevel_line) =
        toplevel.ok_or_else(|| Error::parse(last_line.max(1), "Toplevel is not defined"))?;
    let root = *index
        .get(&toplevel)
        .ok_or_else(|| Error::parse(toplevel_line, format!("Missing definition for gate {:?}", toplevel)))?;

    let order = resolve(&definitions, &index, root)?;
    build(&definitions, &index, &order, root)
}

/// Names are either bare words or wrapped in double quotes.
fn read_name(word: &str, line: usize) -> Result<String> {
    if let Some(rest) = word.strip_prefix('"') {
        match rest.strip_suffix('"') {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(Error::parse(line, format!("Invalid name {}", word))),
        }
    } else {
        Ok(word.to_string())
    }
}

/// Parses `KofN` into `(K, N)`.
fn parse_vot(word: &str) -> Option<(usize, usize)> {
    let (k, n) = word.split_once("of")?;
    if k.is_empty() || n.is_empty() || !k.bytes().chain(n.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((k.parse().ok()?, n.parse().ok()?))
}

fn is_gate(word: &str) -> bool {
    word == "and" || word == "or" || parse_vot(word).is_some()
}

fn parse_gate(parts: &[&str], line: usize) -> Result<Definition> {
    let name = read_name(parts[0], line)?;
    let inputs = parts[2..]
        .iter()
        .map(|word| read_name(word, line))
        .collect::<Result<Vec<_>>>()?;
    let kind = match parts[1] {
        "and" => Kind::And,
        "or" => Kind::Or,
        word => match parse_vot(word) {
            Some((k, n)) if n == inputs.len() => Kind::Vot(k),
            Some((_, n)) => {
                return Err(Error::parse(
                    line,
                    format!("Gate {:?} expects {} inputs, found {}", name, n, inputs.len()),
                ))
            }
            None => return Err(Error::parse(line, format!("No suitable gate found for {:?}", word))),
        },
    };
    Ok(Definition { name, kind, inputs, line })
}

fn parse_basic_event(parts: &[&str], line: usize) -> Result<Definition> {
    let name = read_name(parts[0], line)?;
    let mut probability = Probability::zero();
    for attribute in parts[1..].iter() {
        let (key, value) = attribute
            .split_once('=')
            .ok_or_else(|| Error::parse(line, format!("Malformed attribute {:?}", attribute)))?;
        if key == "prob" {
            probability = value
                .parse()
                .map_err(|e: Error| Error::parse(line, format!("Attribute prob of {:?}: {}", name, e)))?;
        } else {
            debug!("line {}: ignoring attribute {:?} of {:?}", line, key, name);
        }
    }
    Ok(Definition {
        name,
        kind: Kind::Basic(probability),
        inputs: Vec::new(),
        line,
    })
}

/// Returns the definitions reachable from `root` in post-order, inputs first.
///
/// Fails on references to undefined names and on cycles.
fn resolve(definitions: &[Definition], index: &HashMap<String, usize>, root: usize) -> Result<Vec<usize>> {
    let mut marks = vec![Mark::New; definitions.len()];
    let mut order = Vec::new();
    let mut stack = vec![(root, false)];

    while let Some((i, expanded)) = stack.pop() {
        if expanded {
            marks[i] = Mark::Done;
            order.push(i);
            continue;
        }
        match marks[i] {
            Mark::Done => continue,
            Mark::Active => return Err(Error::Cycle(definitions[i].name.clone())),
            Mark::New => {}
        }
        marks[i] = Mark::Active;
        stack.push((i, true));

        let definition = &definitions[i];
        for input in definition.inputs.iter().rev() {
            let &j = index.get(input).ok_or_else(|| {
                Error::parse(definition.line, format!("Missing definition for gate {:?}", input))
            })?;
            match marks[j] {
                Mark::Active => return Err(Error::Cycle(input.clone())),
                Mark::New => stack.push((j, false)),
                Mark::Done => {}
            }
        }
    }
    Ok(order)
}

fn build(
    definitions: &[Definition],
    index: &HashMap<String, usize>,
    order: &[usize],
    root: usize,
) -> Result<FaultTree> {
    let mut reachable = vec![false; definitions.len()];
    for &i in order.iter() {
        reachable[i] = true;
    }

    let mut builder = FaultTreeBuilder::new();
    let mut ids: Vec<Option<GateId>> = vec![None; definitions.len()];

    // Basic events first, in file order.
    for (i, definition) in definitions.iter().enumerate() {
        if let Kind::Basic(probability) = &definition.kind {
            if !reachable[i] {
                warn!(
                    "line {}: basic event {:?} is never referenced from the top level",
                    definition.line, definition.name
                );
                continue;
            }
            let id = builder
                .basic_event(definition.name.as_str(), probability.clone())
                .map_err(|e| Error::parse(definition.line, e.to_string()))?;
            ids[i] = Some(id);
        }
    }

    for &i in order.iter() {
        let definition = &definitions[i];
        if matches!(definition.kind, Kind::Basic(_)) {
            continue;
        }
        // Post-order: every input already has an id.
        let inputs: Vec<GateId> = definition
            .inputs
            .iter()
            .filter_map(|input| index.get(input).and_then(|&j| ids[j]))
            .collect();
        if inputs.len() != definition.inputs.len() {
            return Err(Error::parse(definition.line, format!("Unresolved inputs of {:?}", definition.name)));
        }
        let name = definition.name.as_str();
        let id = match definition.kind {
            Kind::And => builder.and(name, &inputs),
            Kind::Or => builder.or(name, &inputs),
            Kind::Vot(k) => builder.vot(name, k, &inputs),
            Kind::Basic(_) => continue,
        }
        .map_err(|e| Error::parse(definition.line, e.to_string()))?;
        ids[i] = Some(id);
    }

    let root = ids[root].ok_or_else(|| Error::parse(definitions[root].line, "Toplevel could not be built"))?;
    builder.build(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::BigInt;
    use num_rational::BigRational;
    use test_log::test;

    use crate::gate::GateKind;

    const PUMPS: &str = r#"
toplevel "System";
"System" or "Pump" "Valves";
"Valves" 2of3 "V1" "V2" "V3";
"Pump" prob=1/100;
"V1" prob=0.1;
"V2" prob=0.1 lambda=3;
"V3" prob=1e-1;
"#;

    #[test]
    fn test_parse_pumps() {
        let tree = parse_str(PUMPS).unwrap();
        assert_eq!(tree.name(), "System");
        assert_eq!(tree.num_basic_events(), 4);

        let names: Vec<&str> = tree.basic_events().iter().map(|&e| tree.gate(e).name()).collect();
        assert_eq!(names, vec!["Pump", "V1", "V2", "V3"]);

        let valves = tree.system().inputs()[1];
        assert!(matches!(tree.gate(valves).kind(), GateKind::Vot { threshold: 2, .. }));

        let pump = tree.basic_event("Pump").unwrap();
        assert_eq!(
            tree.probability(pump).unwrap().value(),
            &BigRational::new(BigInt::from(1), BigInt::from(100))
        );
    }

    #[test]
    fn test_bare_names_comments_and_defaults() {
        let input = "
// a comment line
toplevel top;
top and a b; // trailing comment
a prob=0.5;
b;
";
        let tree = parse_str(input).unwrap();
        let b = tree.basic_event("b").unwrap();
        assert!(tree.probability(b).unwrap().is_zero());
        assert_eq!(tree.max_depth(), 1);
    }

    #[test]
    fn test_unreferenced_events_are_dropped() {
        let input = "toplevel T;\nT or A;\nA prob=0.1;\nB prob=0.2;\n";
        let tree = parse_str(input).unwrap();
        assert_eq!(tree.num_basic_events(), 1);
        assert!(tree.basic_event("B").is_none());
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let cases = [
            ("toplevel A;\ntoplevel B;\n", 2),
            ("toplevel T;\nT or A;\n", 2),
            ("toplevel T;\nT or A;\nA prob=abc;\n", 3),
            ("toplevel T;\nT or A;\nA prob=1.5;\n", 3),
            ("toplevel T;\nT or A;\nA prob=1e100000000;\n", 3),
            ("toplevel T;\nT 2of3 A B;\nA;\nB;\n", 2),
            ("toplevel T;\nT 0of1 A;\nA;\n", 2),
            ("toplevel \"\";\n", 1),
            ("toplevel T;\n\"T or A;\nA;\n", 2),
            ("T or A;\nA;\n", 2),
        ];
        for (input, expected) in cases {
            match parse_str(input) {
                Err(Error::Parse { line, .. }) => assert_eq!(line, expected, "{:?}", input),
                other => panic!("{:?}: expected a parse error, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_xor_basic_event_line() {
        // `xor` is not a Galileo gate: the line reads as a basic event with a
        // malformed attribute.
        let res = parse_str("toplevel T;\nT xor A;\n");
        assert!(matches!(res, Err(Error::Parse { line: 2, .. })));
    }

    #[test]
    fn test_cycle() {
        let input = "toplevel T;\nT or G;\nG and H A;\nH or G;\nA prob=0.1;\n";
        assert!(matches!(parse_str(input), Err(Error::Cycle(_))));

        let input = "toplevel T;\nT or T;\n";
        assert!(matches!(parse_str(input), Err(Error::Cycle(_))));
    }

    #[test]
    fn test_shared_gate() {
        let input = "toplevel T;\nT and G H;\nH or G B;\nG or A B;\nA prob=0.5;\nB prob=0.5;\n";
        let tree = parse_str(input).unwrap();
        assert_eq!(tree.num_gates(), 5);
        assert_eq!(tree.enumerate_probability(), Some(BigRational::new(BigInt::from(3), BigInt::from(4))));
    }

    #[test]
    fn test_duplicate_definition_keeps_first() {
        let input = "toplevel T;\nT or A;\nA prob=0.1;\nA prob=0.9;\n";
        let tree = parse_str(input).unwrap();
        let a = tree.basic_event("A").unwrap();
        assert_eq!(
            tree.probability(a).unwrap().value(),
            &BigRational::new(BigInt::from(1), BigInt::from(10))
        );
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(read_file("/nonexistent/tree.dft"), Err(Error::Io(_))));
    }
}
