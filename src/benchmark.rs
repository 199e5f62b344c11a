//! Comparing ordering strategies on one fault tree.
//!
//! For every strategy, [`Benchmark::run`] times the three phases of the
//! pipeline (ordering, construction, minimisation), counts the nodes of the
//! raw and minimised diagrams, and computes the system probability.
//!
//! # Examples
//!
//! ```
//! use fault_tree_bdd::benchmark::Benchmark;
//! use fault_tree_bdd::fault_tree::FaultTreeBuilder;
//! use fault_tree_bdd::ordering::{DepthOrdering, NaturalOrdering, OrderingStrategy};
//!
//! let mut builder = FaultTreeBuilder::new();
//! let a = builder.basic_event_str("A", "0.1").unwrap();
//! let b = builder.basic_event_str("B", "0.2").unwrap();
//! let c = builder.basic_event_str("C", "0.3").unwrap();
//! let ab = builder.and("AB", &[a, b]).unwrap();
//! let system = builder.or("SYSTEM", &[ab, c]).unwrap();
//! let tree = builder.build(system).unwrap();
//!
//! let strategies: [&dyn OrderingStrategy; 2] = [&NaturalOrdering, &DepthOrdering::default()];
//! let report = Benchmark::new(&tree).run(&strategies).unwrap();
//! assert_eq!(report.results.len(), 2);
//! println!("{}", report);
//! ```

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use log::info;

use crate::analysis::{analyse, DiagramStats};
use crate::construct::{construct_with_config, ConstructionConfig, EarlyExit};
use crate::error::{Error, Result};
use crate::fault_tree::FaultTree;
use crate::galileo;
use crate::minimise::minimise;
use crate::ordering::OrderingStrategy;
use crate::probability::Probability;

impl FaultTree {
    /// Reads a fault tree from a file, choosing the reader by extension.
    ///
    /// Only Galileo files (`.dft`) are supported.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FaultTree> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("dft") => galileo::read_file(path),
            other => Err(Error::UnsupportedFileType(other.unwrap_or_default().to_string())),
        }
    }
}

/// Measurements for one strategy.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub strategy: String,
    /// Names of the basic events, in the order chosen by the strategy.
    pub order: Vec<String>,
    pub ordering_time: Duration,
    pub construction_time: Duration,
    pub minimising_time: Duration,
    pub raw: DiagramStats,
    pub minimised: DiagramStats,
    pub probability: Probability,
}

/// Results of all strategies, in the order they were run.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub name: String,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// The strategy with the smallest minimised diagram (first one on ties).
    pub fn best(&self) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .reduce(|best, r| if r.minimised.nodes < best.minimised.nodes { r } else { best })
    }
}

/// Benchmark runner for one fault tree.
#[derive(Debug)]
pub struct Benchmark<'a> {
    tree: &'a FaultTree,
    name: String,
    early_exit: EarlyExit,
}

impl<'a> Benchmark<'a> {
    pub fn new(tree: &'a FaultTree) -> Self {
        Self {
            tree,
            name: tree.name().to_string(),
            early_exit: EarlyExit::default(),
        }
    }

    /// Name used in the report (default: the name of the tree).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_early_exit(mut self, early_exit: EarlyExit) -> Self {
        self.early_exit = early_exit;
        self
    }

    /// Runs every strategy in turn.
    pub fn run<S: OrderingStrategy>(&self, strategies: &[S]) -> Result<BenchmarkReport> {
        let results = strategies
            .iter()
            .map(|strategy| self.run_one(strategy))
            .collect::<Result<Vec<_>>>()?;
        Ok(BenchmarkReport {
            name: self.name.clone(),
            results,
        })
    }

    /// Runs a single strategy.
    pub fn run_one(&self, strategy: &impl OrderingStrategy) -> Result<BenchmarkResult> {
        info!("benchmarking {} ordering on {:?}", strategy.name(), self.name);

        let start = Instant::now();
        let order = strategy.order(self.tree)?;
        let ordering_time = start.elapsed();

        let config = ConstructionConfig::new()
            .with_minimise(false)
            .with_early_exit(self.early_exit);
        let start = Instant::now();
        let raw = construct_with_config(self.tree, &order, &config)?;
        let construction_time = start.elapsed();

        let start = Instant::now();
        let minimised = minimise(&raw);
        let minimising_time = start.elapsed();

        let result = BenchmarkResult {
            strategy: strategy.name().to_string(),
            order: order.names(self.tree).into_iter().map(String::from).collect(),
            ordering_time,
            construction_time,
            minimising_time,
            raw: analyse(&raw),
            minimised: analyse(&minimised),
            probability: minimised.probability(self.tree)?,
        };
        info!(
            "{}: {} raw nodes, {} minimised nodes",
            result.strategy, result.raw.nodes, result.minimised.nodes
        );
        Ok(result)
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.strategy)?;
        writeln!(f, "  Order:        {}", self.order.join(", "))?;
        writeln!(f, "  Timings:")?;
        writeln!(f, "    Ordering:     {:.3?}", self.ordering_time)?;
        writeln!(f, "    Construction: {:.3?}", self.construction_time)?;
        writeln!(f, "    Minimising:   {:.3?}", self.minimising_time)?;
        writeln!(f, "  Nodes:")?;
        writeln!(f, "    Not minimised: {}", self.raw.nodes)?;
        writeln!(f, "    Minimised:     {}", self.minimised.nodes)?;
        write!(f, "  Probability:  {} (~{:.6e})", self.probability, self.probability.to_f64())
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Benchmark of {}", self.name)?;
        for result in self.results.iter() {
            writeln!(f, "{}", result)?;
        }
        if let Some(best) = self.best() {
            write!(f, "Smallest minimised diagram: {} ({} nodes)", best.strategy, best.minimised.nodes)?;
        }
        Ok(())
    }
}
