//! Compares ordering strategies on a fault tree read from a Galileo file.
//!
//! Run with:
//! ```bash
//! cargo run --release --example benchmark -- tests/data/cooling.dft
//! cargo run --release --example benchmark -- tree.dft -s depth -s complexity
//! cargo run --release --example benchmark -- tree.dft -s random --seed 42 --runs 10
//! cargo run --release --example benchmark -- tree.dft -s manual --order V1,V2,V3,Pump
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::bail;
use log::info;

use fault_tree_bdd::benchmark::Benchmark;
use fault_tree_bdd::construct::EarlyExit;
use fault_tree_bdd::fault_tree::FaultTree;
use fault_tree_bdd::ordering::{
    ComplexityOrdering, DepthOrdering, Direction, ManualOrdering, NaturalOrdering, OrderingStrategy, RandomOrdering,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Strategy {
    Natural,
    Random,
    Manual,
    DepthBottomUp,
    DepthTopDown,
    Complexity,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Exit {
    Auto,
    Always,
    Never,
}

impl From<Exit> for EarlyExit {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Auto => EarlyExit::Auto,
            Exit::Always => EarlyExit::Always,
            Exit::Never => EarlyExit::Never,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Variable ordering benchmark for fault trees")]
struct Cli {
    /// Fault tree in Galileo format.
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Strategies to compare (default: all but manual).
    #[arg(short, long, value_enum)]
    strategy: Vec<Strategy>,

    /// Seed of the random ordering. Unseeded runs draw a fresh order every time.
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Number of random orderings to try.
    #[arg(long, value_name = "INT", default_value = "1")]
    runs: u64,

    /// Comma-separated basic event names for the manual ordering.
    #[arg(long, value_delimiter = ',')]
    order: Vec<String>,

    /// Probability overrides, as `NAME=VALUE`.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,

    /// When construction may stop as soon as the system gate holds.
    #[arg(long, value_enum, default_value = "auto")]
    early_exit: Exit,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let mut tree = FaultTree::from_file(&args.path)?;
    info!(
        "{}: {} gates, {} basic events, max depth {}, {}",
        args.path.display(),
        tree.num_gates(),
        tree.num_basic_events(),
        tree.max_depth(),
        if tree.is_monotone() { "monotone" } else { "not monotone" }
    );

    let mut overrides = Vec::new();
    for assignment in args.overrides.iter() {
        let Some((name, value)) = assignment.split_once('=') else {
            bail!("Expected NAME=VALUE, found {:?}", assignment);
        };
        overrides.push((name, value));
    }
    tree.set_probabilities(overrides)?;

    let selected = if args.strategy.is_empty() {
        vec![
            Strategy::Natural,
            Strategy::Random,
            Strategy::DepthBottomUp,
            Strategy::DepthTopDown,
            Strategy::Complexity,
        ]
    } else {
        args.strategy.clone()
    };

    let mut strategies: Vec<Box<dyn OrderingStrategy>> = Vec::new();
    for strategy in selected {
        match strategy {
            Strategy::Natural => strategies.push(Box::new(NaturalOrdering)),
            Strategy::Random => {
                for run in 0..args.runs {
                    let random = match args.seed {
                        Some(seed) => RandomOrdering::with_seed(seed.wrapping_add(run)),
                        None => RandomOrdering::new(),
                    };
                    strategies.push(Box::new(random));
                }
            }
            Strategy::Manual => {
                if args.order.is_empty() {
                    bail!("The manual ordering needs --order");
                }
                strategies.push(Box::new(ManualOrdering::from_names(args.order.iter())));
            }
            Strategy::DepthBottomUp => strategies.push(Box::new(DepthOrdering::new(Direction::BottomToTop))),
            Strategy::DepthTopDown => strategies.push(Box::new(DepthOrdering::new(Direction::TopToBottom))),
            Strategy::Complexity => strategies.push(Box::new(ComplexityOrdering)),
        }
    }

    let report = Benchmark::new(&tree)
        .with_early_exit(args.early_exit.into())
        .run(&strategies)?;
    println!("{}", report);

    let time_total = time_total.elapsed();
    println!("\nAll done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
