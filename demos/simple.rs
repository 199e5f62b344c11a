//! Walks through the whole pipeline on a three-event fault tree.
//!
//! ```bash
//! cargo run --example simple
//! cargo run --example simple -- --output dot_output
//! ```

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use fault_tree_bdd::fault_tree::FaultTreeBuilder;
use fault_tree_bdd::ordering::{ManualOrdering, OrderingStrategy};
use fault_tree_bdd::{analyse, construct, minimise};

#[derive(Debug, Parser)]
#[command(author, version, about = "Fault tree to BDD, step by step")]
struct Cli {
    /// Directory to write DOT files to.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    // SYSTEM = OR(AND(A, B), C)
    let mut builder = FaultTreeBuilder::new();
    let a = builder.basic_event_str("A", "1/2")?;
    let b = builder.basic_event_str("B", "1/2")?;
    let c = builder.basic_event_str("C", "1/4")?;
    let ab = builder.and("AB", &[a, b])?;
    let system = builder.or("SYSTEM", &[ab, c])?;
    let tree = builder.build(system)?;
    println!(
        "tree {:?}: {} gates, {} basic events, max depth {}",
        tree.name(),
        tree.num_gates(),
        tree.num_basic_events(),
        tree.max_depth()
    );

    let order = ManualOrdering::from_names(["A", "B", "C"]).order(&tree)?;
    println!("order = {:?}", order.names(&tree));

    let raw = construct(&tree, &order, false)?;
    println!("raw diagram: {}", analyse(&raw));

    let diagram = minimise(&raw);
    println!("minimised diagram: {}", analyse(&diagram));

    let probability = diagram.probability(&tree)?;
    println!("P(SYSTEM) = {} (~{:.4})", probability, probability.to_f64());
    if let Some(expected) = tree.enumerate_probability() {
        assert_eq!(probability.value(), &expected);
    }

    if let Some(dir) = args.output {
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("tree.dot"), tree.to_dot()?)?;
        fs::write(dir.join("raw.dot"), raw.to_dot(&tree)?)?;
        fs::write(dir.join("minimised.dot"), diagram.to_dot(&tree)?)?;
        println!("DOT files written to {}", dir.display());
    }

    Ok(())
}
