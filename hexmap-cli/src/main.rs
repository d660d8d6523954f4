//! HEXMAP CLI - Command-line interface
//!
//! Commands:
//! - path: Find the cheapest path between two cells
//! - line: Draw a straight line between two cells
//! - range: List cells within a distance
//! - generate: Write a random map configuration
//! - bench: Run many path queries in parallel over one grid

mod bench;
mod common;
mod generate;
mod path_cmd;
mod query;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexmap")]
#[command(about = "Hex map geometry and path finding")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the cheapest path between two cells
    Path(path_cmd::PathArgs),
    /// Draw a line between two cells
    Line(query::LineArgs),
    /// List cells within a distance of a center cell
    Range(query::RangeArgs),
    /// Write a random map configuration
    Generate(generate::GenerateArgs),
    /// Benchmark random path queries
    Bench(bench::BenchArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Path(args) => path_cmd::run(args),
        Commands::Line(args) => query::run_line(args),
        Commands::Range(args) => query::run_range(args),
        Commands::Generate(args) => generate::run(args, cli.seed),
        Commands::Bench(args) => bench::run(args, cli.seed),
    }
}
