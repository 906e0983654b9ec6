mod generator;
mod inspect;
mod stats;
mod sweep;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "honeycomb", about = "Honeycomb code circuits and decoding graphs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a memory-experiment circuit
    Gen {
        #[arg(short, long, default_value_t = 2)]
        distance: usize,
        #[arg(short, long, default_value_t = 4)]
        cycles: usize,
        #[arg(long, default_value_t = 0.001)]
        p: f64,
        #[arg(short, long, default_value = "honeycomb.stim")]
        out: PathBuf,
        /// Use CX/H/M sequences instead of MPP
        #[arg(long)]
        decomposed: bool,
    },
    /// Build the decoding graph of a detector error model and report on it
    Graph {
        #[arg(short, long)]
        dem: PathBuf,
    },
    /// Generate circuits for several distances in parallel
    Sweep {
        #[arg(long, value_delimiter = ',', default_values_t = vec![1, 2, 3])]
        distances: Vec<usize>,
        #[arg(short, long, default_value_t = 4)]
        cycles: usize,
        #[arg(long, default_value_t = 0.001)]
        p: f64,
        #[arg(long, default_value = "circuits")]
        out_dir: PathBuf,
        #[arg(long)]
        decomposed: bool,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Gen {
            distance,
            cycles,
            p,
            out,
            decomposed,
        } => {
            generator::generate_circuit(&out, distance, cycles, p, decomposed)?;
        }
        Commands::Graph { dem } => {
            inspect::report_graph(&dem)?;
        }
        Commands::Sweep {
            distances,
            cycles,
            p,
            out_dir,
            decomposed,
        } => {
            sweep::run_sweep(&out_dir, &distances, cycles, p, decomposed)?;
        }
    }
    Ok(())
}
