//! # Main — CLI Entry Point
//!
//! Thin caller around [`primecore::PrimeEngine`]: parses flags, merges the
//! optional TOML config with command-line overrides, sizes the rayon pool,
//! and routes the `check` / `range` subcommands to `cli.rs`.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use primecore::WitnessSet;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "primecore", about = "Deterministic 64-bit primality queries")]
struct Cli {
    /// Path to a TOML config file with an [engine] table
    #[arg(long, env = "PRIMECORE_CONFIG")]
    config: Option<PathBuf>,

    /// Sieve limit: direct-lookup table covers [0, limit] (overrides config file)
    #[arg(long)]
    sieve_limit: Option<u64>,

    /// Number of small primes used for trial division before Miller-Rabin
    #[arg(long)]
    trial_primes: Option<usize>,

    /// Miller-Rabin witness set: small, medium, or extended
    #[arg(long, value_parser = cli::parse_witnesses)]
    witnesses: Option<WitnessSet>,

    /// Maximum entries in the LRU query cache
    #[arg(long)]
    cache_capacity: Option<usize>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test one or more numbers for primality
    Check {
        /// Numbers to test
        #[arg(required = true)]
        numbers: Vec<u64>,
        /// Emit JSON objects instead of text
        #[arg(long)]
        json: bool,
    },
    /// Enumerate all primes in [low, high]
    Range {
        /// Lower bound (inclusive)
        low: u64,
        /// Upper bound (inclusive)
        high: u64,
        /// Print only the prime count
        #[arg(long)]
        count_only: bool,
        /// Emit a JSON array instead of one prime per line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli::run(&cli)
}
