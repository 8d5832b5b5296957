//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: config merging,
//! rayon pool sizing, and the execution logic for each subcommand.

use anyhow::{Context, Result};
use primecore::{EngineConfig, PrimeEngine, WitnessSet};
use tracing::info;

use super::{Cli, Commands};

/// clap value parser for `--witnesses`.
pub fn parse_witnesses(s: &str) -> Result<WitnessSet, String> {
    match s {
        "small" => Ok(WitnessSet::Small),
        "medium" => Ok(WitnessSet::Medium),
        "extended" => Ok(WitnessSet::Extended),
        other => Err(format!(
            "unknown witness set '{other}' (expected small, medium, or extended)"
        )),
    }
}

/// Merge config file and flag overrides, build the engine, dispatch.
pub fn run(cli: &Cli) -> Result<()> {
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure rayon thread pool")?;
    }

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(sieve_limit) = cli.sieve_limit {
        config.sieve_limit = sieve_limit;
    }
    if let Some(trial_primes) = cli.trial_primes {
        config.trial_primes = trial_primes;
    }
    if let Some(witnesses) = cli.witnesses {
        config.witnesses = witnesses;
    }
    if let Some(cache_capacity) = cli.cache_capacity {
        config.cache_capacity = cache_capacity;
    }

    let engine = PrimeEngine::new(config).context("failed to initialize prime engine")?;

    match &cli.command {
        Commands::Check { numbers, json } => run_check(&engine, numbers, *json),
        Commands::Range {
            low,
            high,
            count_only,
            json,
        } => run_range(&engine, *low, *high, *count_only, *json),
    }
}

fn run_check(engine: &PrimeEngine, numbers: &[u64], json: bool) -> Result<()> {
    for &n in numbers {
        let verdict = engine
            .is_prime(n)
            .with_context(|| format!("testing {n}"))?;
        if json {
            println!(
                "{}",
                serde_json::json!({ "n": n, "prime": verdict })
            );
        } else if verdict {
            println!("{n}: prime");
        } else {
            println!("{n}: composite");
        }
    }
    Ok(())
}

fn run_range(engine: &PrimeEngine, low: u64, high: u64, count_only: bool, json: bool) -> Result<()> {
    let start = std::time::Instant::now();
    let primes = engine.primes_in_range(low, high);
    info!(
        low,
        high,
        count = primes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "range enumeration complete"
    );

    if count_only {
        println!("{}", primes.len());
    } else if json {
        println!("{}", serde_json::to_string(&primes)?);
    } else {
        for p in &primes {
            println!("{p}");
        }
    }
    Ok(())
}
