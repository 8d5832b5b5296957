//! # primecore — Deterministic 64-bit Primality Engine
//!
//! Three query shapes, one engine:
//!
//! - **Single membership test**: sieve lookup below the configured limit,
//!   trial division + deterministic Miller–Rabin above it.
//! - **Repeated queries**: an LRU cache memoizes verdicts for the hot
//!   working set.
//! - **Range enumeration**: a segmented sieve walks `[low, high]` with
//!   memory proportional to the span, never to `high`.
//!
//! ```no_run
//! use primecore::{EngineConfig, PrimeEngine};
//!
//! let engine = PrimeEngine::new(EngineConfig::default())?;
//! assert!(engine.is_prime(999_983)?);
//! assert!(!engine.is_prime(999_981)?);
//! let primes = engine.primes_in_range(10_000, 10_200);
//! assert_eq!(primes.first(), Some(&10_007));
//! # Ok::<(), primecore::EngineError>(())
//! ```
//!
//! Every answer is deterministic: the configured witness set has a known
//! validity bound and queries past it are refused, never guessed at.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod miller_rabin;
pub mod sieve;

pub use cache::CacheStats;
pub use config::EngineConfig;
pub use engine::PrimeEngine;
pub use error::EngineError;
pub use miller_rabin::WitnessSet;
