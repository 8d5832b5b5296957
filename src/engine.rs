//! # Engine — Composed Primality Queries
//!
//! [`PrimeEngine`] wires the sieve, trial division, Miller–Rabin, and the
//! LRU cache into the three public operations:
//!
//! - [`is_prime`](PrimeEngine::is_prime) — sieve lookup below the limit,
//!   trial division + deterministic Miller–Rabin above it, memoized.
//! - [`primes_in_range`](PrimeEngine::primes_in_range) — segmented sieve
//!   over `[low, high]`; memory proportional to the span, never to `high`.
//! - [`clear_cache`](PrimeEngine::clear_cache) — drops memoized verdicts
//!   for cache-cold measurements; never changes any answer.
//!
//! ## Query routing
//!
//! ```text
//! n < 2            -> false
//! n <= sieve_limit -> sieve bit, O(1), lock-free
//! otherwise        -> cache -> trial division -> Miller-Rabin -> cache
//! ```
//!
//! The cache sits above the sieve limit only: sieve hits are already O(1)
//! and taking the cache lock for them would cost more than it saves.
//!
//! ## Segmented range enumeration
//!
//! The interval is cut into fixed-size segments; each segment gets a
//! private [`BitSieve`] of segment length. For each base prime p with
//! p² ≤ high, striking starts at max(p², first multiple of p ≥ low) —
//! composites below p² were already handled by smaller base primes.
//! Base primes must cover sqrt(high); when the configured sieve is too
//! shallow for that, the engine extends the base-prime list for the one
//! call rather than returning a silently incomplete answer. Segments are
//! independent, so large spans are sieved in parallel with rayon.
//!
//! ## Concurrency
//!
//! Sieve and prime lists are immutable after construction and read through
//! `&self`. The cache lock is held only for a get or an insert, never
//! across a Miller–Rabin computation; two threads racing on the same
//! uncached n may both compute it (harmless), but neither can corrupt the
//! cache or observe a wrong answer.

use std::fmt;
use std::sync::Mutex;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::cache::{CacheStats, LruCache};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::miller_rabin::miller_rabin;
use crate::sieve::{generate_primes, BitSieve};

/// Integers per segment of the range enumerator: 64 KiB of table per
/// segment, sized to stay L2-resident while amortizing per-segment setup.
const SEGMENT_SPAN: u64 = 1 << 19;

/// Segment count above which the enumerator goes parallel.
const PAR_SEGMENT_THRESHOLD: usize = 4;

/// Deterministic primality engine over u64.
///
/// Construction builds the sieve and prime lists once; afterwards the
/// engine is immutable apart from the interior-mutable query cache and is
/// safe to share across threads (`&PrimeEngine` is `Send + Sync`).
pub struct PrimeEngine {
    config: EngineConfig,
    sieve: BitSieve,
    /// All primes <= sieve_limit, ascending.
    base_primes: Vec<u64>,
    /// How many of `base_primes` the trial-division prefilter uses.
    trial_len: usize,
    cache: Mutex<LruCache>,
}

impl fmt::Debug for PrimeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimeEngine")
            .field("config", &self.config)
            .field("base_primes", &self.base_primes.len())
            .field("trial_len", &self.trial_len)
            .finish_non_exhaustive()
    }
}

impl PrimeEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let sieve = BitSieve::eratosthenes(config.sieve_limit);
        let base_primes: Vec<u64> = sieve.iter_set_bits().map(|i| i as u64).collect();
        let trial_len = config.trial_primes.min(base_primes.len());
        info!(
            sieve_limit = config.sieve_limit,
            base_primes = base_primes.len(),
            trial_primes = trial_len,
            witnesses = %config.witnesses,
            cache_capacity = config.cache_capacity,
            "prime engine initialized"
        );
        Ok(PrimeEngine {
            cache: Mutex::new(LruCache::new(config.cache_capacity)),
            sieve,
            base_primes,
            trial_len,
            config,
        })
    }

    /// Engine with the default configuration (10^6 sieve, 50 trial primes,
    /// 12-witness set, 16K cache).
    pub fn with_defaults() -> Self {
        // Default config always validates
        Self::new(EngineConfig::default()).expect("default config is valid")
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Test whether `n` is prime.
    ///
    /// Deterministic for every `n` the configured witness set covers;
    /// `Err(WitnessBoundExceeded)` otherwise — never a probabilistic
    /// answer presented as fact.
    pub fn is_prime(&self, n: u64) -> Result<bool, EngineError> {
        if n < 2 {
            return Ok(false);
        }
        if n <= self.config.sieve_limit {
            return Ok(self.sieve.get(n as usize));
        }
        if !self.config.witnesses.covers(n) {
            return Err(EngineError::WitnessBoundExceeded {
                n,
                // covers() returned false, so a finite bound exists
                bound: self.config.witnesses.bound().unwrap_or(u64::MAX),
                witnesses: self.config.witnesses,
            });
        }

        if let Some(verdict) = self.cache.lock().expect("query cache poisoned").get(n) {
            return Ok(verdict);
        }

        // Trial division by the smallest primes rejects most composites
        // before any modular exponentiation.
        for &p in &self.base_primes[..self.trial_len] {
            if n % p == 0 {
                let verdict = n == p;
                self.cache_insert(n, verdict);
                return Ok(verdict);
            }
        }

        let verdict = miller_rabin(n, self.config.witnesses);
        self.cache_insert(n, verdict);
        Ok(verdict)
    }

    /// All primes in `[low, high]`, ascending.
    ///
    /// Allocates O(high − low) table space per call regardless of how
    /// large `high` is, plus O(sqrt(high)) for base primes when the
    /// configured sieve is too shallow to seed the strike loop.
    pub fn primes_in_range(&self, low: u64, high: u64) -> Vec<u64> {
        if high < 2 || high < low {
            return Vec::new();
        }
        let low = low.max(2);

        // Base primes must reach sqrt(high) or struck composites slip
        // through. Extend per-call when the configured sieve is shallower.
        let sqrt_high = isqrt(high);
        let extended;
        let base: &[u64] = if self.config.sieve_limit >= sqrt_high {
            &self.base_primes
        } else {
            debug!(
                sqrt_high,
                sieve_limit = self.config.sieve_limit,
                "extending base primes for range query"
            );
            extended = generate_primes(sqrt_high);
            &extended
        };

        let segments = segment_bounds(low, high);
        if segments.len() > PAR_SEGMENT_THRESHOLD {
            segments
                .par_iter()
                .map(|&(seg_low, seg_high)| sieve_segment(seg_low, seg_high, base))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect()
        } else {
            segments
                .iter()
                .flat_map(|&(seg_low, seg_high)| sieve_segment(seg_low, seg_high, base))
                .collect()
        }
    }

    /// Reset the query cache. Purely administrative: subsequent queries
    /// return identical results, only timing changes.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("query cache poisoned").clear();
    }

    /// Snapshot of cache hit/miss/eviction counters and occupancy.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().expect("query cache poisoned").stats()
    }

    fn cache_insert(&self, n: u64, verdict: bool) {
        self.cache
            .lock()
            .expect("query cache poisoned")
            .insert(n, verdict);
    }
}

/// Cut `[low, high]` into consecutive spans of at most `SEGMENT_SPAN`.
fn segment_bounds(low: u64, high: u64) -> Vec<(u64, u64)> {
    let mut segments = Vec::new();
    let mut start = low;
    loop {
        let end = start.saturating_add(SEGMENT_SPAN - 1).min(high);
        segments.push((start, end));
        if end == high {
            return segments;
        }
        start = end + 1;
    }
}

/// Sieve one segment `[seg_low, seg_high]` against the base primes and
/// collect the survivors. `seg_low` must be >= 2.
fn sieve_segment(seg_low: u64, seg_high: u64, base: &[u64]) -> Vec<u64> {
    let len = (seg_high - seg_low + 1) as usize;
    let mut table = BitSieve::new_all_set(len);

    for &p in base {
        let p_sq = p * p;
        if p_sq > seg_high {
            break; // base is ascending; no further prime strikes here
        }
        // First multiple of p that is >= seg_low and >= p^2. Multiples
        // below p^2 were struck by smaller primes; starting below seg_low
        // would index outside the table.
        let first = match seg_low.div_ceil(p).checked_mul(p) {
            Some(m) => m.max(p_sq),
            None => continue, // no multiple of p fits in [seg_low, u64::MAX]
        };
        let mut m = first;
        while m <= seg_high {
            table.clear((m - seg_low) as usize);
            match m.checked_add(p) {
                Some(next) => m = next,
                None => break,
            }
        }
    }

    table.iter_set_bits().map(|i| seg_low + i as u64).collect()
}

/// Integer square root: largest r with r*r <= n. Widened comparisons so
/// the adjustment never wraps near u64::MAX.
fn isqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    while (r as u128) * (r as u128) > n as u128 {
        r -= 1;
    }
    while ((r + 1) as u128) * ((r + 1) as u128) <= n as u128 {
        r += 1;
    }
    r
}
