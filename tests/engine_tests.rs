//! End-to-end tests of the public engine API.
//!
//! No database, network, or filesystem access required — these exercise the
//! three engine operations against brute-force oracles and curated values,
//! including the boundaries where query routing changes (sieve limit,
//! witness bounds, segment edges).

use primecore::{EngineConfig, EngineError, PrimeEngine, WitnessSet};

/// Brute-force oracle: trial division up to sqrt(n).
fn trial_division(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

// --- is_prime against the oracle ---

#[test]
fn is_prime_matches_trial_division_to_10000() {
    let engine = PrimeEngine::with_defaults();
    for n in 0u64..=10_000 {
        assert_eq!(
            engine.is_prime(n).unwrap(),
            trial_division(n),
            "mismatch at n={}",
            n
        );
    }
}

/// Same exhaustive check with a tiny sieve, so most of [0, 10000] routes
/// through trial division and Miller-Rabin instead of the lookup table.
#[test]
fn is_prime_matches_oracle_with_tiny_sieve() {
    let engine = PrimeEngine::new(EngineConfig {
        sieve_limit: 100,
        trial_primes: 5,
        ..Default::default()
    })
    .unwrap();
    for n in 0u64..=10_000 {
        assert_eq!(
            engine.is_prime(n).unwrap(),
            trial_division(n),
            "mismatch at n={}",
            n
        );
    }
}

#[test]
fn curated_primes_and_composites() {
    let engine = PrimeEngine::with_defaults();
    // Primes straddling the default sieve limit of 10^6
    for &p in &[
        2u64, 3, 5, 7, 97, 1009, 9973, 104729, 999983, 1000003, 15485863, 32452843, 49979687,
        2147483647,
    ] {
        assert!(engine.is_prime(p).unwrap(), "{} should be prime", p);
    }
    // Composites: perfect squares, small-factor multiples, and a product
    // of two primes both above the trial-division cutoff
    for &c in &[
        0u64,
        1,
        4,
        9,
        100,
        1000,
        999981,
        1000001, // 101 * 9901
        1000002,
        1000036000099, // 1000003 * 1000033
        999983u64 * 999983,
    ] {
        assert!(!engine.is_prime(c).unwrap(), "{} should be composite", c);
    }
}

#[test]
fn sieve_limit_boundary_and_one_past() {
    let engine = PrimeEngine::with_defaults();
    // 1_000_000 = 2^6 * 5^6 (sieve path), 1_000_001 = 101 * 9901 (MR path)
    assert!(!engine.is_prime(1_000_000).unwrap());
    assert!(!engine.is_prime(1_000_001).unwrap());
    assert!(engine.is_prime(999_983).unwrap()); // largest prime below the limit
    assert!(engine.is_prime(1_000_003).unwrap()); // smallest prime above it
}

// --- a fixed interval against the brute-force oracle ---

#[test]
fn range_10000_to_10200_matches_brute_force() {
    let engine = PrimeEngine::with_defaults();
    let ranged = engine.primes_in_range(10_000, 10_200);
    let brute: Vec<u64> = (10_000..=10_200).filter(|&n| trial_division(n)).collect();
    assert_eq!(ranged, brute);
    assert_eq!(ranged.first(), Some(&10_007));
    assert_eq!(ranged.last(), Some(&10_193));
}

// --- primes_in_range boundaries ---

#[test]
fn range_boundaries() {
    let engine = PrimeEngine::with_defaults();
    assert!(engine.primes_in_range(0, 1).is_empty());
    assert_eq!(engine.primes_in_range(2, 2), vec![2]);
    assert_eq!(engine.primes_in_range(0, 2), vec![2]);
    assert!(engine.primes_in_range(14, 16).is_empty());
    assert!(engine.primes_in_range(100, 10).is_empty());
}

#[test]
fn range_starting_above_sieve_limit() {
    let engine = PrimeEngine::with_defaults();
    let ranged = engine.primes_in_range(999_900, 1_000_100);
    let filtered: Vec<u64> = (999_900..=1_000_100)
        .filter(|&n| engine.is_prime(n).unwrap())
        .collect();
    assert_eq!(ranged, filtered);
    assert!(ranged.contains(&999_983));
    assert!(ranged.contains(&1_000_003));
}

/// Far above the sieve: a span near 10^12 whose sqrt is covered by the
/// default base primes, and one near 10^13 that forces per-call extension.
#[test]
fn range_far_above_sieve_limit() {
    let engine = PrimeEngine::with_defaults();

    let lo = 1_000_000_000_000u64;
    let primes = engine.primes_in_range(lo, lo + 100);
    assert_eq!(primes, vec![lo + 39, lo + 61, lo + 63, lo + 91]);

    let lo = 10_000_000_000_000u64;
    let primes = engine.primes_in_range(lo, lo + 200);
    assert_eq!(primes, vec![lo + 37, lo + 51, lo + 99, lo + 129, lo + 183]);
}

// --- idempotence and cache transparency ---

#[test]
fn repeated_queries_are_idempotent() {
    let engine = PrimeEngine::with_defaults();
    let values: Vec<u64> = vec![2, 999_983, 999_981, 1_000_003, 1_000_036_000_099, 104_729];
    let first: Vec<bool> = values.iter().map(|&n| engine.is_prime(n).unwrap()).collect();
    for _ in 0..3 {
        let again: Vec<bool> = values.iter().map(|&n| engine.is_prime(n).unwrap()).collect();
        assert_eq!(first, again);
    }
    engine.clear_cache();
    let after_clear: Vec<bool> = values.iter().map(|&n| engine.is_prime(n).unwrap()).collect();
    assert_eq!(first, after_clear);
}

#[test]
fn cache_stats_reflect_traffic() {
    let engine = PrimeEngine::with_defaults();
    assert_eq!(engine.cache_stats().hits + engine.cache_stats().misses, 0);
    engine.is_prime(1_000_003).unwrap(); // miss
    engine.is_prime(1_000_003).unwrap(); // hit
    let stats = engine.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.len, 1);
    engine.clear_cache();
    assert_eq!(engine.cache_stats().len, 0);
}

// --- witness bound enforcement ---

#[test]
fn small_witness_set_refuses_out_of_bound_queries() {
    let engine = PrimeEngine::new(EngineConfig {
        witnesses: WitnessSet::Small,
        ..Default::default()
    })
    .unwrap();
    assert!(engine.is_prime(2_147_483_647).unwrap()); // within bound
    let err = engine.is_prime(10_000_000_019).unwrap_err();
    assert!(matches!(err, EngineError::WitnessBoundExceeded { .. }));
    let msg = err.to_string();
    assert!(msg.contains("3215031751"), "message was: {msg}");
}

#[test]
fn extended_set_handles_u64_extremes() {
    let engine = PrimeEngine::with_defaults();
    assert!(engine.is_prime(18_446_744_073_709_551_557).unwrap());
    assert!(!engine.is_prime(u64::MAX).unwrap());
    assert!(!engine.is_prime(3_825_123_056_546_413_051).unwrap());
}

// --- construction errors ---

#[test]
fn invalid_config_is_rejected_at_construction() {
    let err = PrimeEngine::new(EngineConfig {
        cache_capacity: 0,
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}

/// `Result<PrimeEngine, _>` combinators like `unwrap_err` require the Ok
/// type to be `Debug`; the engine formats as a summary, not a bit dump.
#[test]
fn engine_implements_debug() {
    let engine = PrimeEngine::with_defaults();
    let rendered = format!("{:?}", engine);
    assert!(rendered.contains("PrimeEngine"));
    assert!(rendered.contains("base_primes"));
}
