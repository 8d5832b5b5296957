//! # Miller–Rabin — Deterministic Strong Probable-Prime Testing
//!
//! A Miller–Rabin test over u64 with *fixed* witness sets whose
//! deterministic validity bounds are known exactly. Within its bound a
//! witness set has zero error probability; the test is a proof, not a
//! probabilistic screen. Callers (the query engine) are required to check
//! [`WitnessSet::covers`] before trusting a result — querying past the
//! bound is a correctness bug, not a slow path.
//!
//! ## Algorithm
//!
//! Write n − 1 = 2^r · d with d odd. For each witness a < n compute
//! x = a^d mod n; the witness passes if x ≡ ±1, or if any of the r − 1
//! subsequent squarings of x reaches n − 1. A witness that never reaches
//! n − 1 proves n composite and short-circuits the whole test.
//!
//! All modular arithmetic runs through [`MontgomeryCtx`]: one context per
//! call, every multiplication a multiply+shift instead of a u128 division.
//!
//! ## Witness bounds
//!
//! - {2, 3, 5, 7}: deterministic for n < 3,215,031,751. That bound is
//!   sharp — 3,215,031,751 = 151 · 751 · 28351 is the first strong
//!   pseudoprime to all four bases.
//! - {2, 3, 5, 7, 11, 13}: deterministic for n < 3,474,749,660,383.
//! - {2, ..., 37} (12 witnesses): deterministic for n < 3.3 × 10^24,
//!   which covers every u64.
//!
//! ## References
//!
//! - G. Jaeschke, "On strong pseudoprimes to several bases", Mathematics
//!   of Computation, 61(204):915–926, 1993.
//! - OEIS A014233: smallest odd number requiring k Miller–Rabin witnesses.

use serde::{Deserialize, Serialize};

use crate::sieve::MontgomeryCtx;

/// First strong pseudoprime to bases {2, 3, 5, 7}.
const BOUND_SMALL: u64 = 3_215_031_751;

/// First strong pseudoprime to bases {2, 3, 5, 7, 11, 13}.
const BOUND_MEDIUM: u64 = 3_474_749_660_383;

/// A fixed Miller–Rabin witness set with a known deterministic bound.
///
/// Chosen once per engine (configuration surface), never per call. Larger
/// sets extend the bound at a proportional per-test cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WitnessSet {
    /// {2, 3, 5, 7} — valid for n < 3,215,031,751.
    Small,
    /// {2, 3, 5, 7, 11, 13} — valid for n < 3,474,749,660,383.
    Medium,
    /// {2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37} — valid for every u64.
    #[default]
    Extended,
}

impl WitnessSet {
    /// The ordered witness bases.
    pub fn bases(&self) -> &'static [u64] {
        match self {
            WitnessSet::Small => &[2, 3, 5, 7],
            WitnessSet::Medium => &[2, 3, 5, 7, 11, 13],
            WitnessSet::Extended => &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37],
        }
    }

    /// Exclusive upper bound below which this set is deterministic.
    /// `None` means the bound exceeds u64::MAX (every input is covered).
    pub fn bound(&self) -> Option<u64> {
        match self {
            WitnessSet::Small => Some(BOUND_SMALL),
            WitnessSet::Medium => Some(BOUND_MEDIUM),
            WitnessSet::Extended => None,
        }
    }

    /// Whether a result for `n` from this set is deterministic.
    #[inline]
    pub fn covers(&self, n: u64) -> bool {
        match self.bound() {
            Some(bound) => n < bound,
            None => true,
        }
    }
}

impl std::fmt::Display for WitnessSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WitnessSet::Small => write!(f, "small"),
            WitnessSet::Medium => write!(f, "medium"),
            WitnessSet::Extended => write!(f, "extended"),
        }
    }
}

/// Miller–Rabin primality test of `n` against the given witness set.
///
/// Deterministic (a proof) only while `witnesses.covers(n)`; the engine
/// enforces that precondition and surfaces a violation as an error.
pub fn miller_rabin(n: u64, witnesses: WitnessSet) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n & 1 == 0 {
        return false;
    }

    // n - 1 = 2^r * d with d odd; r >= 1 since n is odd and > 2
    let r = (n - 1).trailing_zeros();
    let d = (n - 1) >> r;

    let ctx = MontgomeryCtx::new(n);
    let one = ctx.one();
    let neg_one = ctx.to_mont(n - 1);

    'witness: for &a in witnesses.bases() {
        if a >= n {
            continue; // witness not applicable to very small n
        }
        let mut x = ctx.pow_mod(ctx.to_mont(a), d);
        if x == one || x == neg_one {
            continue;
        }
        for _ in 0..r - 1 {
            x = ctx.sqr(x);
            if x == neg_one {
                continue 'witness;
            }
        }
        return false; // this witness proves n composite
    }
    true
}
