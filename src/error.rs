//! Engine error types.
//!
//! Every operation either returns a correct answer or fails fast with a
//! named precondition violation — there are no retries and no partial
//! results. Silent wrong answers (a witness set trusted past its bound)
//! are promoted to hard errors.

use crate::miller_rabin::WitnessSet;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A query landed above the deterministic validity bound of the
    /// configured witness set. The result would be probabilistic, which
    /// this engine never silently returns.
    #[error(
        "n = {n} exceeds the deterministic bound {bound} of witness set '{witnesses}'; \
         configure a larger witness set"
    )]
    WitnessBoundExceeded {
        n: u64,
        bound: u64,
        witnesses: WitnessSet,
    },

    /// Engine configuration rejected at construction.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    /// Config file could not be read.
    #[error("failed to read config file")]
    ConfigIo(#[from] std::io::Error),

    /// Config file could not be parsed as TOML.
    #[error("failed to parse config file")]
    ConfigParse(#[from] toml::de::Error),
}
