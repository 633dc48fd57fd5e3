//! Combination search engine: mixed-radix space, parallel scan, ranking.

pub mod rank;
pub mod search;
pub mod space;

pub use rank::rank;
pub use search::CombinationSearch;
pub use space::{MaxQuantity, SearchSpace, SpaceSummary};

use thiserror::Error;

/// Errors raised while constructing a search space.
///
/// All engine failures are input-validation failures caught up front; once
/// a scan begins, individual index evaluations cannot fail.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("instrument '{symbol}' has a non-positive price")]
    InvalidInstrument { symbol: String },

    #[error("target weights must sum to 100, got {sum}")]
    WeightConfiguration { sum: u32 },

    #[error(
        "combination space overflow: {instruments} instruments with caps {caps:?} \
         exceed the 64-bit index range — lower the budget or drop symbols"
    )]
    CombinationSpaceOverflow { instruments: usize, caps: Vec<u64> },
}
