//! Quote retrieval — the boundary between the engine and market data.

pub mod provider;
pub mod yahoo;

pub use provider::{Quote, QuoteError, QuoteProvider};
pub use yahoo::YahooQuotes;
