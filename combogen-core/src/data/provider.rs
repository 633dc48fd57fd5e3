//! Quote provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over price sources (Yahoo Finance,
//! fixed fixtures in tests) so implementations can be swapped and mocked.
//! The engine never talks to a provider directly: callers resolve a full
//! instrument set first and hand the engine an immutable price snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A spot quote for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    /// Unit price in dollars. Rounded to 2 fractional digits when an
    /// instrument is built from it.
    pub price: f64,
    /// Exchange timestamp, when the provider reports one.
    pub as_of: Option<DateTime<Utc>>,
}

/// Structured error types for quote retrieval.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("quote error: {0}")]
    Other(String),
}

/// Trait for quote sources.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the current price for one symbol.
    fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;

    /// Fetch prices for many symbols. Failures are reported per symbol so
    /// the caller can drop or replace unresolved ones.
    fn fetch_quotes(&self, symbols: &[String]) -> Vec<(String, Result<Quote, QuoteError>)> {
        symbols
            .iter()
            .map(|symbol| (symbol.clone(), self.fetch_quote(symbol)))
            .collect()
    }
}
