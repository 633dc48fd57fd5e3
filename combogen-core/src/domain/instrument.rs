use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{dollars_to_cents, format_cents, Cents};

/// A tradable instrument: a symbol, a unit price, and an optional target
/// allocation weight (integer percentage of the budget).
///
/// Immutable after construction. A price refresh builds a fresh instrument
/// snapshot rather than mutating a shared one, so an in-flight search can
/// never observe a half-updated price set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instrument {
    symbol: String,
    price_cents: Cents,
    target_weight: Option<u8>,
}

impl Instrument {
    /// Create an instrument with no allocation target.
    ///
    /// The symbol is trimmed and uppercased; the price is rounded to 2
    /// fractional digits.
    pub fn new(symbol: &str, price: f64) -> Result<Self, DomainError> {
        Self::build(symbol, price, None)
    }

    /// Create an instrument carrying a target allocation weight (0–100).
    pub fn with_target_weight(symbol: &str, price: f64, weight: u8) -> Result<Self, DomainError> {
        if weight > 100 {
            return Err(DomainError::WeightOutOfRange { weight });
        }
        Self::build(symbol, price, Some(weight))
    }

    fn build(symbol: &str, price: f64, target_weight: Option<u8>) -> Result<Self, DomainError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DomainError::EmptySymbol);
        }
        let price_cents = dollars_to_cents(price).ok_or(DomainError::InvalidPrice { price })?;
        Ok(Self { symbol, price_cents, target_weight })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Unit price in cents.
    pub fn price_cents(&self) -> Cents {
        self.price_cents
    }

    /// Unit price in dollars.
    pub fn price(&self) -> f64 {
        self.price_cents as f64 / 100.0
    }

    pub fn target_weight(&self) -> Option<u8> {
        self.target_weight
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ${}", self.symbol, format_cents(self.price_cents))
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("instrument symbol is empty")]
    EmptySymbol,

    #[error("invalid price: {price}")]
    InvalidPrice { price: f64 },

    #[error("target weight {weight} is out of range 0-100")]
    WeightOutOfRange { weight: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalized_to_uppercase() {
        let inst = Instrument::new(" aapl ", 180.25).unwrap();
        assert_eq!(inst.symbol(), "AAPL");
    }

    #[test]
    fn test_price_rounded_to_cents() {
        let inst = Instrument::new("SPY", 450.128).unwrap();
        assert_eq!(inst.price_cents(), 45013);
        assert_eq!(inst.price(), 450.13);
    }

    #[test]
    fn test_empty_symbol_rejected() {
        assert!(matches!(Instrument::new("   ", 10.0), Err(DomainError::EmptySymbol)));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            Instrument::new("SPY", -1.0),
            Err(DomainError::InvalidPrice { .. })
        ));
        assert!(Instrument::new("SPY", f64::NAN).is_err());
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        assert!(matches!(
            Instrument::with_target_weight("SPY", 10.0, 101),
            Err(DomainError::WeightOutOfRange { weight: 101 })
        ));
        assert!(Instrument::with_target_weight("SPY", 10.0, 100).is_ok());
    }

    #[test]
    fn test_display() {
        let inst = Instrument::new("msft", 410.5).unwrap();
        assert_eq!(inst.to_string(), "MSFT: $410.50");
    }
}
