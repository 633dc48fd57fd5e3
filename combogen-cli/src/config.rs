//! Plan configuration: TOML file support and `SYM=VALUE` flag parsing.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// A plan config file.
///
/// ```toml
/// cash = 2500.0
/// top = 20
///
/// [[instruments]]
/// symbol = "AAPL"
/// weight = 60
///
/// [[instruments]]
/// symbol = "MSFT"
/// weight = 40
/// price = 410.50   # manual price, skips the quote provider
/// ```
#[derive(Debug, Deserialize)]
pub struct PlanConfig {
    /// Cash budget in dollars.
    pub cash: f64,

    /// How many combinations to show.
    #[serde(default = "default_top")]
    pub top: usize,

    #[serde(default)]
    pub instruments: Vec<InstrumentConfig>,
}

#[derive(Debug, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,

    /// Target allocation weight (integer percent).
    pub weight: Option<u8>,

    /// Manual price in dollars. When set, the quote provider is skipped
    /// for this symbol.
    pub price: Option<f64>,
}

fn default_top() -> usize {
    20
}

impl PlanConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: PlanConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Parse repeated `SYM=PCT` weight flags. Symbols are uppercased.
pub fn parse_weights(raw: &[String]) -> Result<BTreeMap<String, u8>> {
    let mut weights = BTreeMap::new();
    for entry in raw {
        let (symbol, value) = split_assignment(entry, "--weight")?;
        let weight: u8 = value
            .parse()
            .with_context(|| format!("invalid weight in '--weight {entry}'"))?;
        weights.insert(symbol, weight);
    }
    Ok(weights)
}

/// Parse repeated `SYM=PRICE` price-override flags. Symbols are uppercased.
pub fn parse_prices(raw: &[String]) -> Result<BTreeMap<String, f64>> {
    let mut prices = BTreeMap::new();
    for entry in raw {
        let (symbol, value) = split_assignment(entry, "--price")?;
        let price: f64 = value
            .parse()
            .with_context(|| format!("invalid price in '--price {entry}'"))?;
        prices.insert(symbol, price);
    }
    Ok(prices)
}

fn split_assignment(entry: &str, flag: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((symbol, value)) if !symbol.trim().is_empty() => {
            Ok((symbol.trim().to_uppercase(), value.trim().to_string()))
        }
        _ => bail!("expected SYM=VALUE in '{flag} {entry}'"),
    }
}
