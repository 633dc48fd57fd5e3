use std::sync::Arc;

use serde::Serialize;

use super::EngineError;
use crate::domain::{Cents, Combination, Holding, Instrument, Symbol};

/// The space of all quantity assignments for a set of instruments and a
/// cash budget.
///
/// Every combination is identified by a single integer in `[0, N)` through
/// a mixed-radix mapping: position `i` has radix `max_quantity_i + 1`
/// (the `+1` is the zero-quantity choice), and digit extraction recovers
/// each instrument's quantity. Index 0 is the all-zero combination, index
/// `N - 1` the all-maximum one; beyond that the index carries no ordering
/// semantics — it is a bijective label.
///
/// The space holds an immutable price snapshot. Refreshed prices mean a new
/// set of instruments and a new space.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    instruments: Vec<Arc<Instrument>>,
    /// Per-position radix: max affordable quantity + 1.
    radices: Vec<u64>,
    cash_cents: Cents,
    total: u64,
    floor_cents: Cents,
}

impl SearchSpace {
    /// Derive per-instrument caps and the index range from a price snapshot
    /// and a budget.
    ///
    /// Rejects instruments priced at zero (their cap would be unbounded),
    /// weight subsets that do not sum to 100, and instrument sets whose
    /// combination count does not fit in `u64`.
    pub fn new(instruments: Vec<Instrument>, cash_cents: Cents) -> Result<Self, EngineError> {
        validate_weights(&instruments)?;

        let mut radices = Vec::with_capacity(instruments.len());
        for instrument in &instruments {
            if instrument.price_cents() == 0 {
                return Err(EngineError::InvalidInstrument {
                    symbol: instrument.symbol().to_string(),
                });
            }
            radices.push(cash_cents / instrument.price_cents() + 1);
        }

        let mut total: u64 = 1;
        for &radix in &radices {
            total = total.checked_mul(radix).ok_or_else(|| {
                EngineError::CombinationSpaceOverflow {
                    instruments: instruments.len(),
                    caps: radices.iter().map(|r| r - 1).collect(),
                }
            })?;
        }

        let floor_cents = spend_band_floor(cash_cents, total);
        Ok(Self {
            instruments: instruments.into_iter().map(Arc::new).collect(),
            radices,
            cash_cents,
            total,
            floor_cents,
        })
    }

    pub fn instruments(&self) -> &[Arc<Instrument>] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn cash_cents(&self) -> Cents {
        self.cash_cents
    }

    /// Largest quantity of instrument `i` alone affordable with the full
    /// budget: `floor(cash / price_i)`.
    pub fn max_quantity(&self, i: usize) -> u64 {
        self.radices[i] - 1
    }

    /// Size of the index range: `∏ (max_quantity_i + 1)`.
    pub fn total_combinations(&self) -> u64 {
        self.total
    }

    /// Lower bound on acceptable combination cost.
    ///
    /// Combinations must spend more than this to be kept (see
    /// [`spend_band_floor`] for the policy).
    pub fn spend_band_floor(&self) -> Cents {
        self.floor_cents
    }

    /// True if `cost` falls in the admissible band `(floor, cash]`.
    pub fn in_band(&self, cost: Cents) -> bool {
        cost > self.floor_cents && cost <= self.cash_cents
    }

    /// Cost of the combination identified by `id`, without materializing it.
    ///
    /// This is the hot path — called once per index in the full range. One
    /// walk over the instrument list, extracting `id mod radix_i` as the
    /// quantity digit and accumulating `quantity × price_i`.
    pub fn cost_of(&self, mut id: u64) -> Cents {
        debug_assert!(id < self.total);
        let mut cost: Cents = 0;
        for (instrument, &radix) in self.instruments.iter().zip(&self.radices) {
            cost += (id % radix) * instrument.price_cents();
            id /= radix;
        }
        cost
    }

    /// Materialize the combination identified by `id`.
    ///
    /// Same digit walk as [`cost_of`], but allocates the full holding list.
    /// Only called for indices that already passed the cost filter.
    pub fn decode(&self, mut id: u64) -> Combination {
        debug_assert!(id < self.total);
        let mut holdings = Vec::with_capacity(self.instruments.len());
        for (instrument, &radix) in self.instruments.iter().zip(&self.radices) {
            holdings.push(Holding::new(Arc::clone(instrument), id % radix));
            id /= radix;
        }
        Combination::new(holdings)
    }

    /// Inverse of [`decode`]: recover the index of a combination produced
    /// from this space.
    pub fn index_of(&self, combination: &Combination) -> u64 {
        let mut id: u64 = 0;
        let mut stride: u64 = 1;
        for (holding, &radix) in combination.holdings().iter().zip(&self.radices) {
            id += holding.quantity() * stride;
            stride *= radix;
        }
        id
    }

    /// Summary for presentation layers: per-symbol caps and the range size.
    pub fn summary(&self) -> SpaceSummary {
        SpaceSummary {
            max_quantities: self
                .instruments
                .iter()
                .enumerate()
                .map(|(i, instrument)| MaxQuantity {
                    symbol: instrument.symbol().to_string(),
                    quantity: self.max_quantity(i),
                })
                .collect(),
            total_combinations: self.total,
        }
    }
}

/// Spend-band policy: keep only combinations spending more than this.
///
/// Small spaces (N ≤ 100 000) keep the upper half of the spend range;
/// larger spaces narrow the band toward the top so the expected survivor
/// count stays roughly bounded (~10 000) however large N grows. A
/// containment heuristic, not an optimality guarantee — genuinely good but
/// not-near-maximal allocations can fall below the floor.
fn spend_band_floor(cash_cents: Cents, total: u64) -> Cents {
    let factor = if total <= 100_000 {
        0.5
    } else {
        1.0 - 1.0e4 / total as f64
    };
    (cash_cents as f64 * factor) as Cents
}

fn validate_weights(instruments: &[Instrument]) -> Result<(), EngineError> {
    let weights: Vec<u32> = instruments
        .iter()
        .filter_map(|i| i.target_weight().map(u32::from))
        .collect();
    if weights.is_empty() {
        return Ok(());
    }
    let sum: u32 = weights.iter().sum();
    if sum != 100 {
        return Err(EngineError::WeightConfiguration { sum });
    }
    Ok(())
}

/// Search-space summary for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct SpaceSummary {
    pub max_quantities: Vec<MaxQuantity>,
    pub total_combinations: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaxQuantity {
    pub symbol: Symbol,
    pub quantity: u64,
}
