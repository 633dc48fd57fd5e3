use super::{Cents, Holding};

/// A complete assignment of quantities to every instrument in a run, in
/// search-space order.
///
/// Combinations are produced by decoding an index, evaluated, and either
/// kept or discarded — never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    holdings: Vec<Holding>,
}

impl Combination {
    pub(crate) fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Total cost in cents across all holdings.
    pub fn total_cost_cents(&self) -> Cents {
        self.holdings.iter().map(Holding::cost_cents).sum()
    }

    /// True if any holding buys zero units of its instrument.
    pub fn has_zero_quantity(&self) -> bool {
        self.holdings.iter().any(|h| h.quantity() == 0)
    }

    /// Deviation from the target allocation, lower is better.
    ///
    /// Sum over weighted instruments of `round(|100 * cost_i / cash - w_i|)`.
    /// Instruments without a target weight contribute nothing.
    pub fn fit_score(&self, cash: Cents) -> u32 {
        if cash == 0 {
            return 0;
        }
        self.holdings
            .iter()
            .filter_map(|h| {
                let weight = h.instrument().target_weight()?;
                let actual_pct = 100.0 * h.cost_cents() as f64 / cash as f64;
                Some((actual_pct - weight as f64).abs().round() as u32)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Instrument;

    fn combo(entries: &[(&str, f64, Option<u8>, u64)]) -> Combination {
        let holdings = entries
            .iter()
            .map(|&(sym, price, weight, qty)| {
                let inst = match weight {
                    Some(w) => Instrument::with_target_weight(sym, price, w).unwrap(),
                    None => Instrument::new(sym, price).unwrap(),
                };
                Holding::new(Arc::new(inst), qty)
            })
            .collect();
        Combination::new(holdings)
    }

    #[test]
    fn test_total_cost_sums_holdings() {
        let c = combo(&[("A", 10.0, None, 3), ("B", 20.0, None, 1)]);
        assert_eq!(c.total_cost_cents(), 5000);
    }

    #[test]
    fn test_has_zero_quantity() {
        assert!(combo(&[("A", 10.0, None, 3), ("B", 20.0, None, 0)]).has_zero_quantity());
        assert!(!combo(&[("A", 10.0, None, 3), ("B", 20.0, None, 1)]).has_zero_quantity());
    }

    #[test]
    fn test_fit_score_zero_when_on_target() {
        // 2 x $10 each on a $40 budget is exactly 50/50.
        let c = combo(&[("A", 10.0, Some(50), 2), ("B", 10.0, Some(50), 2)]);
        assert_eq!(c.fit_score(4000), 0);
    }

    #[test]
    fn test_fit_score_counts_deviation_per_instrument() {
        // A spends 75% against a 50 target (off by 25); B spends 25%
        // against a 50 target (off by 25).
        let c = combo(&[("A", 10.0, Some(50), 3), ("B", 10.0, Some(50), 1)]);
        assert_eq!(c.fit_score(4000), 50);
    }

    #[test]
    fn test_unweighted_instruments_do_not_contribute() {
        let c = combo(&[("A", 10.0, Some(100), 4), ("B", 10.0, None, 0)]);
        assert_eq!(c.fit_score(4000), 0);
    }
}
