use rayon::prelude::*;

use super::space::SearchSpace;
use crate::domain::Combination;

/// Exhaustive scan over a search space.
///
/// Every id in `[0, N)` is evaluated exactly once: the allocation-free
/// `cost_of` pass rejects the vast majority of indices, and only spend-band
/// survivors are decoded into full combinations. Ids are independent, so
/// the range fans out across the rayon pool and survivors are gathered
/// through rayon's per-thread collection — no shared lock on the insert
/// path. Collection order is unspecified; the index carries no ordering
/// semantics anyway.
pub struct CombinationSearch<'a> {
    space: &'a SearchSpace,
    parallel: bool,
}

impl<'a> CombinationSearch<'a> {
    pub fn new(space: &'a SearchSpace) -> Self {
        Self { space, parallel: true }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Runs the scan and returns every surviving combination.
    ///
    /// A survivor's cost lies in `(spend_band_floor, cash]` and every
    /// holding buys at least one unit — an allocation that skips an
    /// instrument entirely is not a genuine combination.
    pub fn run(&self) -> Vec<Combination> {
        let space = self.space;
        let keep = |id: u64| -> Option<Combination> {
            if !space.in_band(space.cost_of(id)) {
                return None;
            }
            let combination = space.decode(id);
            if combination.has_zero_quantity() {
                return None;
            }
            Some(combination)
        };

        if self.parallel {
            (0..space.total_combinations())
                .into_par_iter()
                .filter_map(keep)
                .collect()
        } else {
            (0..space.total_combinations()).filter_map(keep).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Instrument;

    fn space(entries: &[(&str, f64)], cash_cents: u64) -> SearchSpace {
        let instruments = entries
            .iter()
            .map(|&(s, p)| Instrument::new(s, p).unwrap())
            .collect();
        SearchSpace::new(instruments, cash_cents).unwrap()
    }

    fn quantities(c: &Combination) -> Vec<u64> {
        c.holdings().iter().map(|h| h.quantity()).collect()
    }

    #[test]
    fn test_survivors_satisfy_band_and_positivity() {
        let space = space(&[("A", 10.0), ("B", 20.0)], 3500);
        let survivors = CombinationSearch::new(&space).run();
        for combination in &survivors {
            let cost = combination.total_cost_cents();
            assert!(cost > space.spend_band_floor());
            assert!(cost <= space.cash_cents());
            assert!(!combination.has_zero_quantity());
        }
    }

    #[test]
    fn test_end_to_end_two_instruments() {
        // A=$10, B=$20, cash=$35: caps 3 and 1, N=8. The only combination
        // in the upper spend band with every quantity positive is 1xA+1xB.
        let space = space(&[("A", 10.0), ("B", 20.0)], 3500);
        assert_eq!(space.total_combinations(), 8);

        let survivors = CombinationSearch::new(&space).run();
        assert_eq!(survivors.len(), 1);
        assert_eq!(quantities(&survivors[0]), vec![1, 1]);
        assert_eq!(survivors[0].total_cost_cents(), 3000);
    }

    #[test]
    fn test_zero_quantity_combinations_discarded() {
        // 3xA = $30 is in the band but buys no B, so it must not survive.
        let space = space(&[("A", 10.0), ("B", 20.0)], 3500);
        let survivors = CombinationSearch::new(&space).run();
        assert!(survivors.iter().all(|c| !c.has_zero_quantity()));
        assert!(!survivors.iter().any(|c| quantities(c) == vec![3, 0]));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let space = space(&[("A", 3.5), ("B", 7.25), ("C", 12.0)], 10_000);
        let mut parallel = CombinationSearch::new(&space).run();
        let mut serial = CombinationSearch::new(&space).with_parallelism(false).run();

        let key = |c: &Combination| space.index_of(c);
        parallel.sort_by_key(key);
        serial.sort_by_key(key);
        assert_eq!(parallel, serial);
        assert!(!parallel.is_empty());
    }

    #[test]
    fn test_empty_space_yields_nothing() {
        let space = SearchSpace::new(vec![], 3500).unwrap();
        assert_eq!(space.total_combinations(), 1);
        assert!(CombinationSearch::new(&space).run().is_empty());
    }
}
