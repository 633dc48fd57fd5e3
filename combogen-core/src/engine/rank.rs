use std::cmp::Reverse;

use crate::domain::{Cents, Combination};

/// Orders survivors and returns the best `top`.
///
/// Plain mode (no instrument carries a target weight): cost descending —
/// the combination spending the most of the budget wins. Weighted mode
/// (any instrument carries a weight): fit score ascending, cost descending
/// as the tie-break. `top` is clamped to the survivor count; asking for
/// more than exist returns all of them.
pub fn rank(mut survivors: Vec<Combination>, cash: Cents, top: usize) -> Vec<Combination> {
    let weighted = survivors.first().is_some_and(|c| {
        c.holdings()
            .iter()
            .any(|h| h.instrument().target_weight().is_some())
    });

    if weighted {
        survivors.sort_by_key(|c| (c.fit_score(cash), Reverse(c.total_cost_cents())));
    } else {
        survivors.sort_by_key(|c| Reverse(c.total_cost_cents()));
    }
    survivors.truncate(top);
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Instrument;
    use crate::engine::{CombinationSearch, SearchSpace};

    fn plain_space(cash_cents: u64) -> SearchSpace {
        let instruments = vec![
            Instrument::new("A", 10.0).unwrap(),
            Instrument::new("B", 20.0).unwrap(),
        ];
        SearchSpace::new(instruments, cash_cents).unwrap()
    }

    fn weighted_space(cash_cents: u64) -> SearchSpace {
        let instruments = vec![
            Instrument::with_target_weight("A", 10.0, 50).unwrap(),
            Instrument::with_target_weight("B", 10.0, 50).unwrap(),
        ];
        SearchSpace::new(instruments, cash_cents).unwrap()
    }

    #[test]
    fn test_plain_mode_sorts_by_cost_descending() {
        let space = plain_space(10_000);
        let survivors = CombinationSearch::new(&space).run();
        let ranked = rank(survivors, space.cash_cents(), 10);

        assert!(!ranked.is_empty());
        for pair in ranked.windows(2) {
            assert!(pair[0].total_cost_cents() >= pair[1].total_cost_cents());
        }
    }

    #[test]
    fn test_top_is_clamped_to_survivor_count() {
        let space = plain_space(3500);
        let survivors = CombinationSearch::new(&space).run();
        let available = survivors.len();
        let ranked = rank(survivors, space.cash_cents(), available + 100);
        assert_eq!(ranked.len(), available);
    }

    #[test]
    fn test_weighted_mode_best_fit_first() {
        // $40 split 50/50 across two $10 instruments: 2xA+2xB is exact.
        let space = weighted_space(4000);
        let survivors = CombinationSearch::new(&space).run();
        let ranked = rank(survivors, space.cash_cents(), 5);

        let best = &ranked[0];
        assert_eq!(best.fit_score(space.cash_cents()), 0);
        let qty: Vec<u64> = best.holdings().iter().map(|h| h.quantity()).collect();
        assert_eq!(qty, vec![2, 2]);

        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (fa, fb) = (a.fit_score(4000), b.fit_score(4000));
            assert!(fa <= fb);
            if fa == fb {
                assert!(a.total_cost_cents() >= b.total_cost_cents());
            }
        }
    }

    #[test]
    fn test_rank_of_empty_is_empty() {
        assert!(rank(Vec::new(), 1000, 5).is_empty());
    }
}
