//! Domain types for combogen

pub mod combination;
pub mod holding;
pub mod instrument;

pub use combination::Combination;
pub use holding::Holding;
pub use instrument::{DomainError, Instrument};

/// Symbol type alias
pub type Symbol = String;

/// Money amount in integer cents.
///
/// All engine arithmetic is done in cents so the cost-only scan and the
/// decoded-combination path agree exactly, and per-instrument caps are
/// plain integer division.
pub type Cents = u64;

/// Converts a dollar amount to cents, rounding to 2 fractional digits.
///
/// Returns `None` for negative or non-finite input, or amounts too large
/// to represent.
pub fn dollars_to_cents(dollars: f64) -> Option<Cents> {
    if !dollars.is_finite() || dollars < 0.0 {
        return None;
    }
    let cents = (dollars * 100.0).round();
    if cents > u64::MAX as f64 {
        return None;
    }
    Some(cents as Cents)
}

/// Formats a cent amount as a dollar string, e.g. `1234` → `"12.34"`.
pub fn format_cents(cents: Cents) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollars_to_cents_rounds_to_two_digits() {
        assert_eq!(dollars_to_cents(180.256), Some(18026));
        assert_eq!(dollars_to_cents(180.254), Some(18025));
        assert_eq!(dollars_to_cents(0.0), Some(0));
        assert_eq!(dollars_to_cents(35.0), Some(3500));
    }

    #[test]
    fn test_dollars_to_cents_rejects_invalid() {
        assert_eq!(dollars_to_cents(-0.01), None);
        assert_eq!(dollars_to_cents(f64::NAN), None);
        assert_eq!(dollars_to_cents(f64::INFINITY), None);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(3500), "35.00");
        assert_eq!(format_cents(7), "0.07");
        assert_eq!(format_cents(18026), "180.26");
    }
}
