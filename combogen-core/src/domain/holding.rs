use std::fmt;
use std::sync::Arc;

use super::{Cents, Instrument};

/// An instrument paired with a purchase quantity.
///
/// Holdings share the instrument description — every combination produced
/// by a scan references the same instruments through `Arc`. Immutable once
/// constructed; cost is derived on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    instrument: Arc<Instrument>,
    quantity: u64,
}

impl Holding {
    pub fn new(instrument: Arc<Instrument>, quantity: u64) -> Self {
        Self { instrument, quantity }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Cost in cents: quantity × unit price.
    pub fn cost_cents(&self) -> Cents {
        self.quantity * self.instrument.price_cents()
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.quantity, self.instrument.symbol())
    }
}
