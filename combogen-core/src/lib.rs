//! Combogen core — affordable-combination search engine.
//!
//! Given a cash budget and a set of instruments with known unit prices, the
//! engine enumerates every affordable assignment of purchase quantities and
//! ranks the best ones:
//! - Domain types (instruments, holdings, combinations)
//! - Mixed-radix search space: one integer id per combination, with a
//!   cheap cost-only evaluation split from full decoding
//! - Spend-band pruned, rayon-parallel exhaustive scan
//! - Top-K ranking by cost or by target-allocation fit
//!
//! Quote retrieval (Yahoo Finance) lives behind the [`data::QuoteProvider`]
//! trait; the engine itself only ever sees a resolved, immutable price
//! snapshot.

pub mod data;
pub mod domain;
pub mod engine;
