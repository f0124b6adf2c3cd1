//! Definitions of time in inote notation.
//!
//! Subdivisions like thirds, sixths and twelfths must accumulate without drift, so every
//! duration is an exact fraction of a whole cycle.

use std::num::NonZeroU64;

use num::rational::Ratio;

/// An exact, always reduced fraction of a whole cycle.
///
/// It displays as `n/d`, or `n` alone when the denominator is 1. Sums of parsed values go
/// through `CheckedAdd`, as huge subdivisions or hold denominators can outgrow `u64`.
pub type Fraction = Ratio<u64>;

/// The length of one segment under `{subdivision}`, that is `1/subdivision`.
#[must_use]
pub fn step(subdivision: NonZeroU64) -> Fraction {
    Fraction::new(1, subdivision.get())
}
